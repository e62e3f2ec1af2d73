use thiserror::Error;

pub type AfResult<T> = Result<T, AfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = AfError::NonFinite {
            what: "flow minimum",
            value: f64::INFINITY,
        };
        let msg = err.to_string();
        assert!(msg.contains("flow minimum"));
        assert!(msg.contains("inf"));
    }
}
