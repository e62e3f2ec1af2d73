//! Reasons a diffuser configuration has no valid performance.

use serde::Serialize;
use thiserror::Error;

/// Unsupported configuration, carried as a value on the result.
///
/// Any result holding one of these is skipped by the field solver, the probe
/// evaluator and the particle emitters.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PerformanceError {
    #[error("Unknown diffuser model '{model}'")]
    UnknownModel { model: String },

    #[error("Model {model} has no mode '{mode}'")]
    UnknownMode { model: String, mode: String },

    #[error("Size {size} is not available for {model}/{mode}")]
    UnsupportedSize {
        model: String,
        mode: String,
        size: u32,
    },

    #[error("No air flow")]
    NoFlow,

    #[error("Flow {requested} m³/h outside supported range [{min}, {max}] m³/h")]
    FlowOutOfRange { requested: f64, min: f64, max: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PerformanceError::FlowOutOfRange {
            requested: 50.0,
            min: 150.0,
            max: 900.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("50"));
        assert!(msg.contains("[150, 900]"));
    }
}
