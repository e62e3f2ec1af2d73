//! Error types for catalog loading.

use thiserror::Error;

/// Errors raised while reading or validating catalog data.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid catalog data: {what}")]
    Invalid { what: String },

    #[error("Duplicate {kind} '{id}' in catalog")]
    Duplicate { kind: &'static str, id: String },

    #[error("Curve {model}/{mode}/{size}: {what}")]
    Curve {
        model: String,
        mode: String,
        size: u32,
        what: &'static str,
    },

    #[error(transparent)]
    Numeric(#[from] af_core::AfError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
