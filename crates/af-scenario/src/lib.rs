//! af-scenario: scenario file format, input clamping and the session owner.

pub mod sanitize;
pub mod schema;
pub mod session;
pub mod validate;

pub use sanitize::{Adjustment, sanitize};
pub use schema::*;
pub use session::Session;
pub use validate::{LATEST_VERSION, ValidationError, validate_scenario};

use af_catalog::{Catalog, CatalogError};
use af_core::Id;
use std::path::Path;

pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(thiserror::Error, Debug)]
pub enum ScenarioError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("No {kind} with id {id}")]
    UnknownId { kind: &'static str, id: Id },

    #[error("Unsupported file extension: {path}")]
    Extension { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn finish_load(mut scenario: Scenario, catalog: &Catalog) -> ScenarioResult<Scenario> {
    sanitize(&mut scenario);
    validate_scenario(&scenario, catalog)?;
    Ok(scenario)
}

pub fn load_yaml(path: &Path, catalog: &Catalog) -> ScenarioResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_yaml::from_str(&content)?;
    finish_load(scenario, catalog)
}

pub fn save_yaml(path: &Path, scenario: &Scenario, catalog: &Catalog) -> ScenarioResult<()> {
    validate_scenario(scenario, catalog)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path, catalog: &Catalog) -> ScenarioResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_json::from_str(&content)?;
    finish_load(scenario, catalog)
}

pub fn save_json(path: &Path, scenario: &Scenario, catalog: &Catalog) -> ScenarioResult<()> {
    validate_scenario(scenario, catalog)?;
    let content = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.yaml`/`.yml` or `.json`.
pub fn load(path: &Path, catalog: &Catalog) -> ScenarioResult<Scenario> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => load_yaml(path, catalog),
        Some("json") => load_json(path, catalog),
        _ => Err(ScenarioError::Extension {
            path: path.display().to_string(),
        }),
    }
}
