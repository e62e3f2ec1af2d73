//! Scenario validation logic.

use crate::schema::Scenario;
use af_catalog::Catalog;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn finite(field: impl FnOnce() -> String, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field(),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        })
    }
}

/// Check a scenario against the catalog.
///
/// Sizes and flows outside the catalog are accepted here: the performance
/// model reports them on the diffuser so the user can still see and fix it.
pub fn validate_scenario(scenario: &Scenario, catalog: &Catalog) -> Result<(), ValidationError> {
    if scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    let room = &scenario.room;
    for (name, value) in [
        ("width", room.width),
        ("length", room.length),
        ("height", room.height),
    ] {
        finite(|| format!("room {name}"), value)?;
        if value <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("room {name}"),
                value: value.to_string(),
                reason: "must be positive".to_string(),
            });
        }
    }
    finite(|| "room temperature".to_string(), room.temperature)?;

    for (i, d) in scenario.diffusers.iter().enumerate() {
        let Some(model) = catalog.model(&d.model) else {
            return Err(ValidationError::MissingReference {
                id: d.model.clone(),
                context: format!("diffuser {i} model"),
            });
        };
        if model.mode(&d.mode).is_none() {
            return Err(ValidationError::MissingReference {
                id: d.mode.clone(),
                context: format!("diffuser {i} mode of {}", d.model),
            });
        }
        finite(|| format!("diffuser {i} x"), d.x)?;
        finite(|| format!("diffuser {i} y"), d.y)?;
        finite(|| format!("diffuser {i} flow_m3h"), d.flow_m3h)?;
        finite(|| format!("diffuser {i} supply_temp"), d.supply_temp)?;
    }

    for (i, o) in scenario.obstacles.iter().enumerate() {
        for (name, value) in [
            ("x", o.x),
            ("y", o.y),
            ("z", o.z),
            ("width", o.width),
            ("length", o.length),
            ("height", o.height),
        ] {
            finite(|| format!("obstacle {i} {name}"), value)?;
        }
    }

    for (i, p) in scenario.probes.iter().enumerate() {
        finite(|| format!("probe {i} x"), p.x)?;
        finite(|| format!("probe {i} y"), p.y)?;
        finite(|| format!("probe {i} z"), p.z)?;
    }

    finite(|| "view grid_step".to_string(), scenario.view.field.grid_step)?;
    finite(|| "view slice_height".to_string(), scenario.view.field.slice_height)?;
    Ok(())
}
