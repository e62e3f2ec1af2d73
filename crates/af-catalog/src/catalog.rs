//! Catalog container, loading and validation.

use crate::error::{CatalogError, CatalogResult};
use crate::model::DiffuserModel;
use af_core::ensure_finite;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_YAML: &str = include_str!("../data/builtin.yaml");

/// Immutable, validated set of diffuser models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    models: Vec<DiffuserModel>,
}

impl Catalog {
    /// The catalog shipped with the engine.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_yaml_str(BUILTIN_YAML)
    }

    pub fn from_yaml_str(content: &str) -> CatalogResult<Self> {
        let catalog: Catalog = serde_yaml::from_str(content)?;
        catalog.validate()?;
        tracing::debug!(models = catalog.models.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn from_yaml_path(path: &Path) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn models(&self) -> &[DiffuserModel] {
        &self.models
    }

    pub fn model(&self, id: &str) -> Option<&DiffuserModel> {
        self.models.iter().find(|m| m.id == id)
    }

    fn validate(&self) -> CatalogResult<()> {
        if self.models.is_empty() {
            return Err(CatalogError::Invalid {
                what: "catalog has no models".into(),
            });
        }

        let mut model_ids = HashSet::new();
        for model in &self.models {
            if !model_ids.insert(model.id.as_str()) {
                return Err(CatalogError::Duplicate {
                    kind: "model",
                    id: model.id.clone(),
                });
            }
            validate_model(model)?;
        }
        Ok(())
    }
}

fn validate_model(model: &DiffuserModel) -> CatalogResult<()> {
    if model.modes.is_empty() {
        return Err(CatalogError::Invalid {
            what: format!("model {} has no modes", model.id),
        });
    }

    let mut mode_ids = HashSet::new();
    for mode in &model.modes {
        if !mode_ids.insert(mode.id.as_str()) {
            return Err(CatalogError::Duplicate {
                kind: "mode",
                id: format!("{}/{}", model.id, mode.id),
            });
        }
        let spread = ensure_finite(mode.spread_deg, "mode spread")?;
        if !(0.0..90.0).contains(&spread) {
            return Err(CatalogError::Invalid {
                what: format!("mode {}/{} spread must be in [0, 90)", model.id, mode.id),
            });
        }
    }

    let mut sizes = HashSet::new();
    for spec in &model.specs {
        if !sizes.insert(spec.size) {
            return Err(CatalogError::Duplicate {
                kind: "size",
                id: format!("{}/{}", model.id, spec.size),
            });
        }
        let geometry_ok = [spec.a, spec.b, spec.c, spec.d]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
            && spec.a > 0.0;
        if !geometry_ok {
            return Err(CatalogError::Invalid {
                what: format!("size {}/{} has invalid geometry", model.id, spec.size),
            });
        }
        if !(spec.f0 > 0.0 && spec.f0 <= 1.0) {
            return Err(CatalogError::Invalid {
                what: format!("size {}/{} free-area factor must be in (0, 1]", model.id, spec.size),
            });
        }
        let lo = ensure_finite(spec.flow[0], "flow minimum")?;
        let hi = ensure_finite(spec.flow[1], "flow maximum")?;
        if !(lo > 0.0 && lo < hi) {
            return Err(CatalogError::Invalid {
                what: format!("size {}/{} flow range must satisfy 0 < min < max", model.id, spec.size),
            });
        }
    }

    let mut curve_keys = HashSet::new();
    for curve in &model.curves {
        let curve_err = |what: &'static str| CatalogError::Curve {
            model: model.id.clone(),
            mode: curve.mode.clone(),
            size: curve.size,
            what,
        };
        if model.mode(&curve.mode).is_none() {
            return Err(curve_err("unknown mode"));
        }
        if model.spec(curve.size).is_none() {
            return Err(curve_err("unknown size"));
        }
        if !curve_keys.insert((curve.mode.as_str(), curve.size)) {
            return Err(curve_err("duplicate curve"));
        }
        curve.check().map_err(curve_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_core::AfError;

    const MINIMAL: &str = r#"
models:
  - id: T1
    name: Test
    modes:
      - { id: down, name: Down, flow_type: vertical_cone, spread_deg: 15 }
    specs:
      - { size: 100, face: round, a: 100, b: 50, c: 98, d: 120, f0: 0.9, flow: [50, 200] }
    curves:
      - mode: down
        size: 100
        points:
          - { q: 50, dp: 2, lwa: 15, throw: 1 }
          - { q: 200, dp: 30, lwa: 30, throw: 4 }
"#;

    #[test]
    fn builtin_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.model("VSD").is_some());
        assert!(catalog.model("nope").is_none());
    }

    #[test]
    fn minimal_catalog_loads() {
        let catalog = Catalog::from_yaml_str(MINIMAL).unwrap();
        let model = catalog.model("T1").unwrap();
        assert_eq!(model.sizes_for("down"), vec![100]);
    }

    #[test]
    fn rejects_curve_for_unknown_size() {
        let yaml = MINIMAL.replace("      - mode: down\n        size: 100", "      - mode: down\n        size: 160");
        let err = Catalog::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, CatalogError::Curve { what: "unknown size", .. }));
    }

    #[test]
    fn rejects_bad_free_area() {
        let yaml = MINIMAL.replace("f0: 0.9", "f0: 1.5");
        assert!(matches!(
            Catalog::from_yaml_str(&yaml),
            Err(CatalogError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_nan_spread() {
        let yaml = MINIMAL.replace("spread_deg: 15", "spread_deg: .nan");
        assert!(matches!(
            Catalog::from_yaml_str(&yaml),
            Err(CatalogError::Numeric(AfError::NonFinite { what: "mode spread", .. }))
        ));
    }

    #[test]
    fn rejects_empty() {
        assert!(Catalog::from_yaml_str("models: []").is_err());
    }
}
