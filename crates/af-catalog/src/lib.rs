//! af-catalog: diffuser product data.
//!
//! Provides the immutable catalog the engine reads at startup:
//! - product families and their discharge modes
//! - per-size nozzle geometry and free area
//! - tabulated operating curves (flow → pressure drop, noise, throw)
//!
//! The catalog is loaded once (from the embedded builtin data or a YAML
//! file), validated, and then shared by reference. Nothing mutates it after
//! load.
//!
//! # Example
//!
//! ```
//! use af_catalog::Catalog;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let vsd = catalog.model("VSD").unwrap();
//! let curve = vsd.curve("vertical", 200).unwrap();
//! let point = curve.at(600.0);
//! assert!(point.throw > 0.0);
//! ```

pub mod catalog;
pub mod curve;
pub mod error;
pub mod model;

// Re-exports
pub use catalog::Catalog;
pub use curve::{OperatingCurve, OperatingPoint};
pub use error::{CatalogError, CatalogResult};
pub use model::{DiffuserModel, FaceShape, FlowType, Mode, Spec};
