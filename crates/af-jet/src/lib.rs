//! af-jet: diffuser performance model.
//!
//! Turns catalog data into physical outputs for one diffuser:
//! - exit velocity from flow and free area
//! - interpolated pressure drop, sound power and throw
//! - Archimedes number and its effect on jet decay
//! - workzone velocity and coverage radius
//!
//! The [`Jet`] kernel built from a [`PerformanceResult`] samples the
//! decayed velocity and supply-air fraction at any offset from the nozzle.
//! The field solver, the probe evaluator and the particle engine all go
//! through it, so every view of the room shows the same physics.
//!
//! # Example
//!
//! ```
//! use af_catalog::Catalog;
//! use af_jet::{PerformanceQuery, evaluate};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let query = PerformanceQuery::new("VSD", "vertical", 200, 600.0, 20.0, 24.0);
//! let result = evaluate(&catalog, &query);
//! assert!(result.error.is_none());
//! assert!(result.ar < 0.0); // cold supply sinks
//! ```

pub mod buoyancy;
pub mod error;
pub mod jet;
pub mod performance;

pub use error::PerformanceError;
pub use jet::{Jet, JetSample};
pub use performance::{PerformanceQuery, PerformanceResult, evaluate};

/// Centerline velocity that defines the catalog throw (m/s).
pub const THROW_TERMINAL_VELOCITY: f64 = 0.5;

/// Speed on the workzone plane that bounds the coverage disc (m/s).
pub const COVERAGE_THRESHOLD: f64 = 0.25;

/// Nozzle height above the floor when the caller gives none (m).
pub const DEFAULT_MOUNTING_HEIGHT: f64 = 3.0;

/// Top of the occupied zone when the caller gives none (m).
pub const DEFAULT_WORKZONE_HEIGHT: f64 = 1.8;
