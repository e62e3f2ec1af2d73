//! af-core: stable foundation for the airflow engine.
//!
//! Contains:
//! - units (uom SI types + catalog unit conversions)
//! - numeric (Real + tolerances + finite-safe float helpers)
//! - geometry (Vec3 + axis-aligned boxes)
//! - ids (stable compact IDs for placed objects)
//! - timing (fixed-step clock + optional wall-clock timers)
//! - error (shared error types)

pub mod error;
pub mod geometry;
pub mod ids;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{AfError, AfResult};
pub use geometry::{Aabb, Vec3};
pub use ids::*;
pub use numeric::*;
pub use timing::FixedStep;
