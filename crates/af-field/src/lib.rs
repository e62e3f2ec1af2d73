//! af-field: steady airflow over a room.
//!
//! - `room`: room box, placed diffusers, obstacles and probe points
//! - `superpose`: per-point superposition of every diffuser's jet
//! - `grid`: horizontal slice of the room sampled on a regular grid
//! - `comfort`: EDT classes and ADPI over a slice
//! - `probe`: single-point measurement with draft rating
//!
//! The grid and the probe share one per-point routine, so a probe placed at
//! a cell centre reads exactly what the grid shows there.

pub mod comfort;
pub mod grid;
pub mod probe;
pub mod room;
pub mod superpose;

pub use comfort::{ComfortClass, ComfortReport, analyze};
pub use grid::{FieldGrid, FieldRequest, GridPoint, compute_field};
pub use probe::{DraftLevel, ProbeSample, draft_rating, sample};
pub use room::{DiffuserSettings, Obstacle, ObstacleKind, PlacedDiffuser, Probe, Room};
pub use superpose::{PointFlow, effective_draft_temperature, turbulence_intensity};
