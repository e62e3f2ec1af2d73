//! af-particles: tracer particles animating the diffuser jets.
//!
//! One physics pass advances a fixed-capacity pool on a fixed timestep;
//! the [`projection`] module turns the shared particle state into side, top
//! or isometric screen coordinates without touching the physics.
//!
//! # Example
//!
//! ```
//! use af_catalog::Catalog;
//! use af_core::Id;
//! use af_field::{DiffuserSettings, PlacedDiffuser, Room};
//! use af_particles::{ParticleConfig, ParticleEngine, Scene};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let room = Room::default();
//! let settings = DiffuserSettings {
//!     model: "VSD".into(),
//!     mode: "swirl".into(),
//!     size: 200,
//!     flow_m3h: 600.0,
//!     supply_temp: 18.0,
//! };
//! let diffusers = vec![PlacedDiffuser::new(Id::from_index(0), 3.0, 2.5, settings, &catalog, &room)];
//!
//! let mut engine = ParticleEngine::new(ParticleConfig::default());
//! let scene = Scene::new(&room, &diffusers, &[]);
//! let report = engine.advance(0.1, &scene);
//! assert!(report.steps > 0);
//! assert!(engine.active_count() > 0);
//! ```

pub mod emitter;
pub mod engine;
pub mod particle;
pub mod pool;
pub mod projection;

pub use emitter::Emitter;
pub use engine::{ParticleConfig, ParticleEngine, Scene, TickReport};
pub use particle::{ColorTag, Particle, Trail};
pub use pool::ParticlePool;
pub use projection::{Camera, Projected, ProjectedParticle, Projection, project_particles};
