//! Read-only views of the particle state.
//!
//! Projections map room coordinates (m) to a 2-D plane (still in metres)
//! plus a depth for draw ordering. Scaling to pixels is left to the renderer.

use crate::engine::ParticleEngine;
use crate::particle::ColorTag;
use af_core::Vec3;
use af_field::Room;
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Orbit camera around the room centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Rotation about the vertical axis (rad)
    pub yaw: f64,
    /// Elevation above the horizon (rad)
    pub pitch: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            yaw: 45f64.to_radians(),
            pitch: 30f64.to_radians(),
        }
    }
}

impl Camera {
    fn rotation(&self) -> Rotation3<f64> {
        let yaw = Rotation3::from_axis_angle(&Vector3::z_axis(), -self.yaw);
        let pitch = Rotation3::from_axis_angle(&Vector3::x_axis(), self.pitch);
        pitch * yaw
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Projection {
    /// Vertical section: x across, z up
    #[default]
    Side,
    /// Plan: x across, y up
    Top,
    Isometric(Camera),
}

/// A projected point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projected {
    pub u: f64,
    pub v: f64,
    /// Larger is further from the viewer.
    pub depth: f64,
}

impl Projection {
    pub fn project(&self, room: &Room, p: &Vec3) -> Projected {
        match self {
            Projection::Side => Projected {
                u: p.x,
                v: p.z,
                depth: p.y,
            },
            Projection::Top => Projected {
                u: p.x,
                v: p.y,
                depth: room.height - p.z,
            },
            Projection::Isometric(camera) => {
                let q = camera.rotation() * (p - room.centre());
                Projected {
                    u: q.x,
                    v: q.z,
                    depth: q.y,
                }
            }
        }
    }
}

/// One particle ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedParticle {
    pub at: Projected,
    pub color: ColorTag,
    pub speed: f64,
    /// Oldest first
    pub trail: Vec<Projected>,
}

/// Project every active particle, furthest first.
pub fn project_particles(
    engine: &ParticleEngine,
    projection: &Projection,
    room: &Room,
) -> Vec<ProjectedParticle> {
    let mut out: Vec<ProjectedParticle> = engine
        .particles()
        .map(|p| ProjectedParticle {
            at: projection.project(room, &p.position),
            color: p.color,
            speed: p.velocity.norm(),
            trail: p.trail.iter().map(|t| projection.project(room, t)).collect(),
        })
        .collect();
    out.sort_by(|a, b| b.at.depth.total_cmp(&a.at.depth));
    out
}
