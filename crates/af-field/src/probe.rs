//! Point measurement with Fanger's draft rating.

use crate::grid::grid_point;
use crate::room::{Obstacle, PlacedDiffuser, Room};
use crate::superpose::{inside_wall, turbulence_intensity};
use af_core::Vec3;
use af_core::numeric::{finite_or_zero, non_negative};
use serde::Serialize;

/// Draft risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftLevel {
    Low,
    Moderate,
    High,
}

impl DraftLevel {
    pub fn from_rating(dr: f64) -> Self {
        if dr < 15.0 {
            DraftLevel::Low
        } else if dr < 25.0 {
            DraftLevel::Moderate
        } else {
            DraftLevel::High
        }
    }
}

/// Reading at one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbeSample {
    pub vector: Vec3,
    /// Speed (m/s)
    pub velocity: f64,
    /// Horizontal heading of the flow, degrees in [0, 360)
    pub angle_deg: f64,
    /// °C
    pub temperature: f64,
    /// %
    pub turbulence: f64,
    /// Percentage dissatisfied due to draft
    pub draft_rating: f64,
    pub level: DraftLevel,
    pub inside_obstacle: bool,
}

/// Fanger draft rating, % dissatisfied.
///
/// `DR = (34 − t)·(v − 0.05)^0.62·(0.37·v·Tu + 3.14)` with `v` floored at
/// 0.05 m/s, zero at or above 34 °C, and clamped to [0, 100].
pub fn draft_rating(temperature: f64, velocity: f64, turbulence: f64) -> f64 {
    let t = finite_or_zero(temperature);
    if t >= 34.0 {
        return 0.0;
    }
    let v = non_negative(velocity).max(0.05);
    let tu = non_negative(turbulence);
    let dr = (34.0 - t) * (v - 0.05).powf(0.62) * (0.37 * v * tu + 3.14);
    finite_or_zero(dr).clamp(0.0, 100.0)
}

/// Measure at `point` using the same superposition as the field solver.
pub fn sample(
    point: &Vec3,
    room: &Room,
    diffusers: &[PlacedDiffuser],
    obstacles: &[Obstacle],
) -> ProbeSample {
    if inside_wall(point, obstacles) {
        let t = finite_or_zero(room.temperature);
        return ProbeSample {
            vector: Vec3::zeros(),
            velocity: 0.0,
            angle_deg: 0.0,
            temperature: t,
            turbulence: turbulence_intensity(0.0, t, t),
            draft_rating: 0.0,
            level: DraftLevel::Low,
            inside_obstacle: true,
        };
    }

    let cell = grid_point(point, room, diffusers, obstacles);
    let draft = draft_rating(cell.t, cell.v, cell.turbulence);
    ProbeSample {
        vector: cell.vector,
        velocity: cell.v,
        angle_deg: heading_deg(&cell.vector),
        temperature: cell.t,
        turbulence: cell.turbulence,
        draft_rating: draft,
        level: DraftLevel::from_rating(draft),
        inside_obstacle: false,
    }
}

fn heading_deg(v: &Vec3) -> f64 {
    if v.x == 0.0 && v.y == 0.0 {
        return 0.0;
    }
    let deg = v.y.atan2(v.x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative angles
    if deg >= 360.0 { 0.0 } else { deg }
}
