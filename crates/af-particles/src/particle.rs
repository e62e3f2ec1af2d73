//! Tracer particle state.

use af_core::{DiffuserId, Vec3};
use serde::Serialize;

/// Number of trail samples kept per particle.
pub const TRAIL_LEN: usize = 8;

/// Display tag derived from the owning diffuser's supply temperature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Cool,
    #[default]
    Neutral,
    Warm,
    Extract,
}

impl ColorTag {
    /// Band of ±0.5 K around the room temperature counts as neutral.
    pub fn from_temperatures(supply_c: f64, room_c: f64) -> Self {
        let dt = supply_c - room_c;
        if dt < -0.5 {
            ColorTag::Cool
        } else if dt > 0.5 {
            ColorTag::Warm
        } else {
            ColorTag::Neutral
        }
    }
}

/// Fixed-size ring of recent positions, oldest first when iterated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    samples: [Vec3; TRAIL_LEN],
    head: usize,
    len: usize,
}

impl Trail {
    pub fn push(&mut self, p: Vec3) {
        self.samples[self.head] = p;
        self.head = (self.head + 1) % TRAIL_LEN;
        self.len = (self.len + 1).min(TRAIL_LEN);
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec3> {
        let start = (self.head + TRAIL_LEN - self.len) % TRAIL_LEN;
        (0..self.len).map(move |k| &self.samples[(start + k) % TRAIL_LEN])
    }
}

/// One pool slot. Inactive slots keep their last state until reused.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Particle {
    pub active: bool,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Lifetime (s)
    pub life: f64,
    /// Time since spawn (s)
    pub age: f64,
    /// Steps since spawn, drives trail sampling
    pub steps: u32,
    /// Vertical acceleration (m/s², positive up)
    pub buoyancy: f64,
    /// Velocity factor applied every step
    pub drag: f64,
    pub trail: Trail,
    pub color: ColorTag,
    pub is_horizontal: bool,
    pub is_suction: bool,
    pub emitter: Option<DiffuserId>,
    /// Nozzle the particle came from, or the intake it heads for
    pub intake: Vec3,
}

impl Particle {
    pub fn is_expired(&self) -> bool {
        self.age > self.life
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|c| c.is_finite())
    }
}
