//! Per-diffuser spawn strategy.

use crate::particle::{ColorTag, Particle};
use af_catalog::FlowType;
use af_core::{DiffuserId, Vec3};
use af_field::{PlacedDiffuser, Room};
use af_jet::Jet;
use core::f64::consts::{FRAC_PI_2, TAU};
use rand::Rng;

/// Suction tracers start on a shell this far from the intake (m).
const SHELL_RADIUS: (f64, f64) = (1.0, 2.5);

/// Tracers closer than this to the intake are absorbed (m).
pub const ABSORB_RADIUS: f64 = 0.15;

/// Slowest inward drift of a suction tracer (m/s).
///
/// The point-sink speed falls off with the square of the distance, so far
/// tracers would otherwise hang in the air.
pub const SUCTION_DRIFT: f64 = 0.6;

/// Spawn point just below the ceiling (m).
const NOZZLE_DROP: f64 = 0.02;

/// Lateral swirl velocity relative to the axial discharge.
const SWIRL_RATIO: f64 = 0.5;

/// Per-step velocity retention for each discharge pattern.
pub fn drag_for(flow_type: FlowType) -> f64 {
    match flow_type {
        FlowType::VerticalCone => 0.985,
        FlowType::Compact => 0.99,
        FlowType::Horizontal | FlowType::FourWay => 0.975,
        FlowType::Swirl => 0.96,
        FlowType::Suction => 1.0,
    }
}

/// Spawn source for one usable diffuser during one advance call.
#[derive(Debug, Clone)]
pub struct Emitter {
    pub id: DiffuserId,
    pub nozzle: Vec3,
    pub jet: Jet,
    buoyancy: f64,
    color: ColorTag,
}

impl Emitter {
    /// Emitter for a placed diffuser, `None` while its configuration is unusable.
    pub fn new(diffuser: &PlacedDiffuser, room: &Room, buoyancy_gain: f64) -> Option<Self> {
        let jet = diffuser.jet()?.clone();
        let color = if jet.flow_type().is_supply() {
            ColorTag::from_temperatures(jet.supply_temp(), jet.room_temp())
        } else {
            ColorTag::Extract
        };
        Some(Self {
            id: diffuser.id,
            nozzle: diffuser.nozzle(room),
            buoyancy: buoyancy_gain * jet.buoyancy_acceleration(),
            jet,
            color,
        })
    }

    pub fn flow_type(&self) -> FlowType {
        self.jet.flow_type()
    }

    pub fn v0(&self) -> f64 {
        self.jet.v0()
    }

    /// Velocity a suction tracer at `position` follows.
    pub fn sink_velocity(&self, position: &Vec3) -> Vec3 {
        let to_intake = self.nozzle - position;
        let dist = to_intake.norm();
        if dist < 1e-9 {
            return Vec3::zeros();
        }
        let sink = self.jet.sample(&(position - self.nozzle)).speed();
        let speed = sink.max(SUCTION_DRIFT).min(self.v0().max(SUCTION_DRIFT));
        to_intake / dist * speed
    }

    /// Reset `p` as a fresh tracer leaving (or heading for) this diffuser.
    pub fn spawn<R: Rng>(&self, p: &mut Particle, room: &Room, life: (f64, f64), rng: &mut R) {
        let flow_type = self.flow_type();
        let spread = self.jet.spread();
        let r0 = self.jet.nozzle_radius();
        let v0 = self.v0() * rng.random_range(0.9..1.1);
        let azimuth = rng.random_range(0.0..TAU);
        let radial = Vec3::new(azimuth.cos(), azimuth.sin(), 0.0);
        let origin = self.nozzle - Vec3::new(0.0, 0.0, NOZZLE_DROP);

        let (position, velocity) = match flow_type {
            FlowType::VerticalCone | FlowType::Compact | FlowType::Swirl => {
                let polar = rng.random_range(0.0..=spread.max(1e-3));
                let dir = radial * polar.sin() - Vec3::new(0.0, 0.0, polar.cos());
                let mut v = dir * v0;
                if flow_type == FlowType::Swirl {
                    let tangential = Vec3::new(-radial.y, radial.x, 0.0);
                    v += tangential * (SWIRL_RATIO * v0);
                }
                (origin + radial * rng.random_range(0.0..=r0), v)
            }
            FlowType::Horizontal => {
                let dir = Vec3::new(radial.x, radial.y, -0.05).normalize();
                (origin + radial * r0, dir * v0)
            }
            FlowType::FourWay => {
                let lobe = f64::from(rng.random_range(0..4u8)) * FRAC_PI_2;
                let half = spread.max(1e-3);
                let heading = lobe + rng.random_range(-half..=half);
                let axis = Vec3::new(heading.cos(), heading.sin(), 0.0);
                let dir = Vec3::new(axis.x, axis.y, -0.05).normalize();
                (origin + axis * r0, dir * v0)
            }
            FlowType::Suction => {
                let dist = rng.random_range(SHELL_RADIUS.0..SHELL_RADIUS.1);
                let polar = rng.random_range(0.2..FRAC_PI_2);
                let offset = radial * (dist * polar.sin()) - Vec3::new(0.0, 0.0, dist * polar.cos());
                let pos = clamp_into(&(self.nozzle + offset), room);
                (pos, self.sink_velocity(&pos))
            }
        };

        p.active = true;
        p.position = position;
        p.velocity = velocity;
        p.life = rng.random_range(life.0..=life.1.max(life.0));
        p.age = 0.0;
        p.steps = 0;
        p.buoyancy = if flow_type.is_supply() { self.buoyancy } else { 0.0 };
        p.drag = drag_for(flow_type);
        p.trail.clear();
        p.color = self.color;
        p.is_horizontal = flow_type.is_ceiling_jet();
        p.is_suction = !flow_type.is_supply();
        p.emitter = Some(self.id);
        p.intake = self.nozzle;
    }
}

/// Nearest point inside the room, a hair off the surfaces.
fn clamp_into(p: &Vec3, room: &Room) -> Vec3 {
    const INSET: f64 = 1e-3;
    let hi = Vec3::new(room.width, room.length, room.height);
    Vec3::from_fn(|i, _| {
        let top = (hi[i] - INSET).max(INSET);
        p[i].clamp(INSET.min(top), top)
    })
}
