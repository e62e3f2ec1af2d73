//! Fixed-timestep particle simulation.

use crate::emitter::{ABSORB_RADIUS, Emitter};
use crate::particle::Particle;
use crate::pool::ParticlePool;
use af_core::timing::DEFAULT_STEP_S;
use af_core::{Aabb, FixedStep, Vec3};
use af_field::{Obstacle, PlacedDiffuser, Room};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Share of the normal velocity kept after a bounce.
const RESTITUTION: f64 = 0.5;

/// Share of the tangential velocity kept after a bounce.
const TANGENTIAL_DAMPING: f64 = 0.8;

/// Depth below the ceiling where ceiling jets stay attached (m).
const CEILING_BAND: f64 = 0.25;

/// Horizontal speed above which an attached ceiling jet does not sink (m/s).
const ATTACHED_SPEED: f64 = 0.6;

/// Engine tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Pool capacity
    pub capacity: usize,
    /// Particles per step per m/s of the fastest jet per diffuser
    pub spawn_per_mps: f64,
    /// Upper bound on spawns in one step
    pub max_spawn_per_step: usize,
    /// Visual amplification of thermal buoyancy
    pub buoyancy_gain: f64,
    /// Lifetime range (s)
    pub life_s: (f64, f64),
    /// Steps between trail samples
    pub trail_every: u32,
    /// Simulation step (s)
    pub step_s: f64,
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            capacity: 4000,
            spawn_per_mps: 0.5,
            max_spawn_per_step: 64,
            buoyancy_gain: 3.0,
            life_s: (3.0, 6.0),
            trail_every: 3,
            step_s: DEFAULT_STEP_S,
            seed: 0x5eed,
        }
    }
}

/// Read-only view of the room for one advance call.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub room: &'a Room,
    pub diffusers: &'a [PlacedDiffuser],
    pub obstacles: &'a [Obstacle],
}

impl<'a> Scene<'a> {
    pub fn new(room: &'a Room, diffusers: &'a [PlacedDiffuser], obstacles: &'a [Obstacle]) -> Self {
        Self {
            room,
            diffusers,
            obstacles,
        }
    }
}

/// What happened during one `advance` or `step` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub steps: u32,
    pub spawned: usize,
    pub expired: usize,
    pub out_of_bounds: usize,
    pub absorbed: usize,
    /// Spawns dropped because the pool was full
    pub stalled: usize,
    /// Active particles afterwards
    pub active: usize,
}

impl TickReport {
    /// Accumulate a later report; `active` takes the later value.
    pub fn merge(&mut self, other: &TickReport) {
        self.steps += other.steps;
        self.spawned += other.spawned;
        self.expired += other.expired;
        self.out_of_bounds += other.out_of_bounds;
        self.absorbed += other.absorbed;
        self.stalled += other.stalled;
        self.active = other.active;
    }
}

enum Fate {
    Alive,
    Expired,
    OutOfBounds,
    Absorbed,
}

/// Owner of the particle pool.
#[derive(Debug, Clone)]
pub struct ParticleEngine {
    config: ParticleConfig,
    pool: ParticlePool,
    clock: FixedStep,
    rng: StdRng,
    spawn_carry: f64,
    cursor: usize,
    paused: bool,
    saturated: bool,
    /// Slots finished during the current step
    released: Vec<usize>,
}

impl ParticleEngine {
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            pool: ParticlePool::new(config.capacity),
            clock: FixedStep::new(config.step_s),
            rng: StdRng::seed_from_u64(config.seed),
            spawn_carry: 0.0,
            cursor: 0,
            paused: false,
            saturated: false,
            released: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Stop spawning and integrating; particles stay where they are.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
        // Time spent paused is not caught up.
        self.clock.reset();
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Drop every particle and restart the clock and random stream.
    pub fn reset(&mut self) {
        self.pool.clear();
        self.clock = FixedStep::new(self.config.step_s);
        self.rng = StdRng::seed_from_u64(self.config.seed);
        self.spawn_carry = 0.0;
        self.cursor = 0;
        self.saturated = false;
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Simulated time (s).
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.pool.iter_active()
    }

    /// Feed one frame interval and run the fixed steps it covers.
    pub fn advance(&mut self, frame_dt: f64, scene: &Scene<'_>) -> TickReport {
        if self.paused {
            return TickReport {
                active: self.active_count(),
                ..TickReport::default()
            };
        }
        let steps = self.clock.accumulate(frame_dt);
        let emitters = self.emitters(scene);
        let obstacles = obstacle_boxes(scene);
        let mut report = TickReport {
            active: self.active_count(),
            ..TickReport::default()
        };
        for _ in 0..steps {
            let tick = self.step_with(&emitters, &obstacles, scene);
            report.merge(&tick);
        }
        trace!(?report, "particles advanced");
        report
    }

    /// Run exactly one fixed step regardless of wall-clock time.
    pub fn step(&mut self, scene: &Scene<'_>) -> TickReport {
        if self.paused {
            return TickReport {
                active: self.active_count(),
                ..TickReport::default()
            };
        }
        let emitters = self.emitters(scene);
        self.step_with(&emitters, &obstacle_boxes(scene), scene)
    }

    fn emitters(&self, scene: &Scene<'_>) -> Vec<Emitter> {
        scene
            .diffusers
            .iter()
            .filter_map(|d| Emitter::new(d, scene.room, self.config.buoyancy_gain))
            .collect()
    }

    fn step_with(&mut self, emitters: &[Emitter], obstacles: &[Aabb], scene: &Scene<'_>) -> TickReport {
        let mut report = TickReport {
            steps: 1,
            ..TickReport::default()
        };
        self.spawn(emitters, scene.room, &mut report);
        self.integrate(emitters, obstacles, scene.room, &mut report);
        report.active = self.active_count();
        report
    }

    fn spawn(&mut self, emitters: &[Emitter], room: &Room, report: &mut TickReport) {
        if emitters.is_empty() || room.is_degenerate() {
            self.spawn_carry = 0.0;
            return;
        }
        let max_v0 = emitters.iter().map(Emitter::v0).fold(0.0, f64::max);
        let budget = self.config.spawn_per_mps * max_v0 * emitters.len() as f64 + self.spawn_carry;
        let whole = budget.floor();
        self.spawn_carry = budget - whole;
        let count = (whole as usize).min(self.config.max_spawn_per_step);

        for _ in 0..count {
            let Some((_, particle)) = self.pool.acquire() else {
                report.stalled += 1;
                continue;
            };
            let emitter = &emitters[self.cursor % emitters.len()];
            self.cursor = self.cursor.wrapping_add(1);
            emitter.spawn(particle, room, self.config.life_s, &mut self.rng);
            report.spawned += 1;
        }

        let full = self.pool.is_full();
        if full != self.saturated {
            self.saturated = full;
            debug!(
                capacity = self.pool.capacity(),
                saturated = full,
                "particle pool saturation changed"
            );
        }
    }

    fn integrate(&mut self, emitters: &[Emitter], obstacles: &[Aabb], room: &Room, report: &mut TickReport) {
        let dt = self.clock.step();
        let trail_every = self.config.trail_every.max(1);
        let bounds = room.bounds();

        let mut released = std::mem::take(&mut self.released);
        released.clear();
        for (idx, p) in self.pool.slots_mut().iter_mut().enumerate() {
            if !p.active {
                continue;
            }
            let fate = advance_particle(p, dt, trail_every, emitters, room, &bounds, obstacles);
            match fate {
                Fate::Alive => continue,
                Fate::Expired => report.expired += 1,
                Fate::OutOfBounds => report.out_of_bounds += 1,
                Fate::Absorbed => report.absorbed += 1,
            }
            released.push(idx);
        }
        for &idx in &released {
            self.pool.release(idx);
        }
        self.released = released;
    }
}

fn obstacle_boxes(scene: &Scene<'_>) -> Vec<Aabb> {
    scene.obstacles.iter().map(Obstacle::bounds).collect()
}

fn advance_particle(
    p: &mut Particle,
    dt: f64,
    trail_every: u32,
    emitters: &[Emitter],
    room: &Room,
    bounds: &Aabb,
    obstacles: &[Aabb],
) -> Fate {
    if !p.is_finite() || !bounds.contains(&p.position) {
        return Fate::OutOfBounds;
    }

    if p.is_suction {
        if let Some(e) = emitters.iter().find(|e| Some(e.id) == p.emitter) {
            p.velocity = e.sink_velocity(&p.position);
        }
    } else {
        p.velocity.z += p.buoyancy * dt;
        let horizontal = p.velocity.x.hypot(p.velocity.y);
        if p.is_horizontal
            && room.height - p.position.z < CEILING_BAND
            && horizontal > ATTACHED_SPEED
        {
            p.velocity.z = 0.0;
        }
    }
    p.velocity *= p.drag;
    p.position += p.velocity * dt;
    p.age += dt;
    p.steps += 1;

    collide_room(p, bounds);
    for b in obstacles {
        collide_box(p, b);
    }

    if p.steps % trail_every == 0 {
        let pos = p.position;
        p.trail.push(pos);
    }

    if !p.is_finite() || !bounds.contains(&p.position) {
        Fate::OutOfBounds
    } else if p.is_suction && (p.position - p.intake).norm() < ABSORB_RADIUS {
        Fate::Absorbed
    } else if p.is_expired() {
        Fate::Expired
    } else {
        Fate::Alive
    }
}

/// Bounce off floor, ceiling and walls.
fn collide_room(p: &mut Particle, bounds: &Aabb) {
    for axis in 0..3 {
        let (lo, hi) = (bounds.min[axis], bounds.max[axis]);
        let hit = if p.position[axis] < lo {
            p.position[axis] = lo;
            p.velocity[axis] < 0.0
        } else if p.position[axis] > hi {
            p.position[axis] = hi;
            p.velocity[axis] > 0.0
        } else {
            false
        };
        if hit {
            bounce(&mut p.velocity, axis);
        }
    }
}

/// Push a particle that entered an obstacle back out through the nearest face.
fn collide_box(p: &mut Particle, b: &Aabb) {
    if !b.contains(&p.position) {
        return;
    }
    let (axis, sign) = b.nearest_face(&p.position);
    p.position[axis] = if sign > 0.0 { b.max[axis] } else { b.min[axis] };
    if p.velocity[axis] * sign < 0.0 {
        bounce(&mut p.velocity, axis);
    }
}

fn bounce(v: &mut Vec3, axis: usize) {
    for k in 0..3 {
        if k == axis {
            v[k] = -v[k] * RESTITUTION;
        } else {
            v[k] *= TANGENTIAL_DAMPING;
        }
    }
}
