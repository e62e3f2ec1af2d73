//! Single-jet sampling kernel.
//!
//! Offsets are measured from the nozzle centre to the sample point in room
//! coordinates (z up). The nozzle sits on the ceiling, so occupied space has
//! negative `z` offsets.

use crate::buoyancy;
use crate::performance::PerformanceResult;
use af_catalog::FlowType;
use af_core::Vec3;
use af_core::numeric::{finite_or_zero, non_negative, safe_div};
use core::f64::consts::{FRAC_PI_2, LN_2};

/// Lateral velocity share of a swirl discharge relative to its axial flow.
const SWIRL_RATIO: f64 = 0.5;

/// Growth of a ceiling wall-jet's thickness per metre travelled.
const WALL_JET_SPREAD: f64 = 0.2;

/// Residual flow between the lobes of a 4-way pattern.
const LOBE_FLOOR: f64 = 0.15;

/// Temperature excess decays faster than velocity (ratio of the two).
const THERMAL_DECAY_RATIO: f64 = 0.8;

/// Decayed flow at one point from one diffuser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JetSample {
    /// Local velocity vector (m/s)
    pub velocity: Vec3,
    /// Fraction of the local air that is supply air from this jet, in [0, 1]
    pub supply_fraction: f64,
}

impl JetSample {
    pub fn zero() -> Self {
        Self {
            velocity: Vec3::zeros(),
            supply_fraction: 0.0,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

/// Jet kernel for one evaluated diffuser.
///
/// The flow-type strategy is fixed at construction; sampling is a pure
/// function of the offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Jet {
    flow_type: FlowType,
    v0: f64,
    q_m3s: f64,
    sqrt_a0: f64,
    char_length: f64,
    decay_k: f64,
    throw: f64,
    ar: f64,
    spread: f64,
    descent_slope: f64,
    supply_temp: f64,
    room_temp: f64,
    mounting_height: f64,
}

impl Jet {
    /// Kernel for a usable result; `None` when the configuration carries an error.
    pub fn from_result(result: &PerformanceResult) -> Option<Self> {
        if result.error.is_some() {
            return None;
        }
        Self::build(result)
    }

    /// Kernel ignoring the error flag, as long as the numbers describe a jet.
    pub(crate) fn build(result: &PerformanceResult) -> Option<Self> {
        let flow_type = result.flow_type?;
        if !(result.v0 > 0.0 && result.free_area > 0.0) {
            return None;
        }
        Some(Self {
            flow_type,
            v0: result.v0,
            q_m3s: result.flow_m3h / 3600.0,
            sqrt_a0: result.free_area.sqrt(),
            char_length: result.char_length,
            decay_k: result.decay_coefficient,
            throw: result.throw_dist,
            ar: result.ar,
            spread: result.spread_deg.to_radians(),
            descent_slope: buoyancy::descent_slope(result.ar),
            supply_temp: result.supply_temp,
            room_temp: result.room_temp,
            mounting_height: result.mounting_height,
        })
    }

    pub fn flow_type(&self) -> FlowType {
        self.flow_type
    }

    /// Nozzle exit velocity (m/s).
    pub fn v0(&self) -> f64 {
        self.v0
    }

    /// Archimedes number of the discharge.
    pub fn ar(&self) -> f64 {
        self.ar
    }

    /// Catalog throw at the evaluated flow (m).
    pub fn throw(&self) -> f64 {
        self.throw
    }

    /// Discharge spread (radians).
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Radius of the equivalent round nozzle (m).
    pub fn nozzle_radius(&self) -> f64 {
        0.5 * self.char_length
    }

    pub fn supply_temp(&self) -> f64 {
        self.supply_temp
    }

    pub fn room_temp(&self) -> f64 {
        self.room_temp
    }

    pub fn mounting_height(&self) -> f64 {
        self.mounting_height
    }

    /// Buoyant acceleration of the supply air (m/s², positive up).
    pub fn buoyancy_acceleration(&self) -> f64 {
        buoyancy::acceleration(self.supply_temp, self.room_temp)
    }

    /// Isothermal centerline velocity after `s` metres of travel.
    ///
    /// Constant inside the potential core `K·√A0`, then decaying as `1/s`.
    pub fn isothermal_centerline(&self, s: f64) -> f64 {
        let core = self.decay_k * self.sqrt_a0;
        if s <= core {
            self.v0
        } else {
            self.v0 * safe_div(core, s)
        }
    }

    /// Centerline velocity including buoyancy attenuation.
    pub fn centerline(&self, s: f64) -> f64 {
        let vc = self.isothermal_centerline(s);
        vc * buoyancy::path_attenuation(self.ar, s, self.char_length, self.v0, vc)
    }

    /// Decayed flow at `offset` from the nozzle.
    pub fn sample(&self, offset: &Vec3) -> JetSample {
        let velocity = match self.flow_type {
            FlowType::VerticalCone | FlowType::Compact => self.downward(offset, 0.0),
            FlowType::Swirl => self.downward(offset, SWIRL_RATIO),
            FlowType::Horizontal => self.ceiling(offset, 1.0),
            FlowType::FourWay => {
                let weight = self.lobe_weight(offset.x, offset.y);
                self.ceiling(offset, weight)
            }
            FlowType::Suction => self.sink(offset),
        };

        if !velocity.iter().all(|c| c.is_finite()) {
            return JetSample::zero();
        }
        let supply_fraction = if self.flow_type.is_supply() {
            (THERMAL_DECAY_RATIO * safe_div(velocity.norm(), self.v0)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        JetSample {
            velocity,
            supply_fraction,
        }
    }

    /// Axisymmetric jet pointing down, Gaussian radial profile.
    fn downward(&self, offset: &Vec3, swirl: f64) -> Vec3 {
        let s = -offset.z;
        if s <= 0.0 {
            return Vec3::zeros();
        }
        let r = offset.x.hypot(offset.y);
        let half_width = self.nozzle_radius() + s * self.spread.tan();
        let eta = safe_div(r, half_width);
        let speed = self.centerline(s) * (-LN_2 * eta * eta).exp();

        let mut dir = offset.normalize();
        if swirl > 0.0 && r > 1e-9 {
            let tangential = Vec3::new(-offset.y / r, offset.x / r, 0.0);
            dir = (dir + tangential * swirl).normalize();
        }
        dir * speed
    }

    /// Radial wall jet under the ceiling, detaching after its throw.
    fn ceiling(&self, offset: &Vec3, weight: f64) -> Vec3 {
        let r = offset.x.hypot(offset.y);
        if r < 1e-9 || weight <= 0.0 {
            return Vec3::zeros();
        }
        let depth = non_negative(-offset.z);
        let detached = (r - self.throw).max(0.0);
        let centre_depth = detached * self.descent_slope;
        let thickness = self.nozzle_radius() + WALL_JET_SPREAD * r;
        let eta = safe_div(depth - centre_depth, thickness);
        let speed = weight * self.centerline(r) * (-LN_2 * eta * eta).exp();

        let dir = if detached > 0.0 {
            Vec3::new(offset.x / r, offset.y / r, -self.descent_slope).normalize()
        } else {
            Vec3::new(offset.x / r, offset.y / r, 0.0)
        };
        dir * speed
    }

    /// Hemispherical point sink on the ceiling.
    fn sink(&self, offset: &Vec3) -> Vec3 {
        let dist = offset.norm();
        if dist < 1e-9 {
            return Vec3::zeros();
        }
        let speed = safe_div(self.q_m3s, 2.0 * core::f64::consts::PI * dist * dist).min(self.v0);
        -offset / dist * speed
    }

    /// Angular weighting of the four lobes along ±x and ±y.
    fn lobe_weight(&self, dx: f64, dy: f64) -> f64 {
        let width = self.spread.max(1e-3);
        let phi = dy.atan2(dx).rem_euclid(FRAC_PI_2);
        let off_axis = phi.min(FRAC_PI_2 - phi);
        let x = off_axis / width;
        LOBE_FLOOR + (1.0 - LOBE_FLOOR) * (-x * x).exp()
    }

    /// Peak speed on a horizontal plane `depth` below the nozzle, and the
    /// outermost radius where the speed still reaches `threshold`.
    pub fn plane_profile(&self, depth: f64, threshold: f64) -> (f64, f64) {
        const SAMPLES: usize = 400;
        let depth = non_negative(depth);
        let r_max = (2.0 * self.throw + depth + 1.0).min(50.0);
        let speed_at = |r: f64| self.sample(&Vec3::new(r, 0.0, -depth)).speed();

        let mut peak: f64 = 0.0;
        let mut last_above: Option<usize> = None;
        let step = r_max / SAMPLES as f64;
        for i in 0..=SAMPLES {
            let v = speed_at(i as f64 * step);
            peak = peak.max(v);
            if v >= threshold {
                last_above = Some(i);
            }
        }

        let radius = match last_above {
            None => 0.0,
            Some(i) if i == SAMPLES => r_max,
            Some(i) => {
                // Bisect between the last sample above and the next below.
                let (mut lo, mut hi) = (i as f64 * step, (i + 1) as f64 * step);
                for _ in 0..40 {
                    let mid = 0.5 * (lo + hi);
                    if speed_at(mid) >= threshold {
                        lo = mid;
                    } else {
                        hi = mid;
                    }
                }
                0.5 * (lo + hi)
            }
        };
        (finite_or_zero(peak), finite_or_zero(radius))
    }

    /// Distance along a ceiling jet at which its centerline falls to `threshold`.
    pub fn centerline_reach(&self, threshold: f64) -> f64 {
        if threshold <= 0.0 || self.centerline(0.0) < threshold {
            return 0.0;
        }
        let (mut lo, mut hi) = (0.0, 1.0);
        while self.centerline(hi) >= threshold && hi < 100.0 {
            lo = hi;
            hi *= 2.0;
        }
        for _ in 0..50 {
            let mid = 0.5 * (lo + hi);
            if self.centerline(mid) >= threshold {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        finite_or_zero(0.5 * (lo + hi))
    }

    /// Radius around an intake inside which the sink speed exceeds `threshold`.
    pub fn capture_radius(&self, threshold: f64) -> f64 {
        safe_div(self.q_m3s, 2.0 * core::f64::consts::PI * threshold).sqrt()
    }
}
