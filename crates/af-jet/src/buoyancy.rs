//! Thermal buoyancy of supply jets.
//!
//! Sign convention: the temperature difference is taken as supply minus room,
//! so a cooling jet has a negative Archimedes number and sinks, a heating jet
//! a positive one and rises.

use af_core::numeric::{finite_or_zero, safe_div};
use af_core::units::constants::{G0_MPS2, ZERO_CELSIUS_K};
use af_core::units::{celsius, to_kelvin};

/// Archimedes number `g·Δt·L / (T_room·v0²)`.
///
/// # Arguments
///
/// * `supply_c` - Supply air temperature (°C)
/// * `room_c` - Room air temperature (°C)
/// * `char_length` - Equivalent nozzle diameter (m)
/// * `v0` - Nozzle exit velocity (m/s)
pub fn archimedes(supply_c: f64, room_c: f64, char_length: f64, v0: f64) -> f64 {
    let dt = finite_or_zero(supply_c - room_c);
    let room_k = to_kelvin(celsius(finite_or_zero(room_c)));
    safe_div(G0_MPS2 * dt * char_length, room_k * v0 * v0)
}

/// Buoyant acceleration of supply air in room air (m/s², positive up).
///
/// Equal to `Ar·v0²/L`; kept separate so a zero-velocity jet still gets a
/// finite value.
pub fn acceleration(supply_c: f64, room_c: f64) -> f64 {
    let dt = finite_or_zero(supply_c - room_c);
    safe_div(G0_MPS2 * dt, finite_or_zero(room_c) + ZERO_CELSIUS_K)
}

/// Velocity reduction from buoyancy along the jet path.
///
/// The local Archimedes number grows with distance as the jet slows:
/// ```text
/// Ar_s = |Ar| · (s / L) · (v0 / vc)²
/// factor = 1 / sqrt(1 + Ar_s)
/// ```
pub fn path_attenuation(ar: f64, s: f64, char_length: f64, v0: f64, vc: f64) -> f64 {
    if vc <= 0.0 || s <= 0.0 {
        return 1.0;
    }
    let ratio = safe_div(v0, vc);
    let ar_s = ar.abs() * safe_div(s, char_length) * ratio * ratio;
    1.0 / (1.0 + finite_or_zero(ar_s)).sqrt()
}

/// Slope at which a detached ceiling jet descends (m drop per m travelled).
///
/// Cold jets fall faster, warm jets cling to the ceiling.
pub fn descent_slope(ar: f64) -> f64 {
    const BASE: f64 = 0.6;
    const GAIN: f64 = 800.0;
    let ar = finite_or_zero(ar);
    let slope = if ar < 0.0 {
        BASE * (1.0 + GAIN * -ar)
    } else {
        BASE / (1.0 + GAIN * ar)
    };
    slope.clamp(0.1, 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooling_gives_negative_archimedes() {
        let ar = archimedes(20.0, 24.0, 0.18, 6.8);
        assert!(ar < 0.0);
        assert!(ar > -1e-2);
        assert!(archimedes(30.0, 24.0, 0.18, 6.8) > 0.0);
        assert_eq!(archimedes(24.0, 24.0, 0.18, 6.8), 0.0);
    }

    #[test]
    fn zero_velocity_is_finite() {
        assert_eq!(archimedes(20.0, 24.0, 0.18, 0.0), 0.0);
        assert!(acceleration(20.0, 24.0) < 0.0);
        assert!(acceleration(f64::NAN, 24.0).is_finite());
    }

    #[test]
    fn attenuation_grows_with_distance() {
        let near = path_attenuation(-5e-4, 1.0, 0.18, 6.8, 3.0);
        let far = path_attenuation(-5e-4, 6.0, 0.18, 6.8, 0.5);
        assert!(near <= 1.0);
        assert!(far < near);
        assert_eq!(path_attenuation(0.0, 6.0, 0.18, 6.8, 0.5), 1.0);
    }

    #[test]
    fn cold_jets_descend_steeper() {
        assert!(descent_slope(-5e-4) > descent_slope(0.0));
        assert!(descent_slope(5e-4) < descent_slope(0.0));
    }
}
