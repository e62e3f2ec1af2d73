//! Catalog lookup and derived jet parameters for one diffuser.

use crate::buoyancy;
use crate::error::PerformanceError;
use crate::jet::Jet;
use crate::{
    COVERAGE_THRESHOLD, DEFAULT_MOUNTING_HEIGHT, DEFAULT_WORKZONE_HEIGHT, THROW_TERMINAL_VELOCITY,
};
use af_catalog::{Catalog, FlowType};
use af_core::numeric::{finite_or_zero, non_negative, safe_div};
use af_core::units::{m3ph, mean_velocity};
use serde::{Deserialize, Serialize};
use uom::si::area::square_meter;
use uom::si::velocity::meter_per_second;

/// Inputs of one performance evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceQuery {
    pub model: String,
    pub mode: String,
    /// Nominal nozzle size (mm)
    pub size: u32,
    /// Volume flow (m³/h)
    pub flow_m3h: f64,
    /// Supply air temperature (°C)
    pub supply_temp: f64,
    /// Room air temperature (°C)
    pub room_temp: f64,
    /// Nozzle height above the floor (m)
    #[serde(default = "default_mounting_height")]
    pub mounting_height: f64,
    /// Top of the occupied zone (m)
    #[serde(default = "default_workzone_height")]
    pub workzone_height: f64,
}

fn default_mounting_height() -> f64 {
    DEFAULT_MOUNTING_HEIGHT
}

fn default_workzone_height() -> f64 {
    DEFAULT_WORKZONE_HEIGHT
}

impl PerformanceQuery {
    pub fn new(
        model: impl Into<String>,
        mode: impl Into<String>,
        size: u32,
        flow_m3h: f64,
        supply_temp: f64,
        room_temp: f64,
    ) -> Self {
        Self {
            model: model.into(),
            mode: mode.into(),
            size,
            flow_m3h,
            supply_temp,
            room_temp,
            mounting_height: DEFAULT_MOUNTING_HEIGHT,
            workzone_height: DEFAULT_WORKZONE_HEIGHT,
        }
    }

    pub fn with_heights(mut self, mounting_height: f64, workzone_height: f64) -> Self {
        self.mounting_height = mounting_height;
        self.workzone_height = workzone_height;
        self
    }
}

/// Physical outputs for one diffuser configuration.
///
/// When `error` is set the configuration is unusable. Numeric fields are
/// zero, except for [`PerformanceError::FlowOutOfRange`] where they describe
/// the nearest supported flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceResult {
    /// Nozzle exit velocity (m/s)
    pub v0: f64,
    /// Total pressure drop (Pa)
    pub pressure: f64,
    /// Sound power level (dB(A))
    pub noise: f64,
    /// Throw to 0.5 m/s (m)
    pub throw_dist: f64,
    /// Peak single-jet speed on the workzone plane (m/s)
    pub workzone_velocity: f64,
    /// Radius on the workzone plane where the speed reaches 0.25 m/s (m)
    pub coverage_radius: f64,
    /// Archimedes number; negative for cooling
    pub ar: f64,
    pub flow_type: Option<FlowType>,
    /// Cone half-angle or lobe half-width (degrees)
    pub spread_deg: f64,
    /// Flow actually evaluated after clamping (m³/h)
    pub flow_m3h: f64,
    /// Effective free area (m²)
    pub free_area: f64,
    /// Equivalent nozzle diameter (m)
    pub char_length: f64,
    pub decay_coefficient: f64,
    pub supply_temp: f64,
    pub room_temp: f64,
    pub mounting_height: f64,
    pub workzone_height: f64,
    pub error: Option<PerformanceError>,
}

impl PerformanceResult {
    fn failed(error: PerformanceError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Jet kernel for this result, `None` when the configuration is unusable.
    pub fn jet(&self) -> Option<Jet> {
        Jet::from_result(self)
    }
}

/// Evaluate one diffuser configuration against the catalog.
///
/// Never fails outright: unsupported configurations come back with
/// `error` set so callers can keep showing the diffuser.
pub fn evaluate(catalog: &Catalog, query: &PerformanceQuery) -> PerformanceResult {
    let Some(model) = catalog.model(&query.model) else {
        return PerformanceResult::failed(PerformanceError::UnknownModel {
            model: query.model.clone(),
        });
    };
    let Some(mode) = model.mode(&query.mode) else {
        return PerformanceResult::failed(PerformanceError::UnknownMode {
            model: query.model.clone(),
            mode: query.mode.clone(),
        });
    };
    let (Some(spec), Some(curve)) = (
        model.spec(query.size),
        model.curve(&query.mode, query.size),
    ) else {
        return PerformanceResult::failed(PerformanceError::UnsupportedSize {
            model: query.model.clone(),
            mode: query.mode.clone(),
            size: query.size,
        });
    };

    let requested = query.flow_m3h;
    if !requested.is_finite() || requested <= 0.0 {
        return PerformanceResult::failed(PerformanceError::NoFlow);
    }
    let (q, error) = if spec.supports_flow(requested) {
        (requested, None)
    } else {
        let error = PerformanceError::FlowOutOfRange {
            requested,
            min: spec.flow_min(),
            max: spec.flow_max(),
        };
        (spec.clamp_flow(requested), Some(error))
    };

    let point = curve.at(q);
    let area = spec.free_area();
    let a0 = area.get::<square_meter>();
    let v0 = finite_or_zero(mean_velocity(m3ph(q), area).get::<meter_per_second>());
    let char_length = (4.0 * a0 / core::f64::consts::PI).sqrt();
    let throw = non_negative(point.throw);
    let supply_temp = finite_or_zero(query.supply_temp);
    let room_temp = finite_or_zero(query.room_temp);

    let mut result = PerformanceResult {
        v0,
        pressure: non_negative(point.dp),
        noise: non_negative(point.lwa),
        throw_dist: throw,
        workzone_velocity: 0.0,
        coverage_radius: 0.0,
        ar: buoyancy::archimedes(supply_temp, room_temp, char_length, v0),
        flow_type: Some(mode.flow_type),
        spread_deg: mode.spread_deg,
        flow_m3h: q,
        free_area: a0,
        char_length,
        decay_coefficient: safe_div(THROW_TERMINAL_VELOCITY * throw, v0 * a0.sqrt()),
        supply_temp,
        room_temp,
        mounting_height: non_negative(query.mounting_height),
        workzone_height: non_negative(query.workzone_height),
        error: None,
    };

    if let Some(jet) = Jet::build(&result) {
        let drop = non_negative(result.mounting_height - result.workzone_height);
        let (peak, radius) = jet.plane_profile(drop, COVERAGE_THRESHOLD);
        result.workzone_velocity = peak;
        result.coverage_radius = match mode.flow_type {
            FlowType::Suction => jet.capture_radius(COVERAGE_THRESHOLD),
            FlowType::Horizontal | FlowType::FourWay => {
                radius.max(jet.centerline_reach(COVERAGE_THRESHOLD))
            }
            _ => radius,
        };
    }

    result.error = error;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn reference_point() {
        let r = evaluate(
            &catalog(),
            &PerformanceQuery::new("VSD", "vertical", 200, 600.0, 20.0, 24.0),
        );
        assert!(r.is_ok());
        assert!((r.v0 - 6.80).abs() < 0.02, "v0 = {}", r.v0);
        assert!((r.throw_dist - 6.81).abs() < 1e-9);
        assert!((r.pressure - 63.8).abs() < 1e-9);
        assert!((r.noise - 33.8).abs() < 1e-9);
        assert!(r.ar < 0.0);
        assert!(r.workzone_velocity > 0.0 && r.workzone_velocity < r.v0);
        assert!(r.coverage_radius > 0.0);
        assert_eq!(r.flow_type, Some(FlowType::VerticalCone));
    }

    #[test]
    fn unknown_ids() {
        let cat = catalog();
        let r = evaluate(&cat, &PerformanceQuery::new("XXX", "vertical", 200, 600.0, 20.0, 24.0));
        assert!(matches!(r.error, Some(PerformanceError::UnknownModel { .. })));
        assert_eq!(r.v0, 0.0);
        let r = evaluate(&cat, &PerformanceQuery::new("VSD", "sideways", 200, 600.0, 20.0, 24.0));
        assert!(matches!(r.error, Some(PerformanceError::UnknownMode { .. })));
        assert!(r.jet().is_none());
    }

    #[test]
    fn no_flow() {
        let cat = catalog();
        for q in [0.0, -10.0, f64::NAN] {
            let r = evaluate(&cat, &PerformanceQuery::new("VSD", "vertical", 200, q, 20.0, 24.0));
            assert_eq!(r.error, Some(PerformanceError::NoFlow));
            assert_eq!(r.v0, 0.0);
            assert_eq!(r.throw_dist, 0.0);
        }
    }

    #[test]
    fn isothermal_has_zero_ar() {
        let r = evaluate(
            &catalog(),
            &PerformanceQuery::new("VSD", "vertical", 200, 600.0, 24.0, 24.0),
        );
        assert_eq!(r.ar, 0.0);
    }

    #[test]
    fn suction_coverage_is_capture_radius() {
        let r = evaluate(
            &catalog(),
            &PerformanceQuery::new("RGX", "extract", 300, 500.0, 24.0, 24.0),
        );
        assert!(r.is_ok());
        let expected = ((500.0 / 3600.0) / (2.0 * core::f64::consts::PI * COVERAGE_THRESHOLD)).sqrt();
        assert!((r.coverage_radius - expected).abs() < 1e-9);
    }

    #[test]
    fn ceiling_jets_cover_further_than_their_drop() {
        let r = evaluate(
            &catalog(),
            &PerformanceQuery::new("CQD", "four_way", 450, 600.0, 18.0, 24.0),
        );
        assert!(r.is_ok());
        assert!(r.coverage_radius > 1.0);
    }
}
