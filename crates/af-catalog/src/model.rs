//! Product families, discharge modes and nozzle geometry.

use crate::curve::OperatingCurve;
use af_core::units::{m2, mm, to_m};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discharge pattern of a mode.
///
/// Each variant selects one jet-sampling and particle-spawning strategy; the
/// choice is made once when a diffuser is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    /// Axisymmetric jet discharged straight down in a cone.
    VerticalCone,
    /// Radial jet attached to the ceiling in all directions.
    Horizontal,
    /// Wide, rotating downward discharge.
    Swirl,
    /// Narrow long-throw jet.
    Compact,
    /// Four ceiling jets along the room axes.
    FourWay,
    /// Extract: air converges on the intake.
    Suction,
}

impl FlowType {
    /// Whether this mode supplies air into the room.
    pub fn is_supply(self) -> bool {
        !matches!(self, FlowType::Suction)
    }

    /// Whether the jet travels along the ceiling before dropping.
    pub fn is_ceiling_jet(self) -> bool {
        matches!(self, FlowType::Horizontal | FlowType::FourWay)
    }

    pub fn label(self) -> &'static str {
        match self {
            FlowType::VerticalCone => "vertical cone",
            FlowType::Horizontal => "horizontal",
            FlowType::Swirl => "swirl",
            FlowType::Compact => "compact",
            FlowType::FourWay => "4-way",
            FlowType::Suction => "suction",
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One discharge setting of a product family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mode {
    pub id: String,
    pub name: String,
    pub flow_type: FlowType,
    /// Cone half-angle (vertical, compact, swirl) or lobe half-width (4-way), degrees.
    #[serde(default)]
    pub spread_deg: f64,
}

/// Outline of the diffuser face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceShape {
    Round,
    Square,
}

/// Geometry of one nozzle size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    /// Nominal size (mm)
    pub size: u32,
    pub face: FaceShape,
    /// Face diameter (round) or side length (square), mm
    pub a: f64,
    /// Visible face height, mm
    pub b: f64,
    /// Neck diameter, mm
    pub c: f64,
    /// Overall height, mm
    pub d: f64,
    /// Free-area factor (0, 1]
    pub f0: f64,
    /// Supported flow range [min, max] in m³/h
    pub flow: [f64; 2],
}

impl Spec {
    /// Face area in m².
    pub fn face_area(&self) -> f64 {
        let a = to_m(mm(self.a));
        match self.face {
            FaceShape::Round => core::f64::consts::FRAC_PI_4 * a * a,
            FaceShape::Square => a * a,
        }
    }

    /// Effective free area `f0 · face_area` in m².
    pub fn free_area(&self) -> af_core::units::Area {
        m2(self.f0 * self.face_area())
    }

    pub fn flow_min(&self) -> f64 {
        self.flow[0]
    }

    pub fn flow_max(&self) -> f64 {
        self.flow[1]
    }

    pub fn supports_flow(&self, q: f64) -> bool {
        q >= self.flow_min() && q <= self.flow_max()
    }

    /// Nearest supported flow.
    pub fn clamp_flow(&self, q: f64) -> f64 {
        q.clamp(self.flow_min(), self.flow_max())
    }

    /// Outer radius of the face in metres (half the width for square faces).
    pub fn face_radius(&self) -> f64 {
        0.5 * to_m(mm(self.a))
    }
}

/// A product family with its modes, sizes and performance tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffuserModel {
    pub id: String,
    pub name: String,
    pub modes: Vec<Mode>,
    pub specs: Vec<Spec>,
    #[serde(default)]
    pub curves: Vec<OperatingCurve>,
}

impl DiffuserModel {
    pub fn mode(&self, id: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.id == id)
    }

    pub fn spec(&self, size: u32) -> Option<&Spec> {
        self.specs.iter().find(|s| s.size == size)
    }

    pub fn curve(&self, mode: &str, size: u32) -> Option<&OperatingCurve> {
        self.curves
            .iter()
            .find(|c| c.mode == mode && c.size == size)
    }

    /// Sizes offered for a mode, ascending.
    pub fn sizes_for(&self, mode: &str) -> Vec<u32> {
        let mut sizes: Vec<u32> = self
            .curves
            .iter()
            .filter(|c| c.mode == mode)
            .map(|c| c.size)
            .collect();
        sizes.sort_unstable();
        sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(face: FaceShape) -> Spec {
        Spec {
            size: 200,
            face,
            a: 200.0,
            b: 145.0,
            c: 198.0,
            d: 290.0,
            f0: 0.5,
            flow: [150.0, 900.0],
        }
    }

    #[test]
    fn face_areas() {
        let round = spec(FaceShape::Round);
        assert!((round.face_area() - 0.031_415_926).abs() < 1e-6);
        let square = spec(FaceShape::Square);
        assert!((square.face_area() - 0.04).abs() < 1e-12);
        assert!((square.free_area().value - 0.02).abs() < 1e-12);
    }

    #[test]
    fn flow_clamping() {
        let s = spec(FaceShape::Round);
        assert_eq!(s.clamp_flow(50.0), 150.0);
        assert_eq!(s.clamp_flow(1000.0), 900.0);
        assert!(s.supports_flow(600.0));
        assert!(!s.supports_flow(50.0));
    }

    #[test]
    fn flow_type_tags() {
        assert!(FlowType::FourWay.is_ceiling_jet());
        assert!(!FlowType::Swirl.is_ceiling_jet());
        assert!(!FlowType::Suction.is_supply());
        assert_eq!(FlowType::FourWay.to_string(), "4-way");
    }
}
