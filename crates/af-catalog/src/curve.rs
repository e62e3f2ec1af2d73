//! Tabulated operating points and piecewise-linear lookup.

use af_core::numeric::{lerp, safe_div};
use serde::{Deserialize, Serialize};

/// One catalog operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// Volume flow (m³/h)
    pub q: f64,
    /// Total pressure drop (Pa)
    pub dp: f64,
    /// Sound power level (dB(A))
    pub lwa: f64,
    /// Isothermal throw to the terminal velocity (m)
    pub throw: f64,
}

/// Operating curve of one mode at one nozzle size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingCurve {
    pub mode: String,
    pub size: u32,
    pub points: Vec<OperatingPoint>,
}

impl OperatingCurve {
    /// Lowest tabulated flow.
    pub fn q_min(&self) -> f64 {
        self.points.first().map_or(0.0, |p| p.q)
    }

    /// Highest tabulated flow.
    pub fn q_max(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.q)
    }

    /// Interpolated operating point at flow `q`.
    ///
    /// Between points the values are interpolated linearly; outside the table
    /// the nearest end point is returned unchanged.
    pub fn at(&self, q: f64) -> OperatingPoint {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return OperatingPoint {
                q,
                dp: 0.0,
                lwa: 0.0,
                throw: 0.0,
            };
        };
        if !q.is_finite() || q <= first.q {
            return *first;
        }
        if q >= last.q {
            return *last;
        }

        // First point with flow above q; points are strictly increasing.
        let hi = self.points.partition_point(|p| p.q <= q);
        let (p0, p1) = (&self.points[hi - 1], &self.points[hi]);
        let t = safe_div(q - p0.q, p1.q - p0.q);
        OperatingPoint {
            q,
            dp: lerp(p0.dp, p1.dp, t),
            lwa: lerp(p0.lwa, p1.lwa, t),
            throw: lerp(p0.throw, p1.throw, t),
        }
    }

    /// Structural check used by the catalog loader.
    pub(crate) fn check(&self) -> Result<(), &'static str> {
        if self.points.len() < 2 {
            return Err("needs at least two points");
        }
        for p in &self.points {
            let values = [p.q, p.dp, p.lwa, p.throw];
            if values.iter().any(|v| !v.is_finite()) {
                return Err("non-finite value");
            }
            if values.iter().any(|v| *v < 0.0) {
                return Err("negative value");
            }
        }
        if self.points.windows(2).any(|w| w[1].q <= w[0].q) {
            return Err("flow not strictly increasing");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> OperatingCurve {
        OperatingCurve {
            mode: "vertical".into(),
            size: 200,
            points: vec![
                OperatingPoint {
                    q: 100.0,
                    dp: 10.0,
                    lwa: 20.0,
                    throw: 1.0,
                },
                OperatingPoint {
                    q: 200.0,
                    dp: 40.0,
                    lwa: 30.0,
                    throw: 2.0,
                },
                OperatingPoint {
                    q: 400.0,
                    dp: 160.0,
                    lwa: 40.0,
                    throw: 3.0,
                },
            ],
        }
    }

    #[test]
    fn interpolates_between_points() {
        let p = curve().at(300.0);
        assert!((p.dp - 100.0).abs() < 1e-12);
        assert!((p.lwa - 35.0).abs() < 1e-12);
        assert!((p.throw - 2.5).abs() < 1e-12);
    }

    #[test]
    fn exact_points_are_returned() {
        let p = curve().at(200.0);
        assert_eq!(p.dp, 40.0);
        assert_eq!(p.throw, 2.0);
    }

    #[test]
    fn clamps_outside_table() {
        let c = curve();
        assert_eq!(c.at(10.0), c.points[0]);
        assert_eq!(c.at(1e9), c.points[2]);
        assert_eq!(c.at(f64::NAN), c.points[0]);
    }

    #[test]
    fn check_rejects_unsorted() {
        let mut c = curve();
        c.points.swap(0, 1);
        assert_eq!(c.check(), Err("flow not strictly increasing"));
        c.points.truncate(1);
        assert_eq!(c.check(), Err("needs at least two points"));
    }
}
