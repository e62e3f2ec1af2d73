//! Comfort classification and the Air Diffusion Performance Index.

use crate::grid::{FieldGrid, GridPoint};
use af_core::numeric::safe_div;
use serde::Serialize;
use std::fmt;

/// Comfort class of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComfortClass {
    /// Air barely moving (< 0.10 m/s).
    Stagnant,
    /// Too cold or too fast.
    Draft,
    /// Counts toward ADPI.
    Comfort,
    /// Neither stagnant nor drafty, but outside the comfort band.
    Transition,
}

impl ComfortClass {
    /// Classify a speed and effective draft temperature; first match wins.
    pub fn classify(v: f64, edt: f64) -> Self {
        if v < 0.10 {
            ComfortClass::Stagnant
        } else if edt < -3.0 || v > 0.35 {
            ComfortClass::Draft
        } else if (-3.0..2.0).contains(&edt) && v > 0.15 && v <= 0.35 {
            ComfortClass::Comfort
        } else {
            ComfortClass::Transition
        }
    }

    /// Class of a grid cell, `None` for excluded cells.
    pub fn of(point: &GridPoint) -> Option<Self> {
        point.valid.then(|| Self::classify(point.v, point.edt))
    }
}

impl fmt::Display for ComfortClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComfortClass::Stagnant => "stagnant",
            ComfortClass::Draft => "draft",
            ComfortClass::Comfort => "comfort",
            ComfortClass::Transition => "transition",
        })
    }
}

/// Comfort statistics over the valid cells of one slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComfortReport {
    pub valid: usize,
    pub stagnant: usize,
    pub draft: usize,
    pub comfort: usize,
    pub transition: usize,
    /// Share of valid cells in the comfort class (%)
    pub adpi: f64,
    pub mean_velocity: f64,
    pub max_velocity: f64,
    pub mean_temperature: f64,
}

/// Classify every valid cell and aggregate.
pub fn analyze(grid: &FieldGrid) -> ComfortReport {
    let mut report = ComfortReport::default();
    let mut v_sum = 0.0;
    let mut t_sum = 0.0;
    for p in grid.points() {
        let Some(class) = ComfortClass::of(p) else {
            continue;
        };
        report.valid += 1;
        match class {
            ComfortClass::Stagnant => report.stagnant += 1,
            ComfortClass::Draft => report.draft += 1,
            ComfortClass::Comfort => report.comfort += 1,
            ComfortClass::Transition => report.transition += 1,
        }
        v_sum += p.v;
        t_sum += p.t;
        report.max_velocity = report.max_velocity.max(p.v);
    }

    let n = report.valid as f64;
    report.adpi = (100.0 * safe_div(report.comfort as f64, n)).clamp(0.0, 100.0);
    report.mean_velocity = safe_div(v_sum, n);
    report.mean_temperature = if report.valid == 0 {
        grid.room_temp
    } else {
        t_sum / n
    };
    report
}
