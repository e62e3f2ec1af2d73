use crate::{AfError, AfResult};

/// Floating point type used throughout the engine
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> AfResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(AfError::NonFinite { what, value: v })
    }
}

/// Replace NaN and infinities with zero.
///
/// Interactive inputs pass through transient nonsense (half-typed widths,
/// zero flows); every public output goes through this before leaving a solver.
#[inline]
pub fn finite_or_zero(v: Real) -> Real {
    if v.is_finite() { v } else { 0.0 }
}

/// Division that yields zero for a vanishing or non-finite denominator.
#[inline]
pub fn safe_div(num: Real, den: Real) -> Real {
    if den.abs() < Real::EPSILON || !den.is_finite() {
        0.0
    } else {
        finite_or_zero(num / den)
    }
}

/// Clamp to `[0, +inf)`, mapping NaN to zero.
#[inline]
pub fn non_negative(v: Real) -> Real {
    finite_or_zero(v).max(0.0)
}

/// Linear interpolation between `a` and `b` at fraction `t`.
#[inline]
pub fn lerp(a: Real, b: Real, t: Real) -> Real {
    a + (b - a) * t
}
