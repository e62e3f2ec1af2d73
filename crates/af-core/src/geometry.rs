//! Vector alias and axis-aligned boxes.
//!
//! The engine works in room coordinates: `x` along the room width, `y` along
//! its length and `z` up from the floor, all in metres.

use nalgebra::Vector3;

/// 3D vector for positions, offsets and velocities.
pub type Vec3 = Vector3<f64>;

/// Axis-aligned box in room coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Build from an origin corner and non-negative extents.
    pub fn from_origin_size(origin: Vec3, size: Vec3) -> Self {
        let size = size.map(|s| if s.is_finite() { s.max(0.0) } else { 0.0 });
        Self {
            min: origin,
            max: origin + size,
        }
    }

    pub fn contains(&self, p: &Vec3) -> bool {
        self.contains_xy(p.x, p.y) && p.z >= self.min.z && p.z <= self.max.z
    }

    /// Footprint test ignoring height.
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        x >= self.min.x && x <= self.max.x && y >= self.min.y && y <= self.max.y
    }

    /// Footprint test with the footprint grown by `margin` on every side.
    pub fn contains_xy_within(&self, x: f64, y: f64, margin: f64) -> bool {
        x >= self.min.x - margin
            && x <= self.max.x + margin
            && y >= self.min.y - margin
            && y <= self.max.y + margin
    }

    /// Whether the open segment `a → b` passes through the box (slab test).
    pub fn intersects_segment(&self, a: &Vec3, b: &Vec3) -> bool {
        let dir = b - a;
        let mut t_min: f64 = 0.0;
        let mut t_max: f64 = 1.0;

        for axis in 0..3 {
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if dir[axis].abs() < 1e-12 {
                if a[axis] < lo || a[axis] > hi {
                    return false;
                }
                continue;
            }
            let inv = 1.0 / dir[axis];
            let mut t0 = (lo - a[axis]) * inv;
            let mut t1 = (hi - a[axis]) * inv;
            if t0 > t1 {
                core::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }
        true
    }

    /// Axis (0..3) and outward sign of the face nearest to an interior point.
    pub fn nearest_face(&self, p: &Vec3) -> (usize, f64) {
        let mut best = (0, -1.0);
        let mut best_depth = f64::INFINITY;
        for axis in 0..3 {
            let to_min = p[axis] - self.min[axis];
            let to_max = self.max[axis] - p[axis];
            if to_min < best_depth {
                best_depth = to_min;
                best = (axis, -1.0);
            }
            if to_max < best_depth {
                best_depth = to_max;
                best = (axis, 1.0);
            }
        }
        best
    }
}
