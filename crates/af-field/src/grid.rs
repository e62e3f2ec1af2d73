//! Horizontal slice of the room sampled on a regular grid.

use crate::room::{Obstacle, PlacedDiffuser, Room};
use crate::superpose::{effective_draft_temperature, flow_at, turbulence_intensity};
use af_core::Vec3;
use af_core::numeric::non_negative;
use af_core::timing::Timer;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Smallest grid spacing accepted (m).
pub const MIN_GRID_STEP: f64 = 0.05;

/// Largest grid solved; a 100 m square room at [`MIN_GRID_STEP`].
pub const MAX_GRID_CELLS: usize = 4_000_000;

/// Slice settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRequest {
    /// Cell size (m), clamped to at least [`MIN_GRID_STEP`]
    pub grid_step: f64,
    /// Height of the evaluated plane above the floor (m)
    pub slice_height: f64,
}

impl Default for FieldRequest {
    fn default() -> Self {
        Self {
            grid_step: 0.25,
            slice_height: 1.1,
        }
    }
}

/// Flow state at one cell centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
    pub vector: Vec3,
    /// Speed (m/s)
    pub v: f64,
    /// Air temperature (°C)
    pub t: f64,
    /// Effective draft temperature (K)
    pub edt: f64,
    /// Turbulence intensity (%)
    pub turbulence: f64,
    /// False inside wall blocks; such cells take no part in comfort statistics.
    pub valid: bool,
}

/// Result of one field solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGrid {
    pub nx: usize,
    pub ny: usize,
    pub step: f64,
    pub slice_height: f64,
    pub room_temp: f64,
    points: Vec<GridPoint>,
}

impl FieldGrid {
    fn empty(step: f64, slice_height: f64, room_temp: f64) -> Self {
        Self {
            nx: 0,
            ny: 0,
            step,
            slice_height,
            room_temp,
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Row-major index of cell `(i, j)`.
    pub fn index(&self, i: usize, j: usize) -> Option<usize> {
        (i < self.nx && j < self.ny).then(|| j * self.nx + i)
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&GridPoint> {
        self.index(i, j).map(|idx| &self.points[idx])
    }

    /// Cell containing the floor position `(x, y)`.
    ///
    /// The cell holds the values at its centre. A probe reproduces them only
    /// at [`FieldGrid::cell_centre`]; elsewhere in the cell it reads the local
    /// flow, which may differ.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<&GridPoint> {
        if !(x >= 0.0 && y >= 0.0) || self.step <= 0.0 {
            return None;
        }
        let i = (x / self.step).floor() as usize;
        let j = (y / self.step).floor() as usize;
        self.get(i, j)
    }

    /// Centre of cell `(i, j)` on the slice plane.
    pub fn cell_centre(&self, i: usize, j: usize) -> Vec3 {
        Vec3::new(
            (i as f64 + 0.5) * self.step,
            (j as f64 + 0.5) * self.step,
            self.slice_height,
        )
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// Rows of constant `y`, from `j = 0` upward.
    pub fn rows(&self) -> impl Iterator<Item = &[GridPoint]> {
        self.points.chunks(self.nx.max(1))
    }
}

/// Solve one slice from scratch.
pub fn compute_field(
    room: &Room,
    diffusers: &[PlacedDiffuser],
    obstacles: &[Obstacle],
    request: &FieldRequest,
) -> FieldGrid {
    let step = if request.grid_step.is_finite() {
        request.grid_step.max(MIN_GRID_STEP)
    } else {
        MIN_GRID_STEP
    };
    let slice_height = non_negative(request.slice_height);
    if room.is_degenerate() {
        return FieldGrid::empty(step, slice_height, room.temperature);
    }

    let nx = (room.width / step).ceil() as usize;
    let ny = (room.length / step).ceil() as usize;
    let Some(cells) = nx.checked_mul(ny).filter(|n| *n <= MAX_GRID_CELLS) else {
        warn!(nx, ny, max = MAX_GRID_CELLS, "field grid too large, skipped");
        return FieldGrid::empty(step, slice_height, room.temperature);
    };

    let timer = Timer::start("compute_field");
    let mut grid = FieldGrid {
        nx,
        ny,
        step,
        slice_height,
        room_temp: room.temperature,
        points: vec![blank(room.temperature); cells],
    };

    let fill_row = |(j, row): (usize, &mut [GridPoint])| {
        for (i, cell) in row.iter_mut().enumerate() {
            let p = Vec3::new((i as f64 + 0.5) * step, (j as f64 + 0.5) * step, slice_height);
            *cell = grid_point(&p, room, diffusers, obstacles);
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        grid.points.par_chunks_mut(nx).enumerate().for_each(fill_row);
    }
    #[cfg(not(feature = "parallel"))]
    grid.points.chunks_mut(nx).enumerate().for_each(fill_row);

    let active = diffusers.iter().filter(|d| d.jet().is_some()).count();
    debug!(
        nx,
        ny,
        step,
        slice_height,
        diffusers = active,
        obstacles = obstacles.len(),
        elapsed_s = ?timer.stop(),
        "field solved"
    );
    grid
}

/// Derived cell values at one point; shared with the probe.
pub(crate) fn grid_point(
    p: &Vec3,
    room: &Room,
    diffusers: &[PlacedDiffuser],
    obstacles: &[Obstacle],
) -> GridPoint {
    let flow = flow_at(p, room, diffusers, obstacles);
    let v = flow.speed();
    GridPoint {
        x: p.x,
        y: p.y,
        vector: flow.velocity,
        v,
        t: flow.temperature,
        edt: effective_draft_temperature(v, flow.temperature, room.temperature),
        turbulence: turbulence_intensity(v, flow.temperature, room.temperature),
        valid: flow.valid,
    }
}

fn blank(room_temp: f64) -> GridPoint {
    GridPoint {
        x: 0.0,
        y: 0.0,
        vector: Vec3::zeros(),
        v: 0.0,
        t: room_temp,
        edt: 0.0,
        turbulence: 0.0,
        valid: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_rooms_give_empty_grids() {
        let request = FieldRequest::default();
        let infinite = Room::new(f64::INFINITY, 5.0, 3.0, 24.0);
        assert!(compute_field(&infinite, &[], &[], &request).is_empty());
        let huge = Room::new(1e6, 1e6, 3.0, 24.0);
        assert!(compute_field(&huge, &[], &[], &request).is_empty());
    }

    #[test]
    fn grid_dimensions_round_up() {
        let room = Room::new(6.1, 5.0, 3.0, 24.0);
        let grid = compute_field(&room, &[], &[], &FieldRequest::default());
        assert_eq!(grid.nx, 25);
        assert_eq!(grid.ny, 20);
        assert_eq!(grid.len(), 500);
        let c = grid.get(0, 0).unwrap();
        assert_eq!((c.x, c.y), (0.125, 0.125));
        assert!(c.valid);
    }

    #[test]
    fn tiny_step_is_clamped() {
        let room = Room::new(1.02, 1.0, 3.0, 24.0);
        let grid = compute_field(
            &room,
            &[],
            &[],
            &FieldRequest {
                grid_step: 0.001,
                slice_height: 1.1,
            },
        );
        assert_eq!(grid.step, MIN_GRID_STEP);
        assert_eq!(grid.nx, 21);
    }

    #[test]
    fn degenerate_room_gives_empty_grid() {
        let room = Room::new(0.0, 5.0, 3.0, 24.0);
        let grid = compute_field(&room, &[], &[], &FieldRequest::default());
        assert!(grid.is_empty());
        assert!(grid.cell_at(0.1, 0.1).is_none());
        assert_eq!(grid.rows().count(), 0);
    }

    #[test]
    fn cell_lookup() {
        let room = Room::default();
        let grid = compute_field(&room, &[], &[], &FieldRequest::default());
        let c = grid.cell_at(1.3, 0.6).unwrap();
        assert_eq!((c.x, c.y), (1.375, 0.625));
        assert!(grid.cell_at(-0.1, 1.0).is_none());
        assert!(grid.cell_at(6.1, 1.0).is_none());
        assert_eq!(grid.rows().count(), grid.ny);
    }
}
