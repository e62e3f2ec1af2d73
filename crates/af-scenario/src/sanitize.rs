//! Clamping of out-of-range user input.
//!
//! Everything here runs at the input boundary so the solvers never see a
//! negative room or a probe floating outside the walls.

use crate::schema::Scenario;
use af_field::grid::MIN_GRID_STEP;
use tracing::warn;

/// Smallest accepted room width and length (m).
pub const MIN_ROOM_SIDE: f64 = 0.5;

/// Largest accepted room width and length (m).
pub const MAX_ROOM_SIDE: f64 = 100.0;

/// Accepted room heights (m).
pub const ROOM_HEIGHT: (f64, f64) = (1.0, 20.0);

/// Coarsest accepted grid step (m).
pub const MAX_GRID_STEP: f64 = 2.0;

/// One value that was moved into range.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub field: String,
    pub from: f64,
    pub to: f64,
}

/// Clamp `value` into `[lo, hi]`, recording and logging any change.
///
/// Infinities land on the matching bound; NaN is left for validation to
/// reject.
pub(crate) fn clamp_value(
    out: &mut Vec<Adjustment>,
    field: impl FnOnce() -> String,
    value: &mut f64,
    lo: f64,
    hi: f64,
) {
    if value.is_nan() {
        return;
    }
    let clamped = value.clamp(lo, hi.max(lo));
    if clamped != *value {
        let field = field();
        warn!(%field, from = *value, to = clamped, "input clamped");
        out.push(Adjustment {
            field,
            from: *value,
            to: clamped,
        });
        *value = clamped;
    }
}

/// Move every dimension and position of a scenario into range.
pub fn sanitize(scenario: &mut Scenario) -> Vec<Adjustment> {
    let mut out = Vec::new();
    let room = &mut scenario.room;
    clamp_value(&mut out, || "room width".into(), &mut room.width, MIN_ROOM_SIDE, MAX_ROOM_SIDE);
    clamp_value(&mut out, || "room length".into(), &mut room.length, MIN_ROOM_SIDE, MAX_ROOM_SIDE);
    clamp_value(&mut out, || "room height".into(), &mut room.height, ROOM_HEIGHT.0, ROOM_HEIGHT.1);
    let (w, l, h) = (room.width, room.length, room.height);

    for (i, d) in scenario.diffusers.iter_mut().enumerate() {
        clamp_value(&mut out, || format!("diffuser {i} x"), &mut d.x, 0.0, w);
        clamp_value(&mut out, || format!("diffuser {i} y"), &mut d.y, 0.0, l);
    }

    for (i, o) in scenario.obstacles.iter_mut().enumerate() {
        clamp_value(&mut out, || format!("obstacle {i} x"), &mut o.x, 0.0, w);
        clamp_value(&mut out, || format!("obstacle {i} y"), &mut o.y, 0.0, l);
        clamp_value(&mut out, || format!("obstacle {i} z"), &mut o.z, 0.0, h);
        clamp_value(&mut out, || format!("obstacle {i} width"), &mut o.width, 0.0, w - o.x);
        clamp_value(&mut out, || format!("obstacle {i} length"), &mut o.length, 0.0, l - o.y);
        clamp_value(&mut out, || format!("obstacle {i} height"), &mut o.height, 0.0, h - o.z);
    }

    for (i, p) in scenario.probes.iter_mut().enumerate() {
        clamp_value(&mut out, || format!("probe {i} x"), &mut p.x, 0.0, w);
        clamp_value(&mut out, || format!("probe {i} y"), &mut p.y, 0.0, l);
        clamp_value(&mut out, || format!("probe {i} z"), &mut p.z, 0.0, h);
    }

    let field = &mut scenario.view.field;
    clamp_value(&mut out, || "view grid_step".into(), &mut field.grid_step, MIN_GRID_STEP, MAX_GRID_STEP);
    clamp_value(&mut out, || "view slice_height".into(), &mut field.slice_height, 0.0, h);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ObstacleDef, ProbeDef};
    use af_field::{ObstacleKind, Room};

    #[test]
    fn negative_room_gets_minimum() {
        let mut s = Scenario::empty("bad", Room::new(-3.0, 4.0, 0.0, 24.0));
        let adj = sanitize(&mut s);
        assert_eq!(s.room.width, MIN_ROOM_SIDE);
        assert_eq!(s.room.height, ROOM_HEIGHT.0);
        assert_eq!(adj.len(), 3); // width, height, slice height
        assert_eq!(adj[0].field, "room width");
    }

    #[test]
    fn probes_and_obstacles_pulled_inside() {
        let mut s = Scenario::empty("outside", Room::default());
        s.probes.push(ProbeDef {
            x: 7.0,
            y: -1.0,
            z: 1.1,
        });
        s.obstacles.push(ObstacleDef {
            kind: ObstacleKind::Furniture,
            x: 5.5,
            y: 1.0,
            z: 0.0,
            width: 2.0,
            length: -1.0,
            height: 0.75,
        });
        sanitize(&mut s);
        assert_eq!((s.probes[0].x, s.probes[0].y), (6.0, 0.0));
        assert_eq!(s.obstacles[0].width, 0.5);
        assert_eq!(s.obstacles[0].length, 0.0);
    }

    #[test]
    fn infinite_room_clamped_to_maximum() {
        let mut s = Scenario::empty("endless", Room::new(f64::INFINITY, 5.0, f64::NEG_INFINITY, 24.0));
        let adj = sanitize(&mut s);
        assert_eq!(s.room.width, MAX_ROOM_SIDE);
        assert_eq!(s.room.height, ROOM_HEIGHT.0);
        assert_eq!(adj[0].from, f64::INFINITY);
    }

    #[test]
    fn in_range_scenario_untouched() {
        let mut s = Scenario::empty("fine", Room::default());
        let before = s.clone();
        assert!(sanitize(&mut s).is_empty());
        assert_eq!(s, before);
    }
}
