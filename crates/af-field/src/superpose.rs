//! Superposition of all jets at one point.

use crate::room::{Obstacle, ObstacleKind, PlacedDiffuser, Room};
use af_core::Vec3;
use af_core::numeric::{finite_or_zero, non_negative, safe_div};

/// Velocity factor for a jet whose path crosses a wall block.
pub const WALL_SHADOW: f64 = 0.15;

/// Velocity factor inside a furniture footprint below its top.
pub const FURNITURE_INSIDE: f64 = 0.3;

/// Velocity factor in the band around a furniture footprint.
pub const FURNITURE_NEAR: f64 = 0.7;

/// Width of the band around furniture that still slows the flow (m).
pub const FURNITURE_MARGIN: f64 = 0.3;

/// Combined flow at one point of the room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointFlow {
    pub velocity: Vec3,
    /// Mixed air temperature (°C)
    pub temperature: f64,
    /// False inside a wall block.
    pub valid: bool,
}

impl PointFlow {
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

/// Whether `p` lies over the footprint of any wall block.
///
/// Wall blocks cut the room shape at every height; only the path shadow
/// depends on their vertical extent.
pub fn inside_wall(p: &Vec3, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|o| o.kind == ObstacleKind::WallBlock && o.bounds().contains_xy(p.x, p.y))
}

/// Superpose every usable jet at `p`.
///
/// Velocity vectors add. Temperature mixes each jet's supply temperature by
/// its supply fraction; fractions summing past one are scaled back so the
/// mix never overshoots the supply temperatures.
pub fn flow_at(
    p: &Vec3,
    room: &Room,
    diffusers: &[PlacedDiffuser],
    obstacles: &[Obstacle],
) -> PointFlow {
    let room_temp = finite_or_zero(room.temperature);
    if inside_wall(p, obstacles) {
        return PointFlow {
            velocity: Vec3::zeros(),
            temperature: room_temp,
            valid: false,
        };
    }

    let mut velocity = Vec3::zeros();
    let mut phi_total = 0.0;
    let mut phi_temp = 0.0;
    for d in diffusers {
        let Some(jet) = d.jet() else { continue };
        let nozzle = d.nozzle(room);
        let mut s = jet.sample(&(p - nozzle));
        if obstacles
            .iter()
            .any(|o| o.is_wall() && o.bounds().intersects_segment(&nozzle, p))
        {
            s.velocity *= WALL_SHADOW;
            s.supply_fraction *= WALL_SHADOW;
        }
        velocity += s.velocity;
        phi_total += s.supply_fraction;
        phi_temp += s.supply_fraction * jet.supply_temp();
    }

    if phi_total > 1.0 {
        phi_temp = safe_div(phi_temp, phi_total);
        phi_total = 1.0;
    }
    let temperature = phi_temp + (1.0 - phi_total) * room_temp;

    velocity *= furniture_factor(p, obstacles);
    if !velocity.iter().all(|c| c.is_finite()) {
        velocity = Vec3::zeros();
    }
    PointFlow {
        velocity,
        temperature: finite_or_zero(temperature),
        valid: true,
    }
}

/// Strongest slow-down any furniture piece applies at `p`.
fn furniture_factor(p: &Vec3, obstacles: &[Obstacle]) -> f64 {
    obstacles
        .iter()
        .filter(|o| o.kind == ObstacleKind::Furniture && p.z <= o.top())
        .map(|o| {
            let b = o.bounds();
            if b.contains_xy(p.x, p.y) {
                FURNITURE_INSIDE
            } else if b.contains_xy_within(p.x, p.y, FURNITURE_MARGIN) {
                FURNITURE_NEAR
            } else {
                1.0
            }
        })
        .fold(1.0, f64::min)
}

/// Turbulence intensity in percent.
///
/// Low speeds are dominated by room-scale fluctuation, temperature contrast
/// adds mixing.
pub fn turbulence_intensity(speed: f64, temperature: f64, room_temp: f64) -> f64 {
    let v = non_negative(speed);
    let dt = finite_or_zero(temperature - room_temp).abs();
    let tu = 100.0 * (0.10 + 0.35 * (-v / 0.25).exp() + 0.02 * dt);
    tu.clamp(5.0, 60.0)
}

/// Effective draft temperature (K): `(t − t_room) − 8·(v − 0.15)`.
pub fn effective_draft_temperature(speed: f64, temperature: f64, room_temp: f64) -> f64 {
    finite_or_zero(temperature - room_temp) - 8.0 * (non_negative(speed) - 0.15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_core::Id;

    fn wall(x: f64, y: f64, w: f64, l: f64) -> Obstacle {
        Obstacle {
            id: Id::from_index(0),
            kind: ObstacleKind::WallBlock,
            x,
            y,
            z: 0.0,
            width: w,
            length: l,
            height: 3.0,
        }
    }

    #[test]
    fn empty_room_is_still_air() {
        let room = Room::default();
        let f = flow_at(&Vec3::new(1.0, 1.0, 1.1), &room, &[], &[]);
        assert!(f.valid);
        assert_eq!(f.speed(), 0.0);
        assert_eq!(f.temperature, room.temperature);
    }

    #[test]
    fn inside_wall_is_invalid() {
        let room = Room::default();
        let f = flow_at(&Vec3::new(1.0, 1.0, 1.1), &room, &[], &[wall(0.5, 0.5, 1.0, 1.0)]);
        assert!(!f.valid);
    }

    #[test]
    fn low_wall_block_still_cuts_the_room() {
        let room = Room::default();
        let mut low = wall(0.5, 0.5, 1.0, 1.0);
        low.height = 1.0;
        let f = flow_at(&Vec3::new(1.0, 1.0, 1.1), &room, &[], &[low]);
        assert!(!f.valid);
        assert!(flow_at(&Vec3::new(2.0, 1.0, 1.1), &room, &[], &[low]).valid);
    }

    #[test]
    fn furniture_slows_flow() {
        let mut desk = wall(1.0, 1.0, 1.0, 1.0);
        desk.kind = ObstacleKind::Furniture;
        desk.height = 0.75;
        let obstacles = [desk];
        assert_eq!(furniture_factor(&Vec3::new(1.5, 1.5, 0.5), &obstacles), FURNITURE_INSIDE);
        assert_eq!(furniture_factor(&Vec3::new(2.2, 1.5, 0.5), &obstacles), FURNITURE_NEAR);
        assert_eq!(furniture_factor(&Vec3::new(3.0, 1.5, 0.5), &obstacles), 1.0);
        // Above the desk top nothing changes.
        assert_eq!(furniture_factor(&Vec3::new(1.5, 1.5, 1.1), &obstacles), 1.0);
    }

    #[test]
    fn turbulence_bounds() {
        assert!((turbulence_intensity(0.0, 24.0, 24.0) - 45.0).abs() < 1e-9);
        assert!((turbulence_intensity(10.0, 24.0, 24.0) - 10.0).abs() < 1e-9);
        assert_eq!(turbulence_intensity(0.0, 0.0, 24.0), 60.0);
        assert!(turbulence_intensity(f64::NAN, 24.0, 24.0).is_finite());
    }

    #[test]
    fn edt_reference() {
        assert!((effective_draft_temperature(0.15, 24.0, 24.0)).abs() < 1e-12);
        assert!((effective_draft_temperature(0.40, 22.0, 24.0) - (-4.0)).abs() < 1e-12);
    }
}
