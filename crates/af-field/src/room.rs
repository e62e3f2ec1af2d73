//! Room geometry and the objects placed in it.

use af_catalog::Catalog;
use af_core::{Aabb, DiffuserId, ObstacleId, ProbeId, Vec3};
use af_jet::{DEFAULT_WORKZONE_HEIGHT, Jet, PerformanceQuery, PerformanceResult, evaluate};
use serde::{Deserialize, Serialize};

/// Rectangular room with the origin at a floor corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Extent along x (m)
    pub width: f64,
    /// Extent along y (m)
    pub length: f64,
    /// Floor to ceiling (m)
    pub height: f64,
    /// Room air temperature (°C)
    pub temperature: f64,
}

impl Default for Room {
    fn default() -> Self {
        Self {
            width: 6.0,
            length: 5.0,
            height: 3.0,
            temperature: 24.0,
        }
    }
}

impl Room {
    pub fn new(width: f64, length: f64, height: f64, temperature: f64) -> Self {
        Self {
            width,
            length,
            height,
            temperature,
        }
    }

    /// Whether the floor area or height vanishes or is not a finite number.
    pub fn is_degenerate(&self) -> bool {
        ![self.width, self.length, self.height]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_origin_size(
            Vec3::zeros(),
            Vec3::new(self.width, self.length, self.height),
        )
    }

    pub fn contains(&self, p: &Vec3) -> bool {
        self.bounds().contains(p)
    }

    pub fn centre(&self) -> Vec3 {
        Vec3::new(0.5 * self.width, 0.5 * self.length, 0.5 * self.height)
    }
}

/// User-editable parameters of one diffuser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffuserSettings {
    pub model: String,
    pub mode: String,
    pub size: u32,
    /// Volume flow (m³/h)
    pub flow_m3h: f64,
    /// Supply air temperature (°C)
    pub supply_temp: f64,
}

/// A diffuser mounted in the ceiling at `(x, y)`.
///
/// Holds its last evaluation and the jet kernel built from it; both are
/// rebuilt by [`PlacedDiffuser::refresh`] whenever the settings or the room
/// change.
#[derive(Debug, Clone)]
pub struct PlacedDiffuser {
    pub id: DiffuserId,
    pub x: f64,
    pub y: f64,
    pub settings: DiffuserSettings,
    result: PerformanceResult,
    jet: Option<Jet>,
}

impl PlacedDiffuser {
    pub fn new(
        id: DiffuserId,
        x: f64,
        y: f64,
        settings: DiffuserSettings,
        catalog: &Catalog,
        room: &Room,
    ) -> Self {
        let mut diffuser = Self {
            id,
            x,
            y,
            settings,
            result: PerformanceResult::default(),
            jet: None,
        };
        diffuser.refresh(catalog, room);
        diffuser
    }

    /// Query for the current settings with the nozzle on the ceiling.
    pub fn query(&self, room: &Room) -> PerformanceQuery {
        PerformanceQuery::new(
            self.settings.model.clone(),
            self.settings.mode.clone(),
            self.settings.size,
            self.settings.flow_m3h,
            self.settings.supply_temp,
            room.temperature,
        )
        .with_heights(room.height, DEFAULT_WORKZONE_HEIGHT.min(room.height))
    }

    /// Re-evaluate against the catalog and rebuild the jet kernel.
    pub fn refresh(&mut self, catalog: &Catalog, room: &Room) {
        self.result = evaluate(catalog, &self.query(room));
        self.jet = Jet::from_result(&self.result);
    }

    pub fn result(&self) -> &PerformanceResult {
        &self.result
    }

    /// Jet kernel, `None` while the configuration is unusable.
    pub fn jet(&self) -> Option<&Jet> {
        self.jet.as_ref()
    }

    /// Nozzle position in room coordinates.
    pub fn nozzle(&self, room: &Room) -> Vec3 {
        Vec3::new(self.x, self.y, room.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Desks, cabinets: slow the flow around them.
    Furniture,
    /// Partitions and columns: block the flow and are excluded from comfort.
    WallBlock,
}

/// Axis-aligned box standing in the room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_origin_size(
            Vec3::new(self.x, self.y, self.z),
            Vec3::new(self.width, self.length, self.height),
        )
    }

    /// Top surface height (m).
    pub fn top(&self) -> f64 {
        self.bounds().max.z
    }

    pub fn is_wall(&self) -> bool {
        self.kind == ObstacleKind::WallBlock
    }
}

/// Measurement point placed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    pub id: ProbeId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Probe {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_core::Id;

    fn settings() -> DiffuserSettings {
        DiffuserSettings {
            model: "VSD".into(),
            mode: "vertical".into(),
            size: 200,
            flow_m3h: 600.0,
            supply_temp: 20.0,
        }
    }

    #[test]
    fn placed_diffuser_tracks_room() {
        let catalog = Catalog::builtin().unwrap();
        let mut room = Room::default();
        let mut d = PlacedDiffuser::new(Id::from_index(0), 3.0, 2.5, settings(), &catalog, &room);
        assert!(d.jet().is_some());
        assert_eq!(d.result().mounting_height, 3.0);
        assert_eq!(d.nozzle(&room).z, 3.0);

        room.height = 4.0;
        d.refresh(&catalog, &room);
        assert_eq!(d.result().mounting_height, 4.0);
    }

    #[test]
    fn unusable_settings_drop_the_jet() {
        let catalog = Catalog::builtin().unwrap();
        let room = Room::default();
        let mut d = PlacedDiffuser::new(Id::from_index(0), 3.0, 2.5, settings(), &catalog, &room);
        d.settings.size = 999;
        d.refresh(&catalog, &room);
        assert!(d.jet().is_none());
        assert!(d.result().error.is_some());
    }

    #[test]
    fn degenerate_rooms() {
        assert!(!Room::default().is_degenerate());
        assert!(Room::new(0.0, 5.0, 3.0, 24.0).is_degenerate());
        assert!(Room::new(f64::NAN, 5.0, 3.0, 24.0).is_degenerate());
        assert!(Room::new(f64::INFINITY, 5.0, 3.0, 24.0).is_degenerate());
        assert!(Room::new(6.0, 5.0, f64::INFINITY, 24.0).is_degenerate());
    }
}
