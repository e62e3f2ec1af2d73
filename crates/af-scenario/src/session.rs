//! Live state of one room being edited.

use crate::sanitize::{Adjustment, clamp_value, sanitize};
use crate::schema::{DiffuserDef, ObstacleDef, ProbeDef, Scenario, ViewDef};
use crate::validate::LATEST_VERSION;
use crate::{ScenarioError, ScenarioResult};
use af_catalog::Catalog;
use af_core::{DiffuserId, Id, ObstacleId, ProbeId};
use af_field::{
    ComfortReport, DiffuserSettings, FieldGrid, Obstacle, PlacedDiffuser, Probe, ProbeSample, Room,
    analyze, compute_field, sample,
};
use af_particles::Scene;
use std::sync::Arc;
use tracing::debug;

/// Owner of the room, its contents and the shared catalog.
///
/// Every mutation keeps the cached performance of the affected diffusers
/// current; field, comfort and probe readings are computed on demand.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Arc<Catalog>,
    name: String,
    room: Room,
    diffusers: Vec<PlacedDiffuser>,
    obstacles: Vec<Obstacle>,
    probes: Vec<Probe>,
    pub view: ViewDef,
    next_id: Id,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, name: impl Into<String>, room: Room) -> Self {
        let mut scenario = Scenario::empty(name, room);
        sanitize(&mut scenario);
        Self::build(catalog, scenario)
    }

    /// Build from a scenario, clamping it first.
    pub fn from_scenario(catalog: Arc<Catalog>, mut scenario: Scenario) -> Self {
        sanitize(&mut scenario);
        Self::build(catalog, scenario)
    }

    fn build(catalog: Arc<Catalog>, scenario: Scenario) -> Self {
        let mut session = Self {
            catalog,
            name: scenario.name,
            room: scenario.room,
            diffusers: Vec::new(),
            obstacles: Vec::new(),
            probes: Vec::new(),
            view: scenario.view,
            next_id: Id::from_index(0),
        };
        for d in &scenario.diffusers {
            session.add_diffuser(d.x, d.y, d.settings());
        }
        for o in &scenario.obstacles {
            session.add_obstacle(o.clone());
        }
        for p in &scenario.probes {
            session.add_probe(p.x, p.y, p.z);
        }
        session
    }

    /// Snapshot for saving.
    pub fn to_scenario(&self) -> Scenario {
        Scenario {
            version: LATEST_VERSION,
            name: self.name.clone(),
            room: self.room,
            diffusers: self
                .diffusers
                .iter()
                .map(|d| DiffuserDef::from_settings(d.x, d.y, &d.settings))
                .collect(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleDef {
                    kind: o.kind,
                    x: o.x,
                    y: o.y,
                    z: o.z,
                    width: o.width,
                    length: o.length,
                    height: o.height,
                })
                .collect(),
            probes: self
                .probes
                .iter()
                .map(|p| ProbeDef {
                    x: p.x,
                    y: p.y,
                    z: p.z,
                })
                .collect(),
            view: self.view.clone(),
        }
    }

    fn allocate_id(&mut self) -> Id {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn diffusers(&self) -> &[PlacedDiffuser] {
        &self.diffusers
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    pub fn diffuser(&self, id: DiffuserId) -> Option<&PlacedDiffuser> {
        self.diffusers.iter().find(|d| d.id == id)
    }

    /// Resize the room; everything is clamped back inside and re-evaluated.
    pub fn set_room(&mut self, room: Room) -> Vec<Adjustment> {
        let mut scenario = self.to_scenario();
        scenario.room = room;
        let adjustments = sanitize(&mut scenario);
        self.room = scenario.room;
        self.view = scenario.view;
        for (d, def) in self.diffusers.iter_mut().zip(&scenario.diffusers) {
            d.x = def.x;
            d.y = def.y;
        }
        for (o, def) in self.obstacles.iter_mut().zip(&scenario.obstacles) {
            o.x = def.x;
            o.y = def.y;
            o.z = def.z;
            o.width = def.width;
            o.length = def.length;
            o.height = def.height;
        }
        for (p, def) in self.probes.iter_mut().zip(&scenario.probes) {
            p.x = def.x;
            p.y = def.y;
            p.z = def.z;
        }
        self.refresh_all();
        adjustments
    }

    /// Re-evaluate every diffuser against the catalog.
    pub fn refresh_all(&mut self) {
        for d in &mut self.diffusers {
            d.refresh(&self.catalog, &self.room);
        }
        debug!(diffusers = self.diffusers.len(), "diffusers refreshed");
    }

    fn clamp_xy(&self, what: &str, x: &mut f64, y: &mut f64) {
        let mut log = Vec::new();
        clamp_value(&mut log, || format!("{what} x"), x, 0.0, self.room.width);
        clamp_value(&mut log, || format!("{what} y"), y, 0.0, self.room.length);
    }

    pub fn add_diffuser(&mut self, mut x: f64, mut y: f64, settings: DiffuserSettings) -> DiffuserId {
        self.clamp_xy("diffuser", &mut x, &mut y);
        let id = self.allocate_id();
        let d = PlacedDiffuser::new(id, x, y, settings, &self.catalog, &self.room);
        if let Some(err) = &d.result().error {
            debug!(%id, %err, "diffuser placed with unusable configuration");
        }
        self.diffusers.push(d);
        id
    }

    pub fn update_diffuser(&mut self, id: DiffuserId, settings: DiffuserSettings) -> ScenarioResult<()> {
        let d = self
            .diffusers
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(ScenarioError::UnknownId { kind: "diffuser", id })?;
        d.settings = settings;
        d.refresh(&self.catalog, &self.room);
        Ok(())
    }

    pub fn move_diffuser(&mut self, id: DiffuserId, mut x: f64, mut y: f64) -> ScenarioResult<()> {
        self.clamp_xy("diffuser", &mut x, &mut y);
        let d = self
            .diffusers
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(ScenarioError::UnknownId { kind: "diffuser", id })?;
        d.x = x;
        d.y = y;
        Ok(())
    }

    pub fn remove_diffuser(&mut self, id: DiffuserId) -> ScenarioResult<PlacedDiffuser> {
        let idx = self
            .diffusers
            .iter()
            .position(|d| d.id == id)
            .ok_or(ScenarioError::UnknownId { kind: "diffuser", id })?;
        Ok(self.diffusers.remove(idx))
    }

    pub fn add_obstacle(&mut self, def: ObstacleDef) -> ObstacleId {
        let mut scenario = Scenario::empty("", self.room);
        scenario.obstacles.push(def);
        sanitize(&mut scenario);
        let def = &scenario.obstacles[0];
        let id = self.allocate_id();
        self.obstacles.push(Obstacle {
            id,
            kind: def.kind,
            x: def.x,
            y: def.y,
            z: def.z,
            width: def.width,
            length: def.length,
            height: def.height,
        });
        id
    }

    pub fn move_obstacle(&mut self, id: ObstacleId, mut x: f64, mut y: f64) -> ScenarioResult<()> {
        let (w, l) = (self.room.width, self.room.length);
        let o = self
            .obstacles
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(ScenarioError::UnknownId { kind: "obstacle", id })?;
        let mut log = Vec::new();
        clamp_value(&mut log, || "obstacle x".into(), &mut x, 0.0, w - o.width);
        clamp_value(&mut log, || "obstacle y".into(), &mut y, 0.0, l - o.length);
        o.x = x;
        o.y = y;
        Ok(())
    }

    pub fn remove_obstacle(&mut self, id: ObstacleId) -> ScenarioResult<Obstacle> {
        let idx = self
            .obstacles
            .iter()
            .position(|o| o.id == id)
            .ok_or(ScenarioError::UnknownId { kind: "obstacle", id })?;
        Ok(self.obstacles.remove(idx))
    }

    pub fn add_probe(&mut self, mut x: f64, mut y: f64, mut z: f64) -> ProbeId {
        self.clamp_probe(&mut x, &mut y, &mut z);
        let id = self.allocate_id();
        self.probes.push(Probe { id, x, y, z });
        id
    }

    pub fn move_probe(&mut self, id: ProbeId, mut x: f64, mut y: f64, mut z: f64) -> ScenarioResult<()> {
        self.clamp_probe(&mut x, &mut y, &mut z);
        let p = self
            .probes
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ScenarioError::UnknownId { kind: "probe", id })?;
        p.x = x;
        p.y = y;
        p.z = z;
        Ok(())
    }

    pub fn remove_probe(&mut self, id: ProbeId) -> ScenarioResult<Probe> {
        let idx = self
            .probes
            .iter()
            .position(|p| p.id == id)
            .ok_or(ScenarioError::UnknownId { kind: "probe", id })?;
        Ok(self.probes.remove(idx))
    }

    fn clamp_probe(&self, x: &mut f64, y: &mut f64, z: &mut f64) {
        self.clamp_xy("probe", x, y);
        let mut log = Vec::new();
        clamp_value(&mut log, || "probe z".into(), z, 0.0, self.room.height);
    }

    /// Solve the current slice.
    pub fn field(&self) -> FieldGrid {
        compute_field(&self.room, &self.diffusers, &self.obstacles, &self.view.field)
    }

    pub fn comfort(&self) -> (FieldGrid, ComfortReport) {
        let grid = self.field();
        let report = analyze(&grid);
        (grid, report)
    }

    /// Read every probe.
    pub fn probe_samples(&self) -> Vec<(ProbeId, ProbeSample)> {
        self.probes
            .iter()
            .map(|p| {
                (
                    p.id,
                    sample(&p.position(), &self.room, &self.diffusers, &self.obstacles),
                )
            })
            .collect()
    }

    /// Borrowed view for the particle engine.
    pub fn scene(&self) -> Scene<'_> {
        Scene::new(&self.room, &self.diffusers, &self.obstacles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_field::ObstacleKind;

    fn session() -> Session {
        Session::new(Arc::new(Catalog::builtin().unwrap()), "test", Room::default())
    }

    fn vsd() -> DiffuserSettings {
        DiffuserSettings {
            model: "VSD".into(),
            mode: "vertical".into(),
            size: 200,
            flow_m3h: 600.0,
            supply_temp: 20.0,
        }
    }

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut s = session();
        let d = s.add_diffuser(3.0, 2.5, vsd());
        let p = s.add_probe(1.0, 1.0, 1.1);
        assert_ne!(d, p);
        assert!(s.remove_diffuser(p).is_err());
        assert!(s.remove_probe(p).is_ok());
    }

    #[test]
    fn placements_are_clamped() {
        let mut s = session();
        let d = s.add_diffuser(10.0, -2.0, vsd());
        let placed = s.diffuser(d).unwrap();
        assert_eq!((placed.x, placed.y), (6.0, 0.0));
        let p = s.add_probe(3.0, 2.0, 9.0);
        s.move_probe(p, -1.0, 2.0, 1.0).unwrap();
        assert_eq!(s.probes()[0].x, 0.0);
        s.add_probe(1.0, 1.0, 9.0);
        assert_eq!(s.probes()[1].z, 3.0);
    }

    #[test]
    fn update_refreshes_performance() {
        let mut s = session();
        let d = s.add_diffuser(3.0, 2.5, vsd());
        let before = s.diffuser(d).unwrap().result().v0;
        let mut settings = vsd();
        settings.flow_m3h = 800.0;
        s.update_diffuser(d, settings).unwrap();
        assert!(s.diffuser(d).unwrap().result().v0 > before);
    }

    #[test]
    fn shrinking_room_moves_contents() {
        let mut s = session();
        s.add_diffuser(5.0, 4.0, vsd());
        s.add_obstacle(ObstacleDef {
            kind: ObstacleKind::WallBlock,
            x: 4.0,
            y: 0.0,
            z: 0.0,
            width: 1.0,
            length: 5.0,
            height: 3.0,
        });
        let adj = s.set_room(Room::new(3.0, 3.0, 2.5, 22.0));
        assert!(!adj.is_empty());
        assert_eq!(s.diffusers()[0].x, 3.0);
        assert_eq!(s.diffusers()[0].result().mounting_height, 2.5);
        assert_eq!(s.obstacles()[0].x, 3.0);
        assert_eq!(s.obstacles()[0].width, 0.0);
    }

    #[test]
    fn infinite_room_is_clamped_before_solving() {
        let mut s = session();
        s.add_diffuser(3.0, 2.5, vsd());
        let adj = s.set_room(Room::new(f64::INFINITY, 5.0, 3.0, 24.0));
        assert_eq!(adj.len(), 1);
        assert_eq!(s.room().width, crate::sanitize::MAX_ROOM_SIDE);
        let grid = s.field();
        assert_eq!(grid.nx, 400);
        assert_eq!(grid.ny, 20);
    }

    #[test]
    fn scenario_round_trip() {
        let mut s = session();
        s.add_diffuser(3.0, 2.5, vsd());
        s.add_probe(1.0, 1.0, 1.1);
        let scenario = s.to_scenario();
        let again = Session::from_scenario(Arc::new(Catalog::builtin().unwrap()), scenario.clone());
        assert_eq!(again.to_scenario(), scenario);
    }
}
