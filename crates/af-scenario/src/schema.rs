//! Scenario schema definitions.

use af_field::{DiffuserSettings, FieldRequest, ObstacleKind, Room};
use af_particles::Projection;
use serde::{Deserialize, Serialize};

/// A room with its diffusers, obstacles and probes, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub room: Room,
    #[serde(default)]
    pub diffusers: Vec<DiffuserDef>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleDef>,
    #[serde(default)]
    pub probes: Vec<ProbeDef>,
    #[serde(default)]
    pub view: ViewDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiffuserDef {
    pub x: f64,
    pub y: f64,
    pub model: String,
    pub mode: String,
    pub size: u32,
    pub flow_m3h: f64,
    pub supply_temp: f64,
}

impl DiffuserDef {
    pub fn settings(&self) -> DiffuserSettings {
        DiffuserSettings {
            model: self.model.clone(),
            mode: self.mode.clone(),
            size: self.size,
            flow_m3h: self.flow_m3h,
            supply_temp: self.supply_temp,
        }
    }

    pub fn from_settings(x: f64, y: f64, settings: &DiffuserSettings) -> Self {
        Self {
            x,
            y,
            model: settings.model.clone(),
            mode: settings.mode.clone(),
            size: settings.size,
            flow_m3h: settings.flow_m3h,
            supply_temp: settings.supply_temp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObstacleDef {
    pub kind: ObstacleKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeDef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Display settings that also drive the field solve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ViewDef {
    #[serde(default)]
    pub field: FieldRequest,
    #[serde(default)]
    pub projection: Projection,
}

impl Scenario {
    pub fn empty(name: impl Into<String>, room: Room) -> Self {
        Self {
            version: crate::LATEST_VERSION,
            name: name.into(),
            room,
            diffusers: Vec::new(),
            obstacles: Vec::new(),
            probes: Vec::new(),
            view: ViewDef::default(),
        }
    }
}
