use af_catalog::Catalog;
use af_field::{FieldRequest, ObstacleKind, Room};
use af_particles::{Camera, Projection};
use af_scenario::*;

fn catalog() -> Catalog {
    Catalog::builtin().unwrap()
}

fn furnished() -> Scenario {
    let mut scenario = Scenario::empty("Furnished", Room::new(7.0, 5.0, 2.8, 23.5));
    scenario.diffusers.push(DiffuserDef {
        x: 2.0,
        y: 2.5,
        model: "VSD".into(),
        mode: "vertical".into(),
        size: 200,
        flow_m3h: 600.0,
        supply_temp: 18.0,
    });
    scenario.diffusers.push(DiffuserDef {
        x: 6.5,
        y: 4.5,
        model: "RGX".into(),
        mode: "extract".into(),
        size: 300,
        flow_m3h: 600.0,
        supply_temp: 23.5,
    });
    scenario.obstacles.push(ObstacleDef {
        kind: ObstacleKind::Furniture,
        x: 1.0,
        y: 1.0,
        z: 0.0,
        width: 1.6,
        length: 0.8,
        height: 0.75,
    });
    scenario.probes.push(ProbeDef {
        x: 3.0,
        y: 2.5,
        z: 1.1,
    });
    scenario.view = ViewDef {
        field: FieldRequest {
            grid_step: 0.5,
            slice_height: 1.7,
        },
        projection: Projection::Isometric(Camera::default()),
    };
    scenario
}

#[test]
fn roundtrip_yaml_empty_scenario() {
    let catalog = catalog();
    let scenario = Scenario::empty("Empty", Room::default());
    let path = std::env::temp_dir().join("af_scenario_roundtrip_empty.yaml");

    save_yaml(&path, &scenario, &catalog).unwrap();
    let loaded = load_yaml(&path, &catalog).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_yaml_furnished_scenario() {
    let catalog = catalog();
    let scenario = furnished();
    let path = std::env::temp_dir().join("af_scenario_roundtrip_furnished.yaml");

    save_yaml(&path, &scenario, &catalog).unwrap();
    let loaded = load(&path, &catalog).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_json_furnished_scenario() {
    let catalog = catalog();
    let scenario = furnished();
    let path = std::env::temp_dir().join("af_scenario_roundtrip_furnished.json");

    save_json(&path, &scenario, &catalog).unwrap();
    let loaded = load(&path, &catalog).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn unknown_model_is_rejected_on_save() {
    let catalog = catalog();
    let mut scenario = furnished();
    scenario.diffusers[0].model = "NOPE".into();
    let path = std::env::temp_dir().join("af_scenario_unknown_model.yaml");

    let err = save_yaml(&path, &scenario, &catalog).unwrap_err();
    assert!(matches!(
        err,
        ScenarioError::Validation(ValidationError::MissingReference { .. })
    ));
}

#[test]
fn out_of_range_values_are_clamped_on_load() {
    let catalog = catalog();
    let yaml = "\
version: 1
name: Sloppy
room: { width: 4.0, length: 3.0, height: 2.5, temperature: 22.0 }
probes:
  - { x: 9.0, y: 1.0, z: 1.1 }
";
    let path = std::env::temp_dir().join("af_scenario_sloppy.yaml");
    std::fs::write(&path, yaml).unwrap();

    let loaded = load_yaml(&path, &catalog).unwrap();
    assert_eq!(loaded.probes[0].x, 4.0);
    assert_eq!(loaded.view, ViewDef::default());
}

#[test]
fn unsupported_extension() {
    let catalog = catalog();
    let path = std::env::temp_dir().join("af_scenario.toml");
    assert!(matches!(
        load(&path, &catalog),
        Err(ScenarioError::Extension { .. })
    ));
}
