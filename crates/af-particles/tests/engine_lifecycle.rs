//! Particle engine lifecycle over full advance calls.

use af_catalog::Catalog;
use af_core::{Id, Vec3};
use af_field::{DiffuserSettings, PlacedDiffuser, Room};
use af_particles::{ParticleConfig, ParticleEngine, Projection, Scene, project_particles};

fn diffuser(model: &str, mode: &str, size: u32, flow: f64, room: &Room) -> PlacedDiffuser {
    let catalog = Catalog::builtin().unwrap();
    let settings = DiffuserSettings {
        model: model.into(),
        mode: mode.into(),
        size,
        flow_m3h: flow,
        supply_temp: 18.0,
    };
    PlacedDiffuser::new(Id::from_index(0), 3.0, 2.5, settings, &catalog, room)
}

fn positions(engine: &ParticleEngine) -> Vec<Vec3> {
    engine.particles().map(|p| p.position).collect()
}

#[test]
fn full_pool_stalls_instead_of_growing() {
    let room = Room::default();
    let diffusers = vec![diffuser("VSD", "swirl", 200, 600.0, &room)];
    let scene = Scene::new(&room, &diffusers, &[]);
    let config = ParticleConfig {
        spawn_per_mps: 100.0,
        max_spawn_per_step: 500,
        life_s: (1000.0, 1000.0),
        ..ParticleConfig::default()
    };
    let mut engine = ParticleEngine::new(config);

    let mut stalled = 0;
    for _ in 0..8 {
        let report = engine.advance(0.25, &scene);
        assert!(report.active <= 4000);
        stalled += report.stalled;
    }
    assert_eq!(engine.capacity(), 4000);
    assert_eq!(engine.active_count(), 4000);
    assert!(stalled > 0);

    let report = engine.advance(0.25, &scene);
    assert_eq!(report.spawned, 0);
    assert_eq!(report.active, 4000);
}

#[test]
fn respawn_clears_trail() {
    let room = Room::default();
    let diffusers = vec![diffuser("VSD", "vertical", 200, 600.0, &room)];
    let scene = Scene::new(&room, &diffusers, &[]);
    let config = ParticleConfig {
        capacity: 1,
        life_s: (0.2, 0.2),
        ..ParticleConfig::default()
    };
    let mut engine = ParticleEngine::new(config);

    let mut saw_trail = false;
    let mut expired = false;
    for _ in 0..100 {
        let report = engine.step(&scene);
        if report.expired > 0 {
            expired = true;
            break;
        }
        saw_trail |= engine.particles().any(|p| !p.trail.is_empty());
    }
    assert!(expired);
    assert!(saw_trail);
    assert_eq!(engine.active_count(), 0);

    let report = engine.step(&scene);
    assert_eq!(report.spawned, 1);
    let p = engine.particles().next().unwrap();
    assert_eq!(p.steps, 1);
    assert!(p.trail.is_empty());
}

#[test]
fn suction_tracers_reach_the_intake() {
    let room = Room::default();
    let diffusers = vec![diffuser("RGX", "extract", 300, 500.0, &room)];
    let scene = Scene::new(&room, &diffusers, &[]);
    let config = ParticleConfig {
        life_s: (10.0, 10.0),
        ..ParticleConfig::default()
    };
    let mut engine = ParticleEngine::new(config);

    let mut absorbed = 0;
    for _ in 0..40 {
        absorbed += engine.advance(0.25, &scene).absorbed;
    }
    assert!(absorbed > 0);
    assert!(engine.particles().all(|p| p.is_suction));
}

#[test]
fn same_seed_same_motion() {
    let room = Room::default();
    let diffusers = vec![diffuser("CQD", "four_way", 450, 600.0, &room)];
    let scene = Scene::new(&room, &diffusers, &[]);
    let mut a = ParticleEngine::new(ParticleConfig::default());
    let mut b = ParticleEngine::new(ParticleConfig::default());
    for _ in 0..20 {
        a.advance(0.05, &scene);
        b.advance(0.05, &scene);
    }
    assert!(a.active_count() > 0);
    assert_eq!(positions(&a), positions(&b));

    a.reset();
    assert_eq!(a.active_count(), 0);
    assert_eq!(a.elapsed(), 0.0);
}

#[test]
fn paused_engine_holds_state() {
    let room = Room::default();
    let diffusers = vec![diffuser("VSD", "vertical", 200, 600.0, &room)];
    let scene = Scene::new(&room, &diffusers, &[]);
    let mut engine = ParticleEngine::new(ParticleConfig::default());
    engine.advance(0.1, &scene);
    let before = positions(&engine);

    engine.pause();
    assert!(engine.is_paused());
    let report = engine.advance(0.25, &scene);
    assert_eq!(report.steps, 0);
    assert_eq!(engine.step(&scene).steps, 0);
    assert_eq!(positions(&engine), before);

    engine.resume();
    assert!(engine.advance(0.1, &scene).steps > 0);
}

#[test]
fn shrinking_room_drops_outside_particles() {
    let room = Room::default();
    let diffusers = vec![diffuser("VSD", "horizontal", 200, 600.0, &room)];
    let mut engine = ParticleEngine::new(ParticleConfig::default());
    engine.advance(0.25, &Scene::new(&room, &diffusers, &[]));
    assert!(engine.active_count() > 0);

    let small = Room::new(1.0, 1.0, 1.0, 24.0);
    let report = engine.step(&Scene::new(&small, &[], &[]));
    assert!(report.out_of_bounds > 0);
    assert_eq!(report.spawned, 0);
    assert!(engine.particles().all(|p| small.contains(&p.position)));
}

#[test]
fn errored_diffuser_spawns_nothing() {
    let room = Room::default();
    let diffusers = vec![diffuser("VSD", "vertical", 200, 20.0, &room)];
    assert!(diffusers[0].result().error.is_some());
    let mut engine = ParticleEngine::new(ParticleConfig::default());
    let report = engine.advance(0.25, &Scene::new(&room, &diffusers, &[]));
    assert!(report.steps > 0);
    assert_eq!(report.spawned, 0);
}

#[test]
fn every_view_projects_every_particle() {
    let room = Room::default();
    let diffusers = vec![diffuser("VSD", "swirl", 200, 600.0, &room)];
    let mut engine = ParticleEngine::new(ParticleConfig::default());
    engine.advance(0.25, &Scene::new(&room, &diffusers, &[]));

    for view in [
        Projection::Side,
        Projection::Top,
        Projection::Isometric(Default::default()),
    ] {
        let drawn = project_particles(&engine, &view, &room);
        assert_eq!(drawn.len(), engine.active_count());
        assert!(drawn.windows(2).all(|w| w[0].at.depth >= w[1].at.depth));
    }
}
