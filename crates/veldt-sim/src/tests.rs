//! Tests for the simulation engine: movement, interest management, scenes,
//! spawners, and determinism.

use std::sync::mpsc;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use veldt_core::bestiary::{
    AiProfile, CreatureClass, CreatureTemplate, LootProfile, TemplateRegistry,
};
use veldt_core::commands::SessionCommand;
use veldt_core::components::{Autopilot, Profile, Transform};
use veldt_core::constants::{
    ARRIVE_RADIUS, MAX_SPEED, SNAPSHOT_EVERY, SPRITE_MARGIN, VIEW_RADIUS, WORLD_TICK_EVERY,
};
use veldt_core::error::SceneErrorKind;
use veldt_core::events::OutboundEvent;
use veldt_core::store::{
    CharacterRecord, MemoryCharacterStore, MemorySceneDirectory, SceneConfig, SpawnerConfig,
};
use veldt_core::types::{Position, Velocity};

use crate::engine::{EngineConfig, SimulationEngine};
use crate::scene::SceneStates;
use crate::systems::spawner;

const SCENE: &str = "slag-warrens";

fn warren_config() -> SceneConfig {
    SceneConfig {
        id: SCENE.into(),
        name: "The Slag Warrens".into(),
        width: 800.0,
        height: 450.0,
        entrance_desc: Some("Heaps of cooling slag stretch into the dark.".into()),
        spawners: vec![SpawnerConfig {
            id: "warren-burrow".into(),
            creature_id: "slagrat".into(),
            max_alive: 3,
            respawn_secs: 2.0,
            spawn_x: None,
            spawn_y: None,
        }],
    }
}

fn test_engine(seed: u64) -> (SimulationEngine, Arc<MemoryCharacterStore>) {
    let characters = Arc::new(MemoryCharacterStore::new());
    characters.insert(CharacterRecord {
        id: "wanderer-1".into(),
        display_name: "Wanderer".into(),
        scene_id: SCENE.into(),
        position: Position::new(0.0, 0.0),
    });
    characters.insert(CharacterRecord {
        id: "lurker-2".into(),
        display_name: "Lurker".into(),
        scene_id: SCENE.into(),
        position: Position::new(320.0, 0.0),
    });
    characters.insert(CharacterRecord {
        id: "drifter-3".into(),
        display_name: "Drifter".into(),
        scene_id: SCENE.into(),
        position: Position::new(0.0, 400.0),
    });
    characters.insert(CharacterRecord {
        id: "shade-4".into(),
        display_name: "Shade".into(),
        scene_id: SCENE.into(),
        position: Position::new(0.0, 0.0),
    });
    characters.insert(CharacterRecord {
        id: "lost-soul".into(),
        display_name: "Lost Soul".into(),
        scene_id: "the-void".into(),
        position: Position::new(0.0, 0.0),
    });

    let scenes = Arc::new(MemorySceneDirectory::new());
    scenes.insert(warren_config());

    let engine = SimulationEngine::new(EngineConfig { seed }, characters.clone(), scenes);
    (engine, characters)
}

/// Register a session channel, identify it, and run one tick so the command
/// is processed.
fn connect(
    engine: &mut SimulationEngine,
    session: &str,
    character: &str,
) -> mpsc::Receiver<OutboundEvent> {
    let (tx, rx) = mpsc::channel();
    engine.register_session(session, tx);
    engine.queue_command(SessionCommand::Identify {
        session_id: session.into(),
        character_id: character.into(),
    });
    engine.sim_tick();
    rx
}

fn entity_state(
    engine: &SimulationEngine,
    session: &str,
) -> (Position, Velocity, Option<Position>) {
    let mut query = engine
        .world()
        .query::<(&Transform, &Velocity, &Autopilot, &Profile)>();
    for (_, (transform, velocity, autopilot, profile)) in query.iter() {
        if profile.session_id == session {
            return (transform.position, *velocity, autopilot.target);
        }
    }
    panic!("no entity for session {session}");
}

fn alive_count(engine: &SimulationEngine, creature_id: &str) -> usize {
    engine
        .scenes()
        .get(SCENE)
        .map(|scene| {
            scene
                .creatures
                .iter()
                .filter(|c| c.alive && c.creature_id == creature_id)
                .count()
        })
        .unwrap_or(0)
}

fn last_snapshot(rx: &mpsc::Receiver<OutboundEvent>) -> Option<veldt_core::state::WorldSnapshot> {
    let mut last = None;
    while let Ok(event) = rx.try_recv() {
        if let OutboundEvent::Snapshot(snapshot) = event {
            last = Some(snapshot);
        }
    }
    last
}

// ---- Movement ----

#[test]
fn test_speed_never_exceeds_max() {
    let (mut engine, _) = test_engine(1);
    let _rx = connect(&mut engine, "s1", "wanderer-1");

    let mut hit_max = false;
    for _ in 0..100 {
        engine.queue_command(SessionCommand::Manual {
            session_id: "s1".into(),
            thrust: true,
            heading: 0.0,
        });
        engine.sim_tick();
        let (_, velocity, _) = entity_state(&engine, "s1");
        assert!(
            velocity.speed() <= MAX_SPEED + 1e-9,
            "speed {} exceeds max",
            velocity.speed()
        );
        if (velocity.speed() - MAX_SPEED).abs() < 1e-6 {
            hit_max = true;
        }
    }
    assert!(hit_max, "sustained thrust should reach the speed clamp");
}

#[test]
fn test_autopilot_converges_exactly() {
    let (mut engine, characters) = test_engine(2);
    let _rx = connect(&mut engine, "s1", "wanderer-1");

    engine.queue_command(SessionCommand::MoveTo {
        session_id: "s1".into(),
        x: 200.0,
        y: 0.0,
    });

    let mut arrived_at_tick = None;
    for tick in 0..1000 {
        engine.sim_tick();
        let (position, velocity, target) = entity_state(&engine, "s1");

        // Never overshoots beyond the arrival radius before snapping.
        assert!(
            position.x <= 200.0 + ARRIVE_RADIUS + 1e-9,
            "overshot to {} at tick {tick}",
            position.x
        );
        assert!(position.y.abs() < 1e-6, "drifted laterally to {}", position.y);
        assert!(velocity.speed() <= MAX_SPEED + 1e-9);

        if target.is_none() && arrived_at_tick.is_none() {
            arrived_at_tick = Some(tick);
        }
    }

    assert!(arrived_at_tick.is_some(), "autopilot never arrived");
    let (position, velocity, target) = entity_state(&engine, "s1");
    // Exact, not approximate: arrival snaps onto the target and zeroes
    // velocity.
    assert_eq!(position, Position::new(200.0, 0.0));
    assert_eq!(velocity, Velocity::default());
    assert!(target.is_none());

    // Arrival triggered the opportunistic location write.
    let record = characters.get("wanderer-1").unwrap();
    assert_eq!(record.position, Position::new(200.0, 0.0));
}

#[test]
fn test_autopilot_overrides_manual() {
    let (mut engine, _) = test_engine(3);
    let _rx = connect(&mut engine, "s1", "wanderer-1");

    engine.queue_command(SessionCommand::MoveTo {
        session_id: "s1".into(),
        x: 200.0,
        y: 0.0,
    });

    // Contradictory manual input every tick; the move target must win.
    for _ in 0..1000 {
        engine.queue_command(SessionCommand::Manual {
            session_id: "s1".into(),
            thrust: true,
            heading: std::f64::consts::PI,
        });
        engine.sim_tick();
    }

    let (position, _, target) = entity_state(&engine, "s1");
    assert_eq!(position, Position::new(200.0, 0.0));
    assert!(target.is_none());
}

#[test]
fn test_cancel_autopilot_clears_target() {
    let (mut engine, _) = test_engine(4);
    let _rx = connect(&mut engine, "s1", "wanderer-1");

    engine.queue_command(SessionCommand::MoveTo {
        session_id: "s1".into(),
        x: 200.0,
        y: 0.0,
    });
    for _ in 0..5 {
        engine.sim_tick();
    }
    let (_, _, target) = entity_state(&engine, "s1");
    assert!(target.is_some());

    engine.queue_command(SessionCommand::CancelAutopilot {
        session_id: "s1".into(),
    });
    engine.sim_tick();
    let (_, _, target) = entity_state(&engine, "s1");
    assert!(target.is_none());

    // With no fresh intent the entity coasts to a stop under drag.
    for _ in 0..400 {
        engine.sim_tick();
    }
    let (_, velocity, _) = entity_state(&engine, "s1");
    assert!(velocity.speed() < 1e-3);
}

#[test]
fn test_stale_intent_never_reaccelerates() {
    let (mut engine, _) = test_engine(5);
    let _rx = connect(&mut engine, "s1", "wanderer-1");

    // One thrust intent, then silence.
    engine.queue_command(SessionCommand::Manual {
        session_id: "s1".into(),
        thrust: true,
        heading: 0.0,
    });

    let mut speeds = Vec::new();
    for _ in 0..120 {
        engine.sim_tick();
        let (_, velocity, _) = entity_state(&engine, "s1");
        speeds.push(velocity.speed());
    }

    // The staleness window is 0.5s = 10 ticks; give it one tick of slack
    // and require monotone decay afterwards: drag only, no remembered
    // thrust flag.
    let window = 12;
    assert!(speeds[0] > 0.0, "fresh intent should thrust");
    for pair in speeds[window..].windows(2) {
        assert!(
            pair[1] <= pair[0] + 1e-12,
            "re-accelerated from stale intent: {} -> {}",
            pair[0],
            pair[1]
        );
    }
    assert!(
        speeds[speeds.len() - 1] < speeds[window] / 2.0,
        "drag should decay speed"
    );
}

#[test]
fn test_non_finite_intent_rejected() {
    let (mut engine, _) = test_engine(6);
    let _rx = connect(&mut engine, "s1", "wanderer-1");

    engine.queue_command(SessionCommand::Manual {
        session_id: "s1".into(),
        thrust: true,
        heading: f64::NAN,
    });
    engine.queue_command(SessionCommand::MoveTo {
        session_id: "s1".into(),
        x: f64::INFINITY,
        y: 0.0,
    });
    for _ in 0..10 {
        engine.sim_tick();
    }

    let (position, velocity, target) = entity_state(&engine, "s1");
    assert!(position.x.is_finite() && position.y.is_finite());
    assert_eq!(velocity, Velocity::default(), "rejected intent must not thrust");
    assert!(target.is_none());
}

// ---- Interest management ----

#[test]
fn test_interest_filtering_boundary() {
    let (mut engine, _) = test_engine(7);
    let rx_wanderer = connect(&mut engine, "s1", "wanderer-1"); // (0, 0)
    let rx_lurker = connect(&mut engine, "s2", "lurker-2"); // (320, 0) — exactly VIEW_RADIUS
    let rx_drifter = connect(&mut engine, "s3", "drifter-3"); // (0, 400) — out of range

    assert!((VIEW_RADIUS - 320.0).abs() < f64::EPSILON);
    engine.snapshot_tick();

    let snap = last_snapshot(&rx_wanderer).expect("wanderer snapshot");
    assert_eq!(snap.entities.len(), 2, "self + lurker at the exact boundary");
    let snap = last_snapshot(&rx_lurker).expect("lurker snapshot");
    assert_eq!(snap.entities.len(), 2, "boundary inclusion is symmetric");
    let snap = last_snapshot(&rx_drifter).expect("drifter snapshot");
    assert_eq!(snap.entities.len(), 1, "out of range sees only itself");
}

#[test]
fn test_interest_colocated_always_mutual() {
    let (mut engine, _) = test_engine(8);
    let rx_a = connect(&mut engine, "s1", "wanderer-1"); // (0, 0)
    let rx_b = connect(&mut engine, "s4", "shade-4"); // (0, 0)

    engine.snapshot_tick();

    for rx in [&rx_a, &rx_b] {
        let snap = last_snapshot(rx).expect("snapshot");
        assert_eq!(snap.entities.len(), 2, "co-located entities see each other");
    }
}

#[test]
fn test_snapshot_skips_unidentified_sessions() {
    let (mut engine, _) = test_engine(9);
    let (tx, rx) = mpsc::channel();
    engine.register_session("ghost", tx);

    engine.sim_tick();
    engine.snapshot_tick();

    assert!(
        rx.try_recv().is_err(),
        "no snapshot for an observer with no registered entity"
    );
}

#[test]
fn test_snapshot_time_is_monotonic() {
    let (mut engine, _) = test_engine(10);
    let rx = connect(&mut engine, "s1", "wanderer-1");

    let mut stamps = Vec::new();
    for _ in 0..10 {
        engine.sim_tick();
        engine.snapshot_tick();
        if let Some(snap) = last_snapshot(&rx) {
            stamps.push(snap.time.tick);
        }
    }
    assert!(stamps.windows(2).all(|w| w[1] > w[0]));
}

// ---- Scene state store ----

#[test]
fn test_ensure_is_idempotent() {
    let mut scenes = SceneStates::new();
    let registry = TemplateRegistry::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut next_instance = 1;

    scenes.ensure(SCENE, Some(warren_config()), 0.0);
    scenes.add_occupant(SCENE, "s1", 0.0);
    {
        let scene = scenes.get_mut(SCENE).unwrap();
        let events = spawner::run(scene, &registry, &mut rng, 0.0, &mut next_instance);
        assert_eq!(events.len(), 3);
    }

    // Re-ensure with the same config: creatures and occupants survive.
    scenes.ensure(SCENE, Some(warren_config()), 1.0);
    let scene = scenes.get(SCENE).unwrap();
    assert_eq!(scene.creatures.len(), 3);
    assert_eq!(scene.occupants.len(), 1);
}

#[test]
fn test_get_without_ensure_is_absent() {
    let scenes = SceneStates::new();
    assert!(scenes.get("never-created").is_none());
}

// ---- Spawner & respawn ----

#[test]
fn test_spawner_reaches_exactly_max_alive_in_one_tick() {
    let (mut engine, _) = test_engine(11);
    let rx = connect(&mut engine, "s1", "wanderer-1");

    engine.world_tick();

    assert_eq!(alive_count(&engine, "slagrat"), 3);
    let scene = engine.scenes().get(SCENE).unwrap();
    for creature in &scene.creatures {
        assert!(creature.alive);
        assert_eq!(creature.current_hp, Some(12), "hp seeded from template max");
        assert!(creature.respawn_at_secs.is_none());
    }

    // Occupants received one spawn event per instance, with entrance flavor.
    let mut spawn_events = 0;
    while let Ok(event) = rx.try_recv() {
        if let OutboundEvent::CreatureSpawned { scene_id, entrance_desc, .. } = event {
            assert_eq!(scene_id, SCENE);
            assert!(entrance_desc.is_some());
            spawn_events += 1;
        }
    }
    assert_eq!(spawn_events, 3);
}

#[test]
fn test_spawner_population_never_exceeds_max() {
    let (mut engine, _) = test_engine(12);
    let _rx = connect(&mut engine, "s1", "wanderer-1");

    for _ in 0..10 {
        engine.world_tick();
        assert_eq!(alive_count(&engine, "slagrat"), 3);
    }
    let scene = engine.scenes().get(SCENE).unwrap();
    assert_eq!(scene.creatures.len(), 3, "no duplicate instances");
}

#[test]
fn test_respawn_timing_and_population_slot() {
    let (mut engine, _) = test_engine(13);
    let _rx = connect(&mut engine, "s1", "wanderer-1");
    engine.world_tick();

    let instance_id = engine.scenes().get(SCENE).unwrap().creatures[0].instance_id;
    assert!(engine.mark_creature_dead(SCENE, instance_id));
    let respawn_at = engine.scenes().get(SCENE).unwrap().creatures[0]
        .respawn_at_secs
        .expect("death schedules revival");

    let mut revived = false;
    for _ in 0..6 {
        // One world-tick cadence: 20 sim ticks, then the spawner pass.
        for _ in 0..WORLD_TICK_EVERY {
            engine.sim_tick();
        }
        let now = engine.time().elapsed_secs;
        engine.world_tick();

        let scene = engine.scenes().get(SCENE).unwrap();
        let creature = scene
            .creatures
            .iter()
            .find(|c| c.instance_id == instance_id)
            .unwrap();
        if now < respawn_at {
            assert!(!creature.alive, "must stay dead before the schedule");
            // The dead instance holds its slot: no replacement spawned.
            assert_eq!(scene.creatures.len(), 3);
            assert_eq!(alive_count(&engine, "slagrat"), 2);
        } else {
            assert!(creature.alive, "must revive once the schedule elapses");
            assert_eq!(creature.current_hp, Some(12), "hp restored on revival");
            assert!(creature.respawn_at_secs.is_none());
            assert_eq!(alive_count(&engine, "slagrat"), 3);
            revived = true;
            break;
        }
    }
    assert!(revived, "creature never respawned");
}

#[test]
fn test_dead_creature_excluded_from_scene_payload() {
    let (mut engine, _) = test_engine(14);
    let _rx = connect(&mut engine, "s1", "wanderer-1");
    engine.world_tick();

    let instance_id = engine.scenes().get(SCENE).unwrap().creatures[0].instance_id;
    engine.mark_creature_dead(SCENE, instance_id);

    // A second observer identifying now sees only the two living creatures.
    let rx = connect(&mut engine, "s2", "lurker-2");
    let mut saw_self_state = false;
    while let Ok(event) = rx.try_recv() {
        if let OutboundEvent::SelfState { creatures, .. } = event {
            assert_eq!(creatures.len(), 2);
            assert!(creatures.iter().all(|c| c.alive));
            saw_self_state = true;
        }
    }
    assert!(saw_self_state);
}

#[test]
fn test_unknown_template_skips_spawner_only() {
    let mut scenes = SceneStates::new();
    let registry = TemplateRegistry::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut next_instance = 1;

    let mut config = warren_config();
    config.spawners.insert(
        0,
        SpawnerConfig {
            id: "broken".into(),
            creature_id: "gravel_wyrm".into(),
            max_alive: 5,
            respawn_secs: 2.0,
            spawn_x: None,
            spawn_y: None,
        },
    );
    scenes.ensure(SCENE, Some(config), 0.0);

    let scene = scenes.get_mut(SCENE).unwrap();
    let events = spawner::run(scene, &registry, &mut rng, 0.0, &mut next_instance);

    // The broken spawner is skipped; the rest of the scene still spawns.
    assert_eq!(events.len(), 3);
    assert!(scene.creatures.iter().all(|c| c.creature_id == "slagrat"));
}

#[test]
fn test_placement_honors_class_band_and_margin() {
    let mut scenes = SceneStates::new();
    let registry = TemplateRegistry::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut next_instance = 1;

    let config = SceneConfig {
        id: "ash-vault".into(),
        name: "Ash Vault".into(),
        width: 800.0,
        height: 450.0,
        entrance_desc: None,
        spawners: vec![
            SpawnerConfig {
                id: "rafters".into(),
                creature_id: "cinder_moth".into(),
                max_alive: 8,
                respawn_secs: 2.0,
                spawn_x: None,
                spawn_y: None,
            },
            SpawnerConfig {
                id: "floor-nest".into(),
                creature_id: "slagrat".into(),
                max_alive: 8,
                respawn_secs: 2.0,
                spawn_x: None,
                spawn_y: None,
            },
        ],
    };
    scenes.ensure("ash-vault", Some(config), 0.0);
    let scene = scenes.get_mut("ash-vault").unwrap();
    spawner::run(scene, &registry, &mut rng, 0.0, &mut next_instance);

    let (flyer_lo, flyer_hi) = CreatureClass::Flyer.vertical_band();
    let (vermin_lo, vermin_hi) = CreatureClass::Vermin.vertical_band();
    for creature in &scene.creatures {
        assert!(creature.position.x >= 0.0 && creature.position.x < 800.0 - SPRITE_MARGIN);
        let y_frac = creature.position.y / 450.0;
        match creature.creature_id.as_str() {
            "cinder_moth" => assert!(
                (flyer_lo..flyer_hi).contains(&y_frac),
                "moth outside flyer band: {y_frac}"
            ),
            "slagrat" => assert!(
                (vermin_lo..vermin_hi).contains(&y_frac),
                "rat outside vermin band: {y_frac}"
            ),
            other => panic!("unexpected creature {other}"),
        }
    }
}

#[test]
fn test_fixed_spawn_coordinates_pin_placement() {
    let mut scenes = SceneStates::new();
    let registry = TemplateRegistry::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut next_instance = 1;

    let mut config = warren_config();
    config.spawners[0].spawn_x = Some(100.0);
    config.spawners[0].spawn_y = Some(200.0);
    scenes.ensure(SCENE, Some(config), 0.0);

    let scene = scenes.get_mut(SCENE).unwrap();
    spawner::run(scene, &registry, &mut rng, 0.0, &mut next_instance);
    for creature in &scene.creatures {
        assert_eq!(creature.position, Position::new(100.0, 200.0));
    }
}

#[test]
fn test_template_without_stats_spawns_without_hp() {
    let registry = TemplateRegistry::from_templates(vec![CreatureTemplate {
        id: "slag_wisp".into(),
        name: "Slag Wisp".into(),
        class: CreatureClass::Flyer,
        level: 1,
        stats: None,
        ai: AiProfile {
            behavior: "passive".into(),
            attack_style: "none".into(),
        },
        loot: LootProfile {
            table: "nothing".into(),
            items: Vec::new(),
        },
        entrance_desc: None,
        short_desc: "A wisp of burning dust.".into(),
    }]);

    let mut scenes = SceneStates::new();
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let mut next_instance = 1;
    let config = SceneConfig {
        id: "s".into(),
        name: "S".into(),
        width: 800.0,
        height: 450.0,
        entrance_desc: None,
        spawners: vec![SpawnerConfig {
            id: "wisps".into(),
            creature_id: "slag_wisp".into(),
            max_alive: 2,
            respawn_secs: 2.0,
            spawn_x: None,
            spawn_y: None,
        }],
    };
    scenes.ensure("s", Some(config), 0.0);
    let scene = scenes.get_mut("s").unwrap();
    spawner::run(scene, &registry, &mut rng, 0.0, &mut next_instance);

    assert_eq!(scene.creatures.len(), 2);
    assert!(scene.creatures.iter().all(|c| c.current_hp.is_none()));
}

// ---- Session lifecycle ----

#[test]
fn test_identify_emits_self_state() {
    let (mut engine, _) = test_engine(15);
    let rx = connect(&mut engine, "s1", "wanderer-1");

    match rx.try_recv() {
        Ok(OutboundEvent::SelfState {
            scene_id,
            scene_name,
            position,
            ..
        }) => {
            assert_eq!(scene_id, SCENE);
            assert_eq!(scene_name, "The Slag Warrens");
            assert_eq!(position, Position::new(0.0, 0.0));
        }
        other => panic!("expected SelfState, got {other:?}"),
    }

    let scene = engine.scenes().get(SCENE).unwrap();
    assert!(scene.occupants.contains("s1"));
}

#[test]
fn test_identify_failures_emit_scene_errors() {
    let (mut engine, _) = test_engine(16);

    for (character, expected) in [
        ("nobody-9", SceneErrorKind::CharacterNotFound),
        ("   ", SceneErrorKind::MalformedCharacterId),
        ("lost-soul", SceneErrorKind::SceneNotFound),
    ] {
        let (tx, rx) = mpsc::channel();
        engine.register_session("probe", tx);
        engine.queue_command(SessionCommand::Identify {
            session_id: "probe".into(),
            character_id: character.into(),
        });
        engine.sim_tick();
        match rx.try_recv() {
            Ok(OutboundEvent::SceneError { kind, .. }) => assert_eq!(kind, expected),
            other => panic!("expected SceneError for {character}, got {other:?}"),
        }
    }
}

#[test]
fn test_disconnect_tears_down_everything() {
    let (mut engine, _) = test_engine(17);
    let rx1 = connect(&mut engine, "s1", "wanderer-1");
    let _rx2 = connect(&mut engine, "s2", "lurker-2");

    engine.queue_command(SessionCommand::Disconnect {
        session_id: "s1".into(),
    });
    engine.sim_tick();

    let entity_count = {
        let mut query = engine.world().query::<&Profile>();
        query.iter().count()
    };
    assert_eq!(entity_count, 1, "entity removed");
    assert!(
        !engine.scenes().get(SCENE).unwrap().occupants.contains("s1"),
        "occupancy removed"
    );

    while rx1.try_recv().is_ok() {}
    engine.snapshot_tick();
    engine.world_tick();
    assert!(rx1.try_recv().is_err(), "no dispatch to a dead recipient");
}

// ---- Determinism ----

fn drive_scripted(seed: u64) -> Vec<String> {
    let (mut engine, _) = test_engine(seed);
    let rx = connect(&mut engine, "s1", "wanderer-1");

    engine.queue_command(SessionCommand::MoveTo {
        session_id: "s1".into(),
        x: 400.0,
        y: 120.0,
    });
    for _ in 0..120 {
        engine.sim_tick();
        let tick = engine.time().tick;
        if tick % SNAPSHOT_EVERY == 0 {
            engine.snapshot_tick();
        }
        if tick % WORLD_TICK_EVERY == 0 {
            engine.world_tick();
        }
    }

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(serde_json::to_string(&event).unwrap());
    }
    events
}

#[test]
fn test_determinism_same_seed() {
    let a = drive_scripted(12345);
    let b = drive_scripted(12345);
    assert!(!a.is_empty());
    assert_eq!(a, b, "event streams diverged with the same seed");
}

#[test]
fn test_determinism_different_seeds_diverge() {
    // Different seeds place creatures differently, so the spawn events
    // (and only those) should differ.
    let a = drive_scripted(111);
    let b = drive_scripted(222);
    assert_ne!(a, b, "different seeds should diverge");
}
