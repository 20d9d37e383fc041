//! veldt server entry point.
//!
//! Wires in-memory stores behind the persistence worker, starts the
//! scheduler thread, and attaches a local diagnostic session so the world
//! can be observed without a network layer in front of it.

use std::sync::mpsc;
use std::sync::Arc;

use veldt_core::commands::SessionCommand;
use veldt_core::events::OutboundEvent;
use veldt_core::store::{
    CharacterRecord, MemoryCharacterStore, MemorySceneDirectory, SceneConfig, SpawnerConfig,
};
use veldt_core::types::Position;
use veldt_sim::engine::{EngineConfig, SimulationEngine};
use veldt_server::game_loop::spawn_game_loop;
use veldt_server::persist::DeferredCharacterStore;
use veldt_server::state::LoopCommand;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veldt_server=info,veldt_sim=info".into()),
        )
        .init();

    tracing::info!("veldt server starting");

    let characters = Arc::new(MemoryCharacterStore::new());
    characters.insert(CharacterRecord {
        id: "wanderer-1".into(),
        display_name: "Wanderer".into(),
        scene_id: "slag-warrens".into(),
        position: Position::new(120.0, 260.0),
    });

    let scenes = Arc::new(MemorySceneDirectory::new());
    scenes.insert(SceneConfig {
        id: "slag-warrens".into(),
        name: "The Slag Warrens".into(),
        width: 800.0,
        height: 450.0,
        entrance_desc: Some("Heaps of cooling slag stretch into the dark.".into()),
        spawners: vec![
            SpawnerConfig {
                id: "warren-burrow".into(),
                creature_id: "slagrat".into(),
                max_alive: 3,
                respawn_secs: 30.0,
                spawn_x: None,
                spawn_y: None,
            },
            SpawnerConfig {
                id: "warren-rafters".into(),
                creature_id: "cinder_moth".into(),
                max_alive: 2,
                respawn_secs: 45.0,
                spawn_x: None,
                spawn_y: None,
            },
        ],
    });

    let deferred = Arc::new(DeferredCharacterStore::spawn(characters));
    let engine = SimulationEngine::new(EngineConfig::default(), deferred, scenes);
    let (cmd_tx, _loop_handle) = spawn_game_loop(engine);

    // Local diagnostic session: identify and wander to the far burrow.
    let (event_tx, event_rx) = mpsc::channel::<OutboundEvent>();
    cmd_tx
        .send(LoopCommand::Connect {
            session_id: "local".into(),
            sender: event_tx,
        })
        .expect("game loop gone before startup finished");
    cmd_tx
        .send(LoopCommand::Session(SessionCommand::Identify {
            session_id: "local".into(),
            character_id: "wanderer-1".into(),
        }))
        .expect("game loop gone before startup finished");
    cmd_tx
        .send(LoopCommand::Session(SessionCommand::MoveTo {
            session_id: "local".into(),
            x: 640.0,
            y: 300.0,
        }))
        .expect("game loop gone before startup finished");

    for event in event_rx {
        match event {
            OutboundEvent::SelfState {
                entity_id,
                scene_name,
                position,
                creatures,
                ..
            } => {
                tracing::info!(
                    entity_id,
                    scene = %scene_name,
                    x = position.x,
                    y = position.y,
                    creatures = creatures.len(),
                    "identified"
                );
            }
            OutboundEvent::CreatureSpawned { scene_id, creature, .. } => {
                tracing::info!(
                    scene = %scene_id,
                    instance = creature.instance_id,
                    name = %creature.name,
                    x = creature.position.x,
                    y = creature.position.y,
                    "creature spawned"
                );
            }
            OutboundEvent::CreatureRespawned { scene_id, creature } => {
                tracing::info!(
                    scene = %scene_id,
                    instance = creature.instance_id,
                    name = %creature.name,
                    "creature respawned"
                );
            }
            OutboundEvent::Snapshot(snapshot) => {
                tracing::trace!(
                    tick = snapshot.time.tick,
                    visible = snapshot.entities.len(),
                    "snapshot"
                );
            }
            OutboundEvent::SceneError { kind, detail } => {
                tracing::warn!(%kind, %detail, "scene error");
            }
        }
    }
}
