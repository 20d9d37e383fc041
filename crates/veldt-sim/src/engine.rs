//! Simulation engine — the authoritative core of the world server.
//!
//! `SimulationEngine` owns the hecs ECS world, the scene state store, the
//! per-session intent slots and outbound channels. Session commands are
//! queued and drained at tick boundaries, so the engine is the only writer
//! of simulation state and no fine-grained locking is needed. Completely
//! headless (no scheduler dependency), enabling deterministic testing.

use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use veldt_core::bestiary::TemplateRegistry;
use veldt_core::commands::{IntentRecord, SessionCommand};
use veldt_core::components::{Activity, Autopilot, Profile, Transform};
use veldt_core::constants::DEFAULT_RESPAWN_SECS;
use veldt_core::error::{SceneErrorKind, StoreError};
use veldt_core::events::OutboundEvent;
use veldt_core::store::{CharacterStore, SceneDirectory};
use veldt_core::types::{normalize_angle, Position, SimTime, Velocity};

use crate::scene::{SceneState, SceneStates};
use crate::systems;

/// Configuration for starting a new engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// RNG seed for determinism. Same seed + same commands = same world.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// The simulation engine. Owns all transient world state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    registry: TemplateRegistry,
    scenes: SceneStates,
    /// Session id → live entity.
    sessions: HashMap<String, hecs::Entity>,
    /// Single-slot manual intent per session, last-write-wins.
    intents: HashMap<String, IntentRecord>,
    /// Outbound event channel per session.
    outbound: HashMap<String, Sender<OutboundEvent>>,
    characters: Arc<dyn CharacterStore>,
    scene_dir: Arc<dyn SceneDirectory>,
    command_queue: VecDeque<SessionCommand>,
    next_entity_id: u64,
    next_instance_id: u64,
}

impl SimulationEngine {
    pub fn new(
        config: EngineConfig,
        characters: Arc<dyn CharacterStore>,
        scene_dir: Arc<dyn SceneDirectory>,
    ) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            registry: TemplateRegistry::builtin(),
            scenes: SceneStates::new(),
            sessions: HashMap::new(),
            intents: HashMap::new(),
            outbound: HashMap::new(),
            characters,
            scene_dir,
            command_queue: VecDeque::new(),
            next_entity_id: 1,
            next_instance_id: 1,
        }
    }

    /// Bind a session's outbound event channel. Called when the network
    /// layer accepts a connection, before `Identify`.
    pub fn register_session(
        &mut self,
        session_id: impl Into<String>,
        sender: Sender<OutboundEvent>,
    ) {
        self.outbound.insert(session_id.into(), sender);
    }

    /// Queue a session command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SessionCommand) {
        self.command_queue.push_back(command);
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a read-only reference to the scene state store.
    pub fn scenes(&self) -> &SceneStates {
        &self.scenes
    }

    /// Advance the simulation by one tick: drain queued commands, integrate
    /// movement for every entity, issue settled-location writes, advance the
    /// clock.
    pub fn sim_tick(&mut self) {
        self.process_commands();

        let now = self.time.elapsed_secs;
        let arrivals = systems::movement::run(&mut self.world, &self.intents, now);
        for arrival in arrivals {
            // Best effort: a failed write never rolls back in-memory state,
            // which stays authoritative until the next successful write.
            if let Err(err) = self.characters.save_location(
                &arrival.character_id,
                &arrival.scene_id,
                arrival.position,
            ) {
                tracing::warn!(
                    %err,
                    character = %arrival.character_id,
                    "location persistence failed"
                );
            }
        }

        self.time.advance();
    }

    /// Build and dispatch one filtered snapshot per observer. Read-only.
    pub fn snapshot_tick(&self) {
        for (session_id, snapshot) in systems::interest::run(&self.world, self.time) {
            self.send_to(&session_id, OutboundEvent::Snapshot(snapshot));
        }
    }

    /// Run the spawner/respawn pass over every scene and broadcast lifecycle
    /// events to each scene's occupants.
    pub fn world_tick(&mut self) {
        let now = self.time.elapsed_secs;

        let mut broadcasts: Vec<(Vec<String>, Vec<OutboundEvent>)> = Vec::new();
        for scene in self.scenes.iter_mut() {
            let events = systems::spawner::run(
                scene,
                &self.registry,
                &mut self.rng,
                now,
                &mut self.next_instance_id,
            );
            if !events.is_empty() {
                // An empty occupant set means no recipients, not an error.
                broadcasts.push((scene.occupants.iter().cloned().collect(), events));
            }
        }

        for (occupants, events) in broadcasts {
            for event in events {
                for session_id in &occupants {
                    self.send_to(session_id, event.clone());
                }
            }
        }
    }

    /// Death transition, driven by the external combat collaborator. Sets
    /// the instance dead and schedules its revival; the spawner system
    /// advances the state from there. Returns false if no matching live
    /// instance exists.
    pub fn mark_creature_dead(&mut self, scene_id: &str, instance_id: u64) -> bool {
        let now = self.time.elapsed_secs;
        let Some(scene) = self.scenes.get_mut(scene_id) else {
            return false;
        };
        let SceneState {
            config, creatures, ..
        } = scene;
        let Some(creature) = creatures
            .iter_mut()
            .find(|c| c.instance_id == instance_id && c.alive)
        else {
            return false;
        };
        let delay = config
            .as_ref()
            .and_then(|cfg| cfg.spawners.iter().find(|s| s.id == creature.spawner_id))
            .map(|s| s.respawn_secs)
            .unwrap_or(DEFAULT_RESPAWN_SECS);
        creature.alive = false;
        creature.respawn_at_secs = Some(now + delay);
        true
    }

    /// Process all queued commands. Runs strictly between tick bodies.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: SessionCommand) {
        // Malformed input is rejected here and never reaches integration.
        if let Err(err) = command.validate() {
            tracing::debug!(%err, "rejected malformed session command");
            return;
        }

        match command {
            SessionCommand::Identify {
                session_id,
                character_id,
            } => self.identify(session_id, character_id),
            SessionCommand::Manual {
                session_id,
                thrust,
                heading,
            } => {
                // Input from an unidentified session is dropped silently.
                let Some(&entity) = self.sessions.get(&session_id) else {
                    return;
                };
                let now = self.time.elapsed_secs;
                if let Ok(mut activity) = self.world.get::<&mut Activity>(entity) {
                    activity.last_input_secs = now;
                }
                self.intents.insert(
                    session_id,
                    IntentRecord {
                        thrust,
                        heading: normalize_angle(heading),
                        received_secs: now,
                    },
                );
            }
            SessionCommand::MoveTo { session_id, x, y } => {
                let Some(&entity) = self.sessions.get(&session_id) else {
                    self.send_to(
                        &session_id,
                        OutboundEvent::SceneError {
                            kind: SceneErrorKind::NotIdentified,
                            detail: "identify before moving".into(),
                        },
                    );
                    return;
                };
                let now = self.time.elapsed_secs;
                if let Ok(mut autopilot) = self.world.get::<&mut Autopilot>(entity) {
                    autopilot.target = Some(Position::new(x, y));
                }
                if let Ok(mut activity) = self.world.get::<&mut Activity>(entity) {
                    activity.last_input_secs = now;
                }
                let scene_id = self
                    .world
                    .get::<&Profile>(entity)
                    .ok()
                    .map(|p| p.scene_id.clone());
                if let Some(scene_id) = scene_id {
                    self.scenes.mark_active(&scene_id, now);
                }
            }
            SessionCommand::CancelAutopilot { session_id } => {
                let Some(&entity) = self.sessions.get(&session_id) else {
                    return;
                };
                if let Ok(mut autopilot) = self.world.get::<&mut Autopilot>(entity) {
                    autopilot.target = None;
                }
            }
            SessionCommand::Disconnect { session_id } => self.disconnect(&session_id),
        }
    }

    /// Bind a session to a character: seed the entity from the character
    /// store, join its scene, and answer with the initial self-state.
    fn identify(&mut self, session_id: String, character_id: String) {
        let trimmed = character_id.trim();
        if trimmed.is_empty() {
            self.send_to(
                &session_id,
                OutboundEvent::SceneError {
                    kind: SceneErrorKind::MalformedCharacterId,
                    detail: "character id must be non-empty".into(),
                },
            );
            return;
        }

        let record = match self.characters.load(trimmed) {
            Ok(record) => record,
            Err(StoreError::NotFound(_)) => {
                self.send_to(
                    &session_id,
                    OutboundEvent::SceneError {
                        kind: SceneErrorKind::CharacterNotFound,
                        detail: format!("no character `{trimmed}`"),
                    },
                );
                return;
            }
            Err(err) => {
                tracing::warn!(%err, character = %trimmed, "character store read failed");
                self.send_to(
                    &session_id,
                    OutboundEvent::SceneError {
                        kind: SceneErrorKind::StoreUnavailable,
                        detail: err.to_string(),
                    },
                );
                return;
            }
        };

        let config = match self.scene_dir.load(&record.scene_id) {
            Ok(config) => config,
            Err(StoreError::NotFound(_)) => {
                self.send_to(
                    &session_id,
                    OutboundEvent::SceneError {
                        kind: SceneErrorKind::SceneNotFound,
                        detail: format!("scene `{}` not found", record.scene_id),
                    },
                );
                return;
            }
            Err(err) => {
                tracing::warn!(%err, scene = %record.scene_id, "scene directory read failed");
                self.send_to(
                    &session_id,
                    OutboundEvent::SceneError {
                        kind: SceneErrorKind::StoreUnavailable,
                        detail: err.to_string(),
                    },
                );
                return;
            }
        };

        // Re-identification replaces any previous entity for this session.
        self.remove_session_entity(&session_id);
        self.intents.remove(&session_id);

        let now = self.time.elapsed_secs;
        let entity_id = self.next_entity_id;
        self.next_entity_id += 1;

        let (scene_name, entrance_desc, creatures) = {
            let scene = self.scenes.ensure(&record.scene_id, Some(config), now);
            scene.occupants.insert(session_id.clone());
            scene.last_active_secs = now;
            let name = scene
                .config
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| record.scene_id.clone());
            let entrance = scene.config.as_ref().and_then(|c| c.entrance_desc.clone());
            (name, entrance, scene.alive_creature_views(&self.registry))
        };

        let entity = self.world.spawn((
            Transform {
                position: record.position,
                heading: 0.0,
            },
            Velocity::default(),
            Autopilot::default(),
            Activity {
                last_input_secs: now,
                last_active_secs: now,
            },
            Profile {
                session_id: session_id.clone(),
                entity_id,
                character_id: record.id.clone(),
                display_name: record.display_name.clone(),
                scene_id: record.scene_id.clone(),
            },
        ));
        self.sessions.insert(session_id.clone(), entity);

        tracing::info!(
            session = %session_id,
            character = %record.id,
            scene = %record.scene_id,
            "session identified"
        );

        self.send_to(
            &session_id,
            OutboundEvent::SelfState {
                entity_id,
                scene_id: record.scene_id.clone(),
                scene_name,
                entrance_desc,
                position: record.position,
                heading: 0.0,
                creatures,
            },
        );
    }

    /// Full teardown: entity, intent slot, every occupant set, outbound
    /// channel. Runs in the command drain, strictly between tick bodies.
    fn disconnect(&mut self, session_id: &str) {
        self.remove_session_entity(session_id);
        self.intents.remove(session_id);
        self.scenes.remove_occupant_everywhere(session_id);
        self.outbound.remove(session_id);
        tracing::info!(session = %session_id, "session disconnected");
    }

    fn remove_session_entity(&mut self, session_id: &str) {
        if let Some(entity) = self.sessions.remove(session_id) {
            let _ = self.world.despawn(entity);
        }
    }

    fn send_to(&self, session_id: &str, event: OutboundEvent) {
        if let Some(sender) = self.outbound.get(session_id) {
            if sender.send(event).is_err() {
                tracing::debug!(session = %session_id, "dropped event for dead session channel");
            }
        }
    }
}
