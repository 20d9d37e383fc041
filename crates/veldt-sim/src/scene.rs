//! Per-scene ephemeral state and its store.
//!
//! Scenes are created lazily on first reference and, under the configured
//! policy, never evicted (persistent world). The alternate evict-when-empty
//! policy is available behind the same contract via [`SceneStates::evict_idle`].

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use veldt_core::bestiary::{Facing, TemplateRegistry};
use veldt_core::state::CreatureView;
use veldt_core::store::SceneConfig;
use veldt_core::types::Position;

/// A live creature instance. Soft-deleted on death: the record stays in the
/// scene list so the respawn timer can revive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    /// Unique across the process lifetime; many instances share a template.
    pub instance_id: u64,
    pub creature_id: String,
    pub spawner_id: String,
    pub alive: bool,
    /// Scheduled revival time (simulation-clock seconds); `None` while alive.
    pub respawn_at_secs: Option<f64>,
    pub position: Position,
    pub facing: Facing,
    pub current_hp: Option<u32>,
}

impl Creature {
    /// Build the wire record, resolving display fields from the registry.
    pub fn view(&self, registry: &TemplateRegistry) -> CreatureView {
        let template = registry.get(&self.creature_id);
        CreatureView {
            instance_id: self.instance_id,
            creature_id: self.creature_id.clone(),
            spawner_id: self.spawner_id.clone(),
            name: template
                .map(|t| t.name.clone())
                .unwrap_or_else(|| self.creature_id.clone()),
            short_desc: template.map(|t| t.short_desc.clone()).unwrap_or_default(),
            level: template.map(|t| t.level).unwrap_or(1),
            alive: self.alive,
            position: self.position,
            facing: self.facing,
            current_hp: self.current_hp,
        }
    }
}

/// Ephemeral state for one scene.
#[derive(Debug, Clone)]
pub struct SceneState {
    pub scene_id: String,
    pub config: Option<SceneConfig>,
    /// Every creature ever spawned here; dead ones are kept for revival.
    pub creatures: Vec<Creature>,
    /// Sessions currently present in the scene.
    pub occupants: HashSet<String>,
    /// Last activity (simulation-clock seconds).
    pub last_active_secs: f64,
}

impl SceneState {
    fn new(scene_id: &str, now_secs: f64) -> Self {
        Self {
            scene_id: scene_id.to_owned(),
            config: None,
            creatures: Vec::new(),
            occupants: HashSet::new(),
            last_active_secs: now_secs,
        }
    }

    /// Alive creatures as wire records, for the scene payload on identify.
    pub fn alive_creature_views(&self, registry: &TemplateRegistry) -> Vec<CreatureView> {
        self.creatures
            .iter()
            .filter(|c| c.alive)
            .map(|c| c.view(registry))
            .collect()
    }
}

/// Store of per-scene state, keyed by scene id.
///
/// Ordered map so world-tick iteration order is deterministic.
#[derive(Debug, Default)]
pub struct SceneStates {
    scenes: BTreeMap<String, SceneState>,
}

impl SceneStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create-if-absent lookup. A supplied config refreshes the stored one
    /// without touching already-spawned creatures or the occupant set.
    pub fn ensure(
        &mut self,
        scene_id: &str,
        config: Option<SceneConfig>,
        now_secs: f64,
    ) -> &mut SceneState {
        let scene = self
            .scenes
            .entry(scene_id.to_owned())
            .or_insert_with(|| SceneState::new(scene_id, now_secs));
        if config.is_some() {
            scene.config = config;
        }
        scene
    }

    /// Pure lookup; absent if the scene was never referenced.
    pub fn get(&self, scene_id: &str) -> Option<&SceneState> {
        self.scenes.get(scene_id)
    }

    pub fn get_mut(&mut self, scene_id: &str) -> Option<&mut SceneState> {
        self.scenes.get_mut(scene_id)
    }

    pub fn mark_active(&mut self, scene_id: &str, now_secs: f64) {
        let scene = self.ensure(scene_id, None, now_secs);
        scene.last_active_secs = now_secs;
    }

    /// Idempotent occupant insertion; also bumps the activity timestamp.
    pub fn add_occupant(&mut self, scene_id: &str, session_id: &str, now_secs: f64) {
        let scene = self.ensure(scene_id, None, now_secs);
        scene.occupants.insert(session_id.to_owned());
        scene.last_active_secs = now_secs;
    }

    /// Idempotent occupant removal; a never-created scene is a no-op.
    pub fn remove_occupant(&mut self, scene_id: &str, session_id: &str) {
        if let Some(scene) = self.scenes.get_mut(scene_id) {
            scene.occupants.remove(session_id);
        }
    }

    /// Remove a session from every occupant set (disconnect teardown).
    pub fn remove_occupant_everywhere(&mut self, session_id: &str) {
        for scene in self.scenes.values_mut() {
            scene.occupants.remove(session_id);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneState> {
        self.scenes.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneState> {
        self.scenes.values_mut()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Alternate eviction policy: drop scenes with no occupants whose last
    /// activity is older than `timeout_secs`. Nothing in the engine schedules
    /// this; the deployed policy is "never evict".
    pub fn evict_idle(&mut self, timeout_secs: f64, now_secs: f64) -> usize {
        let before = self.scenes.len();
        self.scenes.retain(|_, scene| {
            !scene.occupants.is_empty() || now_secs - scene.last_active_secs < timeout_secs
        });
        before - self.scenes.len()
    }
}
