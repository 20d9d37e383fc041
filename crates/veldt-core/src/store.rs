//! External store collaborators.
//!
//! The core reads character records and scene configuration through these
//! traits and writes back settled locations. Implementations decide where
//! the data actually lives; the in-memory variants below back tests and the
//! standalone server binary.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_RESPAWN_SECS, DEFAULT_SCENE_HEIGHT, DEFAULT_SCENE_WIDTH};
use crate::error::StoreError;
use crate::types::Position;

/// A character as the core needs it: identity, display metadata, and the
/// last persisted location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: String,
    pub display_name: String,
    pub scene_id: String,
    pub position: Position,
}

/// Static spawner configuration, read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnerConfig {
    pub id: String,
    pub creature_id: String,
    pub max_alive: u32,
    #[serde(default = "default_respawn_secs")]
    pub respawn_secs: f64,
    /// Optional fixed spawn coordinates; unset axes are sampled.
    #[serde(default)]
    pub spawn_x: Option<f64>,
    #[serde(default)]
    pub spawn_y: Option<f64>,
}

/// Static per-scene configuration, read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub id: String,
    pub name: String,
    #[serde(default = "default_scene_width")]
    pub width: f64,
    #[serde(default = "default_scene_height")]
    pub height: f64,
    #[serde(default)]
    pub entrance_desc: Option<String>,
    #[serde(default)]
    pub spawners: Vec<SpawnerConfig>,
}

fn default_respawn_secs() -> f64 {
    DEFAULT_RESPAWN_SECS
}

fn default_scene_width() -> f64 {
    DEFAULT_SCENE_WIDTH
}

fn default_scene_height() -> f64 {
    DEFAULT_SCENE_HEIGHT
}

/// Character persistence collaborator.
///
/// `save_location` is issued opportunistically after movement settles; a
/// failed write must not block or roll back in-memory simulation state,
/// which stays authoritative until the next successful write.
pub trait CharacterStore: Send + Sync {
    fn load(&self, character_id: &str) -> Result<CharacterRecord, StoreError>;

    fn save_location(
        &self,
        character_id: &str,
        scene_id: &str,
        position: Position,
    ) -> Result<(), StoreError>;
}

/// Scene configuration collaborator.
pub trait SceneDirectory: Send + Sync {
    fn load(&self, scene_id: &str) -> Result<SceneConfig, StoreError>;
}

/// In-memory character store.
#[derive(Debug, Default)]
pub struct MemoryCharacterStore {
    records: Mutex<HashMap<String, CharacterRecord>>,
}

impl MemoryCharacterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: CharacterRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(record.id.clone(), record);
        }
    }

    pub fn get(&self, character_id: &str) -> Option<CharacterRecord> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.get(character_id).cloned())
    }
}

impl CharacterStore for MemoryCharacterStore {
    fn load(&self, character_id: &str) -> Result<CharacterRecord, StoreError> {
        self.get(character_id)
            .ok_or_else(|| StoreError::NotFound(character_id.to_owned()))
    }

    fn save_location(
        &self,
        character_id: &str,
        scene_id: &str,
        position: Position,
    ) -> Result<(), StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("character store lock poisoned".into()))?;
        let record = records
            .get_mut(character_id)
            .ok_or_else(|| StoreError::NotFound(character_id.to_owned()))?;
        record.scene_id = scene_id.to_owned();
        record.position = position;
        Ok(())
    }
}

/// In-memory scene directory.
#[derive(Debug, Default)]
pub struct MemorySceneDirectory {
    scenes: Mutex<HashMap<String, SceneConfig>>,
}

impl MemorySceneDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, config: SceneConfig) {
        if let Ok(mut scenes) = self.scenes.lock() {
            scenes.insert(config.id.clone(), config);
        }
    }
}

impl SceneDirectory for MemorySceneDirectory {
    fn load(&self, scene_id: &str) -> Result<SceneConfig, StoreError> {
        self.scenes
            .lock()
            .ok()
            .and_then(|scenes| scenes.get(scene_id).cloned())
            .ok_or_else(|| StoreError::NotFound(scene_id.to_owned()))
    }
}
