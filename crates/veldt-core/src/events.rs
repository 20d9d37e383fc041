//! Events emitted by the simulation toward individual sessions.

use serde::{Deserialize, Serialize};

use crate::error::SceneErrorKind;
use crate::state::{CreatureView, WorldSnapshot};
use crate::types::Position;

/// Outbound events, delivered over each session's channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundEvent {
    /// Sent once on successful identification: the session's own entity id
    /// and initial simulated state, plus the scene it woke up in.
    SelfState {
        entity_id: u64,
        scene_id: String,
        scene_name: String,
        entrance_desc: Option<String>,
        position: Position,
        heading: f64,
        /// Creatures currently alive in the scene.
        creatures: Vec<CreatureView>,
    },
    /// Periodic per-observer filtered view of world state.
    Snapshot(WorldSnapshot),
    /// A creature instance was created in a scene the session occupies.
    CreatureSpawned {
        scene_id: String,
        creature: CreatureView,
        entrance_desc: Option<String>,
    },
    /// A dead creature instance came back to life.
    CreatureRespawned {
        scene_id: String,
        creature: CreatureView,
    },
    /// Identification or lookup failed for this session only.
    SceneError {
        kind: SceneErrorKind,
        detail: String,
    },
}
