//! View types published to observers.
//!
//! Everything here is resolved from in-memory state at build time — never a
//! store lookup on the snapshot path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bestiary::Facing;
use crate::types::{Position, SimTime, Velocity};

/// One visible entity as published to an observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub entity_id: u64,
    pub display_name: String,
    pub position: Position,
    pub velocity: Velocity,
    pub heading: f64,
}

/// A per-observer filtered view of world state.
///
/// Entity ordering is map semantics; the timestamp is monotonic across
/// snapshots and intended for client-side interpolation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub entities: BTreeMap<u64, EntityView>,
}

/// Full creature instance record as broadcast to scene occupants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureView {
    /// Process-unique instance id — distinct from the template id.
    pub instance_id: u64,
    pub creature_id: String,
    pub spawner_id: String,
    pub name: String,
    pub short_desc: String,
    pub level: u32,
    pub alive: bool,
    pub position: Position,
    pub facing: Facing,
    pub current_hp: Option<u32>,
}
