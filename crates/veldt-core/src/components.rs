//! ECS components for simulated entities.
//!
//! Components are plain data structs with no methods.
//! Simulation logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Spatial state: position plus heading in radians, normalized to (−π, π].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    pub position: Position,
    pub heading: f64,
}

/// Persistent move target. `None` means manual control.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Autopilot {
    pub target: Option<Position>,
}

/// Identity metadata resolved once at identification time; the snapshot
/// builder reads it without any store lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub session_id: String,
    /// Process-unique simulated-entity id, minted at identification.
    pub entity_id: u64,
    pub character_id: String,
    pub display_name: String,
    pub scene_id: String,
}

/// Activity timestamps (simulation-clock seconds).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Activity {
    pub last_input_secs: f64,
    pub last_active_secs: f64,
}
