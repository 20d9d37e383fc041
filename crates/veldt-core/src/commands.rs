//! Session commands sent from the network layer to the simulation.
//!
//! Commands are validated at ingestion and queued for processing at the next
//! tick boundary. Network handlers never mutate simulation state directly.

use serde::{Deserialize, Serialize};

use crate::constants::INTENT_STALENESS_SECS;
use crate::error::CommandError;

/// All inbound session actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionCommand {
    /// Bind a session to a character identity. Seeds the entity from the
    /// character store's last known position.
    Identify {
        session_id: String,
        character_id: String,
    },
    /// Manual control input: heading plus a thrust flag.
    Manual {
        session_id: String,
        thrust: bool,
        heading: f64,
    },
    /// Set a persistent destination, overriding manual control until arrival
    /// or explicit cancel.
    MoveTo { session_id: String, x: f64, y: f64 },
    /// Clear the current move target.
    CancelAutopilot { session_id: String },
    /// Tear down all state for a session.
    Disconnect { session_id: String },
}

impl SessionCommand {
    pub fn session_id(&self) -> &str {
        match self {
            Self::Identify { session_id, .. }
            | Self::Manual { session_id, .. }
            | Self::MoveTo { session_id, .. }
            | Self::CancelAutopilot { session_id }
            | Self::Disconnect { session_id } => session_id,
        }
    }

    /// Reject malformed input before it can reach integration: non-finite
    /// numbers never propagate into simulation state.
    pub fn validate(&self) -> Result<(), CommandError> {
        if self.session_id().trim().is_empty() {
            return Err(CommandError::EmptySessionId);
        }
        match self {
            Self::Manual { heading, .. } if !heading.is_finite() => {
                Err(CommandError::NonFinite("heading"))
            }
            Self::MoveTo { x, .. } if !x.is_finite() => Err(CommandError::NonFinite("x")),
            Self::MoveTo { y, .. } if !y.is_finite() => Err(CommandError::NonFinite("y")),
            _ => Ok(()),
        }
    }
}

/// The most recent manual input for one session. Single slot: a new intent
/// replaces the old one, never queues behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub thrust: bool,
    pub heading: f64,
    /// Simulation-clock receipt time (seconds).
    pub received_secs: f64,
}

impl IntentRecord {
    /// Stale intent is treated as "no thrust, hold heading", so a dropped
    /// stop packet cannot produce runaway motion.
    pub fn is_fresh(&self, now_secs: f64) -> bool {
        now_secs - self.received_secs <= INTENT_STALENESS_SECS
    }
}
