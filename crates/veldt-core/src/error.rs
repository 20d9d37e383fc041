//! Error taxonomy for the simulation core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by external store collaborators.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Malformed inbound commands, rejected at ingestion before they can reach
/// simulation state.
#[derive(Debug, Clone, Copy, Error)]
pub enum CommandError {
    #[error("non-finite value in field `{0}`")]
    NonFinite(&'static str),

    #[error("empty session id")]
    EmptySessionId,
}

/// Reason carried by a `SceneError` outbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum SceneErrorKind {
    #[error("session is not identified")]
    NotIdentified,

    #[error("malformed character id")]
    MalformedCharacterId,

    #[error("character not found")]
    CharacterNotFound,

    #[error("scene not found")]
    SceneNotFound,

    #[error("store unavailable")]
    StoreUnavailable,
}
