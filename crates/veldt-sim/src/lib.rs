//! Simulation engine for the veldt world server.
//!
//! Owns the hecs ECS world and all per-scene ephemeral state, runs the
//! movement, interest-management, and spawner systems at their fixed
//! cadences, and emits events over per-session channels. Completely
//! headless, enabling deterministic testing.

pub mod engine;
pub mod scene;
pub mod systems;

pub use engine::SimulationEngine;
pub use veldt_core as core;

#[cfg(test)]
mod tests;
