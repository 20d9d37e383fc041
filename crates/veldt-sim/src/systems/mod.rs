//! Simulation systems, invoked by the engine at their fixed cadences.

pub mod interest;
pub mod movement;
pub mod spawner;
