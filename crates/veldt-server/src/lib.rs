//! Runtime shell for the veldt simulation core.
//!
//! Hosts the engine on a dedicated scheduler thread, multiplexing the three
//! fixed cadences (simulation, snapshot, world), and runs the background
//! persistence worker for settled-location writes.

pub mod game_loop;
pub mod persist;
pub mod state;
