//! Game loop thread — drives the engine at its three fixed cadences.
//!
//! One scheduler thread runs the 20 Hz simulation tick and derives the
//! snapshot (10 Hz) and world (1 Hz) cadences as exact tick multiples, so
//! invocations of the same tick never overlap and the engine stays the only
//! writer of simulation state. Commands arrive via `mpsc` channel and are
//! drained at the top of each cycle, strictly between tick bodies.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use veldt_core::constants::{SIM_TICK_RATE, SNAPSHOT_EVERY, WORLD_TICK_EVERY};
use veldt_sim::SimulationEngine;

use crate::state::LoopCommand;

/// Nominal duration of one simulation tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / SIM_TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the network layer to use, plus the join
/// handle for shutdown.
pub fn spawn_game_loop(
    engine: SimulationEngine,
) -> (mpsc::Sender<LoopCommand>, std::thread::JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("veldt-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, &cmd_rx);
        })
        .expect("Failed to spawn game loop thread");

    (cmd_tx, handle)
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(mut engine: SimulationEngine, cmd_rx: &mpsc::Receiver<LoopCommand>) {
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands.
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Connect { session_id, sender }) => {
                    engine.register_session(session_id, sender);
                }
                Ok(LoopCommand::Session(command)) => {
                    engine.queue_command(command);
                }
                Ok(LoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance the simulation and run the derived cadences.
        engine.sim_tick();
        let tick = engine.time().tick;
        if tick % SNAPSHOT_EVERY == 0 {
            engine.snapshot_tick();
        }
        if tick % WORLD_TICK_EVERY == 0 {
            engine.world_tick();
        }

        // 3. Sleep until the next tick.
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind — reset to avoid a catch-up spiral.
            next_tick_time = now;
        }
    }
}
