//! Commands crossing from the network layer into the scheduler thread.

use std::sync::mpsc;

use veldt_core::commands::SessionCommand;
use veldt_core::events::OutboundEvent;

/// Commands sent from network handlers to the game loop thread. Handlers
/// never touch simulation state directly; everything crosses this channel
/// and is applied at a tick boundary.
#[derive(Debug)]
pub enum LoopCommand {
    /// Bind a freshly accepted session to its outbound event channel.
    Connect {
        session_id: String,
        sender: mpsc::Sender<OutboundEvent>,
    },
    /// A session command to forward to the simulation engine.
    Session(SessionCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}
