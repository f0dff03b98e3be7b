//! Events emitted toward the host

use crate::{GameStats, Phase, Resolution};
use serde::{Deserialize, Serialize};

/// A state change the host may want to react to
///
/// Events are notifications, not requests: the session has already
/// applied the change when the event comes out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// The session moved to a new phase
    PhaseChanged(Phase),

    /// A fresh round is in place and waiting in `Preparation`
    RoundStarted { level: u32, stones: usize },

    /// The current round was scored
    RoundResolved(Resolution),

    /// The player exited; the session is now inert
    SessionEnded { stats: GameStats },
}
