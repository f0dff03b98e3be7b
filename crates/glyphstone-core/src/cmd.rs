//! Commands (side effects) produced by the session
//!
//! The session never touches a clock or a terminal itself; it hands the
//! host commands to run. Timer commands are the whole concurrency story:
//! the host schedules them, and fired timers come back in as messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token for one scheduled timer
///
/// Tokens are allocated monotonically and never reused. A fired timer
/// whose token no longer matches the session's live timer is stale and
/// gets dropped, which is what makes a cancelled countdown harmless even
/// if its last tick was already in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl TimerId {
    /// Create a timer token
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw token value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer:{}", self.0)
    }
}

/// A side effect for the host to execute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cmd {
    /// Fire `timer` every `period_ms` until cancelled
    StartInterval { timer: TimerId, period_ms: u64 },

    /// Fire `timer` once after `delay_ms`
    RunAfter { timer: TimerId, delay_ms: u64 },

    /// Stop a scheduled timer
    CancelTimer { timer: TimerId },

    /// Surface a diagnostic line
    Log { level: LogLevel, message: String },
}

/// Log level for diagnostic commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl Cmd {
    /// Create a log command
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Cmd::Log {
            level,
            message: message.into(),
        }
    }

    /// Create a debug log command
    pub fn debug(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Debug, message)
    }

    /// Create an info log command
    pub fn info(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Info, message)
    }
}
