//! Input recording and deterministic replay
//!
//! With a fixed seed a session is a pure function of its inputs, so a
//! recorded message stream rebuilds a session exactly: same rounds, same
//! stats, same RNG state. Useful for bug reports and regression captures.

use crate::{Msg, Result, Session, SessionConfig};
use serde::{Deserialize, Serialize};

/// One recorded input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Host clock at delivery, in ms
    pub at_ms: u64,
    pub msg: Msg,
}

/// A session's full input history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    config: SessionConfig,
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Start a journal for a session built from `config`
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    /// Record one delivered message
    pub fn record(&mut self, msg: Msg, at_ms: u64) {
        self.entries.push(JournalEntry { at_ms, msg });
    }

    /// The recorded inputs, in delivery order
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// The configuration the session was built from
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Rebuild the session this journal describes
    pub fn replay(&self) -> Result<Session> {
        let mut session = Session::new(self.config.clone())?;
        for entry in &self.entries {
            session.update(entry.msg, entry.at_ms);
        }
        Ok(session)
    }
}
