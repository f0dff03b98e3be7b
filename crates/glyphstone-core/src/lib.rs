//! Glyphstone core - the Symbol Match memory game
//!
//! A timed, level-adaptive memorization game: each round raises a totem
//! of three glyphs, hides it, and asks the player to find the one stone
//! whose glyphs match. This crate is the complete game logic:
//! - Deterministic round generation (`Round`, `Alphabet`, `GameRng`)
//! - A tick-driven phase state machine (`Session`, `Phase`)
//! - Scoring and level progression (`GameStats`)
//! - A cooperative timer queue for hosts (`Scheduler`)
//!
//! The host owns rendering and the clock; the session is a pure state
//! machine fed `Msg`s and answering with `Cmd`s and `Event`s.
//!
//! ## Journal feature
//!
//! Enable the `journal` feature for input recording and deterministic
//! replay:
//! ```toml
//! glyphstone-core = { version = "0.1", features = ["journal"] }
//! ```

mod cmd;
mod error;
mod event;
mod msg;
mod phase;
mod rng;
mod round;
mod scheduler;
mod session;
mod stats;
mod symbol;

#[cfg(feature = "journal")]
pub mod journal;

pub use cmd::{Cmd, LogLevel, TimerId};
pub use error::{Error, Result};
pub use event::Event;
pub use msg::Msg;
pub use phase::{countdown_ticks, memorize_duration_ms, select_duration_ms, Phase};
pub use rng::GameRng;
pub use round::{stone_count, Outcome, Round, Stone, Totem};
pub use scheduler::Scheduler;
pub use session::{Session, SessionConfig, UpdateResult};
pub use stats::{Feedback, GameStats, Resolution};
pub use symbol::{Alphabet, Symbol, DEFAULT_GLYPHS, TOTEM_SIZE};

#[cfg(feature = "journal")]
pub use journal::{Journal, JournalEntry};
