//! Messages driving the session

use crate::TimerId;
use serde::{Deserialize, Serialize};

/// One inbound message for `Session::update`
///
/// Player input and timer expiry arrive through the same single-threaded
/// queue, so two sources can never race to resolve the same round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    /// Player starts the round (`Preparation` -> `Memorization`)
    Begin,

    /// Player picks the stone at `index`
    Select { index: usize },

    /// Player moves on from the result screen
    Continue,

    /// A scheduled timer fired
    TimerFired { timer: TimerId },

    /// Player abandons the session; honored from any phase
    Exit,
}
