//! Single-threaded timer queue
//!
//! The host owns the clock: it applies the session's timer commands here
//! and asks which timers are due. Nothing blocks and nothing spawns a
//! thread; timer expiry and player input funnel through the same update
//! loop, one message at a time.

use crate::{Cmd, Msg, TimerId};
use serde::{Deserialize, Serialize};

/// One scheduled entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Entry {
    timer: TimerId,
    due_ms: u64,
    /// Re-arm period; `None` for one-shots
    period_ms: Option<u64>,
}

/// Cooperative timer queue driving a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    entries: Vec<Entry>,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret the timer commands from one update
    ///
    /// Non-timer commands pass through untouched; logging is the host's
    /// business, not the scheduler's.
    pub fn apply(&mut self, cmds: &[Cmd], now_ms: u64) {
        for cmd in cmds {
            match cmd {
                Cmd::StartInterval { timer, period_ms } => {
                    self.entries.push(Entry {
                        timer: *timer,
                        due_ms: now_ms + period_ms,
                        period_ms: Some(*period_ms),
                    });
                }
                Cmd::RunAfter { timer, delay_ms } => {
                    self.entries.push(Entry {
                        timer: *timer,
                        due_ms: now_ms + delay_ms,
                        period_ms: None,
                    });
                }
                Cmd::CancelTimer { timer } => {
                    self.entries.retain(|e| e.timer != *timer);
                }
                Cmd::Log { .. } => {}
            }
        }
    }

    /// Earliest pending deadline, if any
    pub fn next_due(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.due_ms).min()
    }

    /// Whether nothing is scheduled
    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pop every timer due at `now_ms`, re-arming intervals
    ///
    /// Fired messages come back ordered by deadline, so a countdown that
    /// lapsed several periods while the host was busy still ticks in
    /// order instead of arriving as one merged tick.
    pub fn fire_due(&mut self, now_ms: u64) -> Vec<Msg> {
        let mut fired = Vec::new();
        loop {
            let due = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.due_ms <= now_ms)
                .min_by_key(|(_, e)| e.due_ms)
                .map(|(i, _)| i);
            let Some(idx) = due else { break };

            let entry = &mut self.entries[idx];
            fired.push(Msg::TimerFired { timer: entry.timer });
            match entry.period_ms {
                Some(period) => entry.due_ms += period,
                None => {
                    self.entries.swap_remove(idx);
                }
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut sched = Scheduler::new();
        let timer = TimerId::new(1);
        sched.apply(&[Cmd::RunAfter { timer, delay_ms: 500 }], 0);

        assert_eq!(sched.next_due(), Some(500));
        assert!(sched.fire_due(499).is_empty());
        assert_eq!(sched.fire_due(500), vec![Msg::TimerFired { timer }]);
        assert!(sched.is_idle());
    }

    #[test]
    fn test_interval_rearms() {
        let mut sched = Scheduler::new();
        let timer = TimerId::new(2);
        sched.apply(
            &[Cmd::StartInterval {
                timer,
                period_ms: 1_000,
            }],
            0,
        );

        assert_eq!(sched.fire_due(1_000).len(), 1);
        assert_eq!(sched.next_due(), Some(2_000));
        assert_eq!(sched.fire_due(2_500).len(), 1);
        assert_eq!(sched.next_due(), Some(3_000));
    }

    #[test]
    fn test_interval_catches_up_in_order() {
        let mut sched = Scheduler::new();
        let timer = TimerId::new(3);
        sched.apply(
            &[Cmd::StartInterval {
                timer,
                period_ms: 1_000,
            }],
            0,
        );

        // Three periods lapsed at once: three ordered ticks, not one
        let fired = sched.fire_due(3_000);
        assert_eq!(fired.len(), 3);
        assert!(fired.iter().all(|m| *m == Msg::TimerFired { timer }));
    }

    #[test]
    fn test_cancel_removes_entry() {
        let mut sched = Scheduler::new();
        let timer = TimerId::new(4);
        sched.apply(
            &[Cmd::StartInterval {
                timer,
                period_ms: 1_000,
            }],
            0,
        );
        sched.apply(&[Cmd::CancelTimer { timer }], 100);

        assert!(sched.is_idle());
        assert!(sched.fire_due(10_000).is_empty());
    }

    #[test]
    fn test_cancel_of_unknown_timer_is_a_noop() {
        let mut sched = Scheduler::new();
        sched.apply(
            &[Cmd::CancelTimer {
                timer: TimerId::new(9),
            }],
            0,
        );
        assert!(sched.is_idle());
    }
}
