//! Game phases and per-level timing

use serde::{Deserialize, Serialize};

/// The phase a session is in
///
/// Exactly one phase is active at a time; the session owns every
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// A round is generated and waiting for the player to begin
    Preparation,
    /// The totem is visible and the memorization countdown is running
    Memorization,
    /// The stones are visible and the selection countdown is running
    Selection,
    /// The outcome is shown, waiting for the player to continue
    Result,
    /// The session has been exited; terminal
    Paused,
}

/// Memorization window in milliseconds: `max(3000, 8000 - 200 * level)`
pub fn memorize_duration_ms(level: u32) -> u64 {
    (8_000 - 200 * i64::from(level)).max(3_000) as u64
}

/// Selection window in milliseconds: `max(5000, 12000 - 300 * level)`
pub fn select_duration_ms(level: u32) -> u64 {
    (12_000 - 300 * i64::from(level)).max(5_000) as u64
}

/// Whole-second ticks for a countdown window, rounded up
///
/// The countdown display shows this value directly, so a 7.8 s window
/// reads "8" on its first tick.
pub fn countdown_ticks(duration_ms: u64) -> u32 {
    duration_ms.div_ceil(1_000) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memorize_duration_shrinks_with_level() {
        assert_eq!(memorize_duration_ms(1), 7_800);
        assert_eq!(memorize_duration_ms(10), 6_000);
        assert_eq!(memorize_duration_ms(25), 3_000);
        // Floor holds however high the level climbs
        assert_eq!(memorize_duration_ms(500), 3_000);
    }

    #[test]
    fn test_select_duration_shrinks_with_level() {
        assert_eq!(select_duration_ms(1), 11_700);
        assert_eq!(select_duration_ms(10), 9_000);
        assert_eq!(select_duration_ms(40), 5_000);
        assert_eq!(select_duration_ms(500), 5_000);
    }

    #[test]
    fn test_countdown_ticks_round_up() {
        assert_eq!(countdown_ticks(7_800), 8);
        assert_eq!(countdown_ticks(3_000), 3);
        assert_eq!(countdown_ticks(11_700), 12);
        assert_eq!(countdown_ticks(5_000), 5);
    }
}
