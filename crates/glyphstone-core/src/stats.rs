//! Score, streaks, and level progression
//!
//! Each resolution is a single atomic transition on `GameStats`: score,
//! counters, running mean, and the level check all move in one call, so
//! no partial update can observe a stale counter.

use crate::round::Outcome;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points for a correct pick, multiplied by the level
const CORRECT_POINTS: u32 = 100;
/// Points lost on a wrong pick or a timeout
const MISS_PENALTY: u32 = 25;
/// Cumulative correct answers per level-up
const LEVEL_STREAK: u32 = 3;

/// Session-lifetime counters
///
/// Mutated only by the resolution methods below; reset only by starting
/// a new session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    /// Current difficulty level, starting at 1
    pub level: u32,
    /// Total score, never below zero
    pub score: u32,
    /// Cumulative correct answers
    pub correct: u32,
    /// Cumulative wrong answers and timeouts
    pub incorrect: u32,
    /// Running mean response time of correct answers, in ms
    pub avg_response_ms: f64,
}

impl GameStats {
    /// Fresh stats: level 1, everything else zero
    pub fn new() -> Self {
        Self {
            level: 1,
            score: 0,
            correct: 0,
            incorrect: 0,
            avg_response_ms: 0.0,
        }
    }

    /// Apply a correct pick
    ///
    /// `elapsed_ms` runs from the start of memorization to the pick, not
    /// from the start of selection. Scoring uses the level the answer was
    /// given at; the level check runs after the counters move.
    pub fn resolve_correct(&mut self, elapsed_ms: u64) -> Resolution {
        let points = CORRECT_POINTS.saturating_mul(self.level);
        self.score = self.score.saturating_add(points);
        self.avg_response_ms = (self.avg_response_ms * f64::from(self.correct)
            + elapsed_ms as f64)
            / f64::from(self.correct + 1);
        self.correct += 1;

        let leveled_up = self.correct % LEVEL_STREAK == 0;
        if leveled_up {
            self.level += 1;
        }

        Resolution {
            outcome: Outcome::Correct,
            feedback: if leveled_up {
                Feedback::LeveledUp
            } else {
                Feedback::Correct
            },
            score_delta: i64::from(points),
            leveled_up,
        }
    }

    /// Apply a wrong pick or a timeout
    pub fn resolve_miss(&mut self, timed_out: bool) -> Resolution {
        let penalty = self.score.min(MISS_PENALTY);
        self.score -= penalty;
        self.incorrect += 1;

        Resolution {
            outcome: if timed_out {
                Outcome::TimedOut
            } else {
                Outcome::Incorrect
            },
            feedback: if timed_out {
                Feedback::TimeExpired
            } else {
                Feedback::Incorrect
            },
            score_delta: -i64::from(penalty),
            leveled_up: false,
        }
    }
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

/// What a single resolution did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub outcome: Outcome,
    pub feedback: Feedback,
    /// Signed score change, already clamped
    pub score_delta: i64,
    pub leveled_up: bool,
}

/// Player-facing message for a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Correct,
    LeveledUp,
    Incorrect,
    TimeExpired,
}

impl Feedback {
    /// The message text shown on the result screen
    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Correct => "Excellent! Matching symbols",
            Feedback::LeveledUp => "Excellent! You leveled up",
            Feedback::Incorrect => "Wrong symbols. Try again!",
            Feedback::TimeExpired => "Time expired!",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_correct_scores_level_times_hundred() {
        let mut stats = GameStats::new();
        let res = stats.resolve_correct(1_500);

        assert_eq!(stats.score, 100);
        assert_eq!(stats.correct, 1);
        assert_eq!(res.score_delta, 100);
        assert_eq!(res.feedback, Feedback::Correct);
        assert!(!res.leveled_up);
    }

    #[test]
    fn test_every_third_correct_levels_up() {
        let mut stats = GameStats::new();
        stats.resolve_correct(1_000);
        stats.resolve_correct(1_000);
        assert_eq!(stats.level, 1);

        let third = stats.resolve_correct(1_000);
        assert!(third.leveled_up);
        assert_eq!(third.feedback, Feedback::LeveledUp);
        assert_eq!(stats.level, 2);
        // The third answer was still scored at level 1
        assert_eq!(stats.score, 300);

        let fourth = stats.resolve_correct(1_000);
        assert_eq!(fourth.score_delta, 200);
        assert_eq!(stats.score, 500);
    }

    #[test]
    fn test_miss_penalty_clamps_at_zero() {
        let mut stats = GameStats::new();
        stats.score = 10;

        let res = stats.resolve_miss(false);
        assert_eq!(stats.score, 0);
        assert_eq!(res.score_delta, -10);
        assert_eq!(stats.incorrect, 1);

        // Already at zero: no further drop
        let res = stats.resolve_miss(false);
        assert_eq!(stats.score, 0);
        assert_eq!(res.score_delta, 0);
    }

    #[test]
    fn test_timeout_scores_like_a_wrong_pick() {
        let mut wrong = GameStats::new();
        wrong.score = 150;
        let mut timed = wrong;

        let a = wrong.resolve_miss(false);
        let b = timed.resolve_miss(true);

        assert_eq!(wrong.score, timed.score);
        assert_eq!(wrong.incorrect, timed.incorrect);
        assert_eq!(a.score_delta, b.score_delta);
        assert_eq!(b.feedback, Feedback::TimeExpired);
    }

    #[test]
    fn test_response_time_incremental_mean() {
        let mut stats = GameStats::new();
        stats.resolve_correct(100);
        assert_eq!(stats.avg_response_ms, 100.0);

        stats.resolve_correct(200);
        assert_eq!(stats.avg_response_ms, 150.0);

        stats.resolve_correct(600);
        assert_eq!(stats.avg_response_ms, 300.0);
    }

    #[test]
    fn test_miss_leaves_average_untouched() {
        let mut stats = GameStats::new();
        stats.resolve_correct(400);
        stats.resolve_miss(false);
        stats.resolve_miss(true);
        assert_eq!(stats.avg_response_ms, 400.0);
    }
}
