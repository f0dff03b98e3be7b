//! The phase state machine
//!
//! `Session` owns the round, the stats, and the single live timer. Hosts
//! feed it `Msg`s together with a monotonic `now_ms`, run the `Cmd`s it
//! returns (usually through `Scheduler`), and render from its accessors.
//!
//! Timer discipline: at most one timer token is live at any moment.
//! Every transition cancels the old token before arming a new one, and a
//! fired timer whose token is no longer live is dropped on the floor.
//! That guard is what makes the countdown race-free: a tick already in
//! flight when the player picks a stone cannot resolve the round twice.

use crate::{
    cmd::LogLevel,
    phase::{countdown_ticks, memorize_duration_ms, select_duration_ms},
    Alphabet, Cmd, Event, GameRng, GameStats, Msg, Phase, Resolution, Result, Round, TimerId,
};
use serde::{Deserialize, Serialize};

/// Cosmetic pause between scoring and the result screen, in ms
///
/// Scoring happens at the selection instant; this delay only lets the
/// player see their pick highlighted before the screen changes.
const REVEAL_DELAY_MS: u64 = 500;

/// Countdown cadence: one tick per second
const TICK_PERIOD_MS: u64 = 1_000;

/// Session construction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// RNG seed; equal seeds and inputs replay identically
    pub seed: u64,
    /// Glyph set rounds draw from
    pub alphabet: Alphabet,
}

impl SessionConfig {
    /// Default alphabet with a chosen seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            alphabet: Alphabet::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::with_seed(0x5EED)
    }
}

/// The single live timer and what it means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum ActiveTimer {
    /// Memorization countdown with whole seconds left
    Memorize { timer: TimerId, ticks_left: u32 },
    /// Selection countdown with whole seconds left
    Select { timer: TimerId, ticks_left: u32 },
    /// One-shot pause before the result screen
    Reveal { timer: TimerId },
}

impl ActiveTimer {
    fn id(&self) -> TimerId {
        match self {
            ActiveTimer::Memorize { timer, .. }
            | ActiveTimer::Select { timer, .. }
            | ActiveTimer::Reveal { timer } => *timer,
        }
    }
}

/// Output of one `Session::update` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateResult {
    /// Side effects for the host, in order
    pub cmds: Vec<Cmd>,
    /// State changes worth reacting to, in order
    pub events: Vec<Event>,
}

impl UpdateResult {
    fn cmd(&mut self, cmd: Cmd) {
        self.cmds.push(cmd);
    }

    fn event(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// The Symbol Match state machine
///
/// Self-initializing: a new session already holds its first round and
/// sits in `Preparation`. All timing arrives from the host as `now_ms`
/// on some monotonic millisecond clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    phase: Phase,
    stats: GameStats,
    round: Option<Round>,
    alphabet: Alphabet,
    rng: GameRng,
    active_timer: Option<ActiveTimer>,
    next_timer: u64,
    memorize_started_ms: Option<u64>,
    last_resolution: Option<Resolution>,
}

impl Session {
    /// Create a session with its first round ready
    pub fn new(config: SessionConfig) -> Result<Self> {
        let mut rng = GameRng::new(config.seed);
        let round = Round::generate(1, &config.alphabet, &mut rng)?;
        Ok(Self {
            phase: Phase::Preparation,
            stats: GameStats::new(),
            round: Some(round),
            alphabet: config.alphabet,
            rng,
            active_timer: None,
            next_timer: 0,
            memorize_started_ms: None,
            last_resolution: None,
        })
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Session-lifetime stats
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// The round in play, absent only after exit
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Seconds left on the running countdown, already rounded up
    pub fn countdown_secs(&self) -> Option<u32> {
        match self.active_timer {
            Some(ActiveTimer::Memorize { ticks_left, .. })
            | Some(ActiveTimer::Select { ticks_left, .. }) => Some(ticks_left),
            _ => None,
        }
    }

    /// How the last resolved round went, cleared when the next one starts
    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    /// Process one message
    pub fn update(&mut self, msg: Msg, now_ms: u64) -> UpdateResult {
        let mut out = UpdateResult::default();
        match msg {
            Msg::Begin => self.begin(now_ms, &mut out),
            Msg::Select { index } => self.select(index, now_ms, &mut out),
            Msg::Continue => self.next_round(&mut out),
            Msg::TimerFired { timer } => self.timer_fired(timer, &mut out),
            Msg::Exit => self.exit(&mut out),
        }
        out
    }

    fn alloc_timer(&mut self) -> TimerId {
        self.next_timer += 1;
        TimerId::new(self.next_timer)
    }

    fn cancel_active(&mut self, out: &mut UpdateResult) {
        if let Some(active) = self.active_timer.take() {
            out.cmd(Cmd::CancelTimer { timer: active.id() });
        }
    }

    fn begin(&mut self, now_ms: u64, out: &mut UpdateResult) {
        if self.phase != Phase::Preparation {
            return;
        }
        self.cancel_active(out);
        let duration = memorize_duration_ms(self.stats.level);
        let timer = self.alloc_timer();
        self.active_timer = Some(ActiveTimer::Memorize {
            timer,
            ticks_left: countdown_ticks(duration),
        });
        self.memorize_started_ms = Some(now_ms);
        self.phase = Phase::Memorization;
        out.cmd(Cmd::StartInterval {
            timer,
            period_ms: TICK_PERIOD_MS,
        });
        out.cmd(Cmd::debug(format!("memorization window {duration}ms")));
        out.event(Event::PhaseChanged(Phase::Memorization));
    }

    fn enter_selection(&mut self, out: &mut UpdateResult) {
        self.cancel_active(out);
        let duration = select_duration_ms(self.stats.level);
        let timer = self.alloc_timer();
        self.active_timer = Some(ActiveTimer::Select {
            timer,
            ticks_left: countdown_ticks(duration),
        });
        self.phase = Phase::Selection;
        out.cmd(Cmd::StartInterval {
            timer,
            period_ms: TICK_PERIOD_MS,
        });
        out.cmd(Cmd::debug(format!("selection window {duration}ms")));
        out.event(Event::PhaseChanged(Phase::Selection));
    }

    fn timer_fired(&mut self, timer: TimerId, out: &mut UpdateResult) {
        // Stale token: the timer was cancelled logically but a tick was
        // already in flight
        let Some(active) = self.active_timer else {
            return;
        };
        if active.id() != timer {
            return;
        }

        match active {
            ActiveTimer::Memorize { ticks_left, .. } => {
                let left = ticks_left.saturating_sub(1);
                if left == 0 {
                    self.enter_selection(out);
                } else {
                    self.active_timer = Some(ActiveTimer::Memorize {
                        timer,
                        ticks_left: left,
                    });
                }
            }
            ActiveTimer::Select { ticks_left, .. } => {
                let left = ticks_left.saturating_sub(1);
                if left == 0 {
                    self.resolve_timeout(out);
                } else {
                    self.active_timer = Some(ActiveTimer::Select {
                        timer,
                        ticks_left: left,
                    });
                }
            }
            ActiveTimer::Reveal { .. } => {
                self.active_timer = None;
                self.phase = Phase::Result;
                out.event(Event::PhaseChanged(Phase::Result));
            }
        }
    }

    fn select(&mut self, index: usize, now_ms: u64, out: &mut UpdateResult) {
        if self.phase != Phase::Selection {
            return;
        }
        let Some(round) = self.round.as_ref() else {
            return;
        };
        // A round resolves at most once; late picks are silently ignored
        if round.outcome().is_some() || index >= round.stones().len() {
            return;
        }

        let correct = round.stones()[index].is_match();
        let resolution = if correct {
            let started = self.memorize_started_ms.unwrap_or(now_ms);
            self.stats.resolve_correct(now_ms.saturating_sub(started))
        } else {
            self.stats.resolve_miss(false)
        };

        if let Some(round) = self.round.as_mut() {
            round.record_outcome(Some(index), resolution.outcome);
        }
        self.last_resolution = Some(resolution);
        self.cancel_active(out);
        self.schedule_reveal(out);
        if resolution.leveled_up {
            out.cmd(Cmd::info(format!("leveled up to {}", self.stats.level)));
        }
        out.event(Event::RoundResolved(resolution));
    }

    fn resolve_timeout(&mut self, out: &mut UpdateResult) {
        let resolution = self.stats.resolve_miss(true);
        if let Some(round) = self.round.as_mut() {
            round.record_outcome(None, resolution.outcome);
        }
        self.last_resolution = Some(resolution);
        self.cancel_active(out);
        self.schedule_reveal(out);
        out.event(Event::RoundResolved(resolution));
    }

    fn schedule_reveal(&mut self, out: &mut UpdateResult) {
        let timer = self.alloc_timer();
        self.active_timer = Some(ActiveTimer::Reveal { timer });
        out.cmd(Cmd::RunAfter {
            timer,
            delay_ms: REVEAL_DELAY_MS,
        });
    }

    fn next_round(&mut self, out: &mut UpdateResult) {
        if self.phase != Phase::Result {
            return;
        }
        match Round::generate(self.stats.level, &self.alphabet, &mut self.rng) {
            Ok(round) => {
                let stones = round.stones().len();
                self.round = Some(round);
                self.last_resolution = None;
                self.memorize_started_ms = None;
                self.phase = Phase::Preparation;
                out.event(Event::RoundStarted {
                    level: self.stats.level,
                    stones,
                });
                out.event(Event::PhaseChanged(Phase::Preparation));
            }
            Err(err) => {
                // A validated alphabet cannot exhaust; if it somehow does,
                // refuse to present a broken round
                debug_assert!(false, "round generation failed: {err}");
                out.cmd(Cmd::log(
                    LogLevel::Error,
                    format!("round generation failed: {err}"),
                ));
                self.exit(out);
            }
        }
    }

    fn exit(&mut self, out: &mut UpdateResult) {
        if self.phase == Phase::Paused {
            return;
        }
        self.cancel_active(out);
        self.round = None;
        self.last_resolution = None;
        self.memorize_started_ms = None;
        self.phase = Phase::Paused;
        out.event(Event::PhaseChanged(Phase::Paused));
        out.event(Event::SessionEnded { stats: self.stats });
    }
}
