//! Focus session state machine.
//!
//! A session counts total running time in one-second ticks and integrates
//! the wall-clock time spent following the dot. Every operation is total:
//! calls that do not apply to the current state are no-ops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::report::SessionSnapshot;
use super::timer::{Clock, FocusClock, SystemClock, TICK_INTERVAL_MS};

/// Observable state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Not running. Totals are kept from the last run until reset.
    Idle,
    /// Running, input is away from the dot.
    RunningNotFollowing,
    /// Running, input is on the dot.
    RunningFollowing,
}

impl SessionState {
    /// Whether the clock is counting.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::RunningNotFollowing | Self::RunningFollowing)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::RunningNotFollowing => write!(f, "Running"),
            Self::RunningFollowing => write!(f, "Following"),
        }
    }
}

/// Accuracy as a whole percentage, rounding halves up. Zero when nothing
/// has been timed yet.
#[must_use]
pub fn accuracy_percent(focus_ms: u64, total_ms: u64) -> u8 {
    if total_ms == 0 {
        return 0;
    }
    let focus = u128::from(focus_ms.min(total_ms));
    let total = u128::from(total_ms);
    let rounded = (focus * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

/// A focus session.
#[derive(Debug)]
pub struct FocusSession<C: Clock = SystemClock> {
    clock: C,
    ticker: FocusClock,
    total_elapsed_ms: u64,
    focus_elapsed_ms: u64,
    accuracy_percent: u8,
    running: bool,
    following: bool,
    follow_started_at_ms: Option<u64>,
    /// Running time up to here has been added to the total.
    accounted_until_ms: u64,
    started_at: Option<DateTime<Utc>>,
}

impl FocusSession<SystemClock> {
    /// Create an idle session on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for FocusSession<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FocusSession<C> {
    /// Create an idle session on a custom clock.
    #[must_use]
    pub const fn with_clock(clock: C) -> Self {
        Self::with_tick_interval(clock, TICK_INTERVAL_MS)
    }

    /// Create an idle session with a custom tick length.
    #[must_use]
    pub const fn with_tick_interval(clock: C, tick_interval_ms: u64) -> Self {
        Self {
            clock,
            ticker: FocusClock::new(tick_interval_ms),
            total_elapsed_ms: 0,
            focus_elapsed_ms: 0,
            accuracy_percent: 0,
            running: false,
            following: false,
            follow_started_at_ms: None,
            accounted_until_ms: 0,
            started_at: None,
        }
    }

    /// Begin counting. No-op if already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        let now = self.clock.now_ms();
        self.running = true;
        self.accounted_until_ms = now;
        self.ticker.start(now);
        self.started_at.get_or_insert_with(Utc::now);
        log::info!("Focus session started");
    }

    /// Stop counting. Closes an open following interval first.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        if self.following {
            self.end_following();
        }
        self.ticker.stop();

        let now = self.clock.now_ms();
        let remainder = now.saturating_sub(self.accounted_until_ms);
        self.total_elapsed_ms = self.total_elapsed_ms.saturating_add(remainder);
        self.accounted_until_ms = now;
        self.running = false;
        self.recompute_accuracy();

        log::info!(
            "Focus session stopped: total {}ms, focus {}ms, accuracy {}%",
            self.total_elapsed_ms,
            self.focus_elapsed_ms(),
            self.accuracy_percent
        );
    }

    /// Stop and zero every counter.
    pub fn reset(&mut self) {
        self.stop();
        self.total_elapsed_ms = 0;
        self.focus_elapsed_ms = 0;
        self.accuracy_percent = 0;
        self.follow_started_at_ms = None;
        self.started_at = None;
        log::debug!("Focus session reset");
    }

    /// One clock period elapsed. No-op when idle.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        let period = self.ticker.period_ms();
        self.total_elapsed_ms = self.total_elapsed_ms.saturating_add(period);
        self.accounted_until_ms = self.accounted_until_ms.saturating_add(period);
        self.recompute_accuracy();
    }

    /// Deliver every tick that fell due since the last pump.
    ///
    /// Returns the number of ticks delivered.
    pub fn pump(&mut self) -> u32 {
        if !self.running {
            return 0;
        }
        let due = self.ticker.due_ticks(self.clock.now_ms());
        for _ in 0..due {
            self.tick();
        }
        due
    }

    /// Feed the latest near/far decision.
    pub fn on_proximity_change(&mut self, is_near: bool) {
        if !self.running {
            return;
        }
        match (is_near, self.following) {
            (true, false) => {
                self.following = true;
                self.follow_started_at_ms = Some(self.clock.now_ms());
                log::debug!("Following started");
            }
            (false, true) => self.end_following(),
            _ => {}
        }
    }

    fn end_following(&mut self) {
        self.following = false;
        if let Some(started) = self.follow_started_at_ms.take() {
            let duration = self.clock.now_ms().saturating_sub(started);
            self.focus_elapsed_ms = self.focus_elapsed_ms.saturating_add(duration);
            log::debug!("Following ended after {duration}ms");
        }
        self.recompute_accuracy();
    }

    fn recompute_accuracy(&mut self) {
        self.accuracy_percent = accuracy_percent(self.focus_elapsed_ms, self.total_elapsed_ms);
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        match (self.running, self.following) {
            (false, _) => SessionState::Idle,
            (true, false) => SessionState::RunningNotFollowing,
            (true, true) => SessionState::RunningFollowing,
        }
    }

    /// Counted running time.
    #[must_use]
    pub const fn total_elapsed_ms(&self) -> u64 {
        self.total_elapsed_ms
    }

    /// Closed following time, never more than [`Self::total_elapsed_ms`].
    ///
    /// Total advances in whole ticks while focus is measured continuously,
    /// so inside a second the raw focus can briefly run ahead of the total.
    #[must_use]
    pub fn focus_elapsed_ms(&self) -> u64 {
        self.focus_elapsed_ms.min(self.total_elapsed_ms)
    }

    /// Focus as a percentage of total.
    #[must_use]
    pub const fn accuracy_percent(&self) -> u8 {
        self.accuracy_percent
    }

    /// Whether input is currently on the dot.
    #[must_use]
    pub const fn is_following(&self) -> bool {
        self.following
    }

    /// Whether the clock is counting.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// When the session was first started since the last reset.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// The session clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Read-only view for presentation code.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            total_elapsed_ms: self.total_elapsed_ms,
            focus_elapsed_ms: self.focus_elapsed_ms(),
            accuracy_percent: self.accuracy_percent,
            is_following: self.following,
            is_running: self.running,
            started_at: self.started_at,
        }
    }
}
