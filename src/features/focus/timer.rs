//! Clocks and cancellable intervals.
//!
//! Everything here is single-threaded. An [`Interval`] is an owned schedule:
//! cancelling one means dropping it, so a cancelled interval can never
//! report another due period.

#[cfg(test)]
use std::cell::Cell;
#[cfg(test)]
use std::rc::Rc;
use std::time::Instant;

/// Default length of one session clock tick.
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Source of monotonic milliseconds.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by [`Instant`], measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for simulations and tests.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the session.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

#[cfg(test)]
impl ManualClock {
    /// Create a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time.
    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    /// Move forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// A fixed-period schedule polled from an event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    period_ms: u64,
    next_due_ms: u64,
}

impl Interval {
    /// Arm an interval whose first period ends `period_ms` after `now_ms`.
    ///
    /// A zero period is treated as one millisecond.
    #[must_use]
    pub fn starting_at(now_ms: u64, period_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due_ms: now_ms.saturating_add(period_ms),
        }
    }

    /// Number of whole periods that ended at or before `now_ms` since the
    /// last poll. Advances the schedule past them.
    pub fn poll(&mut self, now_ms: u64) -> u32 {
        if now_ms < self.next_due_ms {
            return 0;
        }
        let periods = (now_ms - self.next_due_ms) / self.period_ms + 1;
        self.next_due_ms = self
            .next_due_ms
            .saturating_add(periods.saturating_mul(self.period_ms));
        u32::try_from(periods).unwrap_or(u32::MAX)
    }

    /// Milliseconds until the next period ends.
    #[must_use]
    pub const fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.next_due_ms.saturating_sub(now_ms)
    }

    /// The configured period.
    #[must_use]
    pub const fn period_ms(&self) -> u64 {
        self.period_ms
    }
}

/// The once-per-second schedule behind a running session.
///
/// Holds its [`Interval`] only while running; [`FocusClock::stop`] drops it,
/// so no tick can be reported after a stop has been processed.
#[derive(Debug, Clone)]
pub struct FocusClock {
    period_ms: u64,
    schedule: Option<Interval>,
}

impl FocusClock {
    /// Create a stopped clock ticking every `period_ms`.
    #[must_use]
    pub const fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            schedule: None,
        }
    }

    /// Arm the clock. Does nothing if it is already running.
    pub fn start(&mut self, now_ms: u64) {
        if self.schedule.is_none() {
            self.schedule = Some(Interval::starting_at(now_ms, self.period_ms));
        }
    }

    /// Cancel the schedule.
    pub fn stop(&mut self) {
        self.schedule = None;
    }

    /// Whether a schedule is armed.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    /// Ticks that fell due since the last call. Always zero when stopped.
    pub fn due_ticks(&mut self, now_ms: u64) -> u32 {
        self.schedule
            .as_mut()
            .map_or(0, |schedule| schedule.poll(now_ms))
    }

    /// Tick length in milliseconds.
    #[must_use]
    pub const fn period_ms(&self) -> u64 {
        self.period_ms
    }
}

impl Default for FocusClock {
    fn default() -> Self {
        Self::new(TICK_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.set(1500);
        assert_eq!(clock.now_ms(), 1500);
        handle.advance(500);
        assert_eq!(clock.now_ms(), 2000);
    }

    #[test]
    fn test_interval_poll() {
        let mut interval = Interval::starting_at(0, 1000);
        assert_eq!(interval.poll(999), 0);
        assert_eq!(interval.poll(1000), 1);
        assert_eq!(interval.poll(1500), 0);
        assert_eq!(interval.poll(4200), 3);
        assert_eq!(interval.remaining_ms(4200), 800);
    }

    #[test]
    fn test_interval_zero_period() {
        let mut interval = Interval::starting_at(10, 0);
        assert_eq!(interval.period_ms(), 1);
        assert_eq!(interval.poll(13), 3);
    }

    #[test]
    fn test_focus_clock_start_is_idempotent() {
        let mut clock = FocusClock::new(1000);
        clock.start(0);
        clock.start(700);
        // Second start must not shift the schedule.
        assert_eq!(clock.due_ticks(1000), 1);
    }

    #[test]
    fn test_focus_clock_stop_cancels_pending_ticks() {
        let mut clock = FocusClock::default();
        clock.start(0);
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.due_ticks(10_000), 0);
    }

    #[test]
    fn test_focus_clock_restart_uses_new_origin() {
        let mut clock = FocusClock::default();
        clock.start(0);
        assert_eq!(clock.due_ticks(2500), 2);
        clock.stop();
        clock.start(5000);
        assert_eq!(clock.due_ticks(5999), 0);
        assert_eq!(clock.due_ticks(6000), 1);
    }
}
