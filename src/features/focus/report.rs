//! Session snapshots and time formatting.

use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

use super::session::SessionState;

/// Read-only view of a session for presentation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current state.
    pub state: SessionState,
    /// Counted running time.
    pub total_elapsed_ms: u64,
    /// Time spent on the dot.
    pub focus_elapsed_ms: u64,
    /// Focus as a percentage of total.
    pub accuracy_percent: u8,
    /// Whether input is on the dot right now.
    pub is_following: bool,
    /// Whether the clock is counting.
    pub is_running: bool,
    /// First start since the last reset.
    pub started_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    /// Total time as `MM:SS`.
    #[must_use]
    pub fn format_total(&self) -> String {
        format_clock(self.total_elapsed_ms)
    }

    /// Focus time as `Xm Ys` or `Ys`.
    #[must_use]
    pub fn format_focus(&self) -> String {
        format_focus_time(self.focus_elapsed_ms)
    }

    /// Start time in the local timezone.
    #[must_use]
    pub fn started_at_local(&self) -> Option<DateTime<Local>> {
        self.started_at.map(|t| t.with_timezone(&Local))
    }

    /// Time spent away from the dot.
    #[must_use]
    pub const fn distracted_ms(&self) -> u64 {
        self.total_elapsed_ms.saturating_sub(self.focus_elapsed_ms)
    }
}

fn duration_ms(ms: u64) -> Duration {
    Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

/// Format milliseconds as `MM:SS`, both parts zero-padded.
///
/// Minutes are not wrapped into hours.
#[must_use]
pub fn format_clock(ms: u64) -> String {
    let d = duration_ms(ms);
    let minutes = d.num_minutes();
    let seconds = d.num_seconds() % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format milliseconds as `Xm Ys`, dropping the minutes when zero.
#[must_use]
pub fn format_focus_time(ms: u64) -> String {
    let d = duration_ms(ms);
    let minutes = d.num_minutes();
    let seconds = d.num_seconds() % 60;

    if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Render an accuracy bar.
#[must_use]
pub fn render_accuracy_bar(percent: u8, width: usize) -> String {
    let filled = usize::from(percent.min(100)) * width / 100;
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
