//! Focus tracking.
//!
//! Measures how long the user stays on the dot:
//! - Proximity checks against the moving target
//! - One-second session clock with synchronous cancellation
//! - Following/not-following state machine and accuracy
//! - The tracker that ties pointer and gaze input together

pub mod proximity;
pub mod report;
pub mod session;
pub mod timer;
pub mod tracker;

pub use proximity::{is_near, InputSource, ProximityDetector, Sample, TargetRegion};
pub use report::{format_clock, format_focus_time, render_accuracy_bar, SessionSnapshot};
pub use session::{accuracy_percent, FocusSession, SessionState};
pub use timer::{Clock, FocusClock, Interval, SystemClock};
#[cfg(test)]
pub use timer::ManualClock;
pub use tracker::{FocusTracker, TrackerOptions};
