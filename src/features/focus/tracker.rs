//! Input routing for a focus session.
//!
//! [`FocusTracker`] is the command surface the front end talks to. It owns
//! the session, the proximity presets, and the optional gaze source, and it
//! drives both timers from [`FocusTracker::pump`]:
//! - the session clock (one tick per second while running)
//! - the gaze poll (one frame per ~100ms while running with gaze enabled)
//!
//! While gaze is enabled it replaces the pointer as the input source.

use super::proximity::{InputSource, ProximityDetector, Sample, TargetRegion};
use super::report::SessionSnapshot;
use super::session::FocusSession;
use super::timer::{Clock, Interval, SystemClock, TICK_INTERVAL_MS};
use crate::config::TrackingConfig;
use crate::features::gaze::{FrameSource, GazeEstimator, GazeSource, PixelBuffer, Viewport};

/// Default gaze polling period.
pub const GAZE_POLL_INTERVAL_MS: u64 = 100;

/// Tuning for a [`FocusTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerOptions {
    /// Proximity radii per input source.
    pub detector: ProximityDetector,
    /// Session clock period.
    pub tick_interval_ms: u64,
    /// Gaze frame polling period.
    pub gaze_poll_interval_ms: u64,
    /// Only count pointer movement while a button or finger is down.
    pub require_press: bool,
    /// Screen area gaze estimates are scaled into.
    pub viewport: Viewport,
}

impl TrackerOptions {
    /// Build options from the tracking config section.
    #[must_use]
    pub fn from_config(config: &TrackingConfig, viewport: Viewport) -> Self {
        Self {
            detector: ProximityDetector::new(config.pointer_threshold_px, config.gaze_threshold_px),
            tick_interval_ms: config.tick_interval_ms,
            gaze_poll_interval_ms: config.gaze_poll_interval_ms,
            require_press: config.require_press,
            viewport,
        }
    }
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            detector: ProximityDetector::default(),
            tick_interval_ms: TICK_INTERVAL_MS,
            gaze_poll_interval_ms: GAZE_POLL_INTERVAL_MS,
            require_press: true,
            viewport: Viewport::new(1280.0, 720.0),
        }
    }
}

/// Routes pointer and gaze input into a [`FocusSession`].
#[derive(Debug)]
pub struct FocusTracker<C: Clock = SystemClock> {
    session: FocusSession<C>,
    detector: ProximityDetector,
    estimator: GazeEstimator,
    gaze: Option<GazeSource>,
    gaze_poll: Option<Interval>,
    gaze_poll_interval_ms: u64,
    require_press: bool,
    pressed: bool,
    last_gaze: Option<(f64, f64)>,
}

impl FocusTracker<SystemClock> {
    /// Create a tracker on the system clock.
    #[must_use]
    pub fn new(options: TrackerOptions) -> Self {
        Self::with_clock(SystemClock::new(), options)
    }
}

impl<C: Clock> FocusTracker<C> {
    /// Create a tracker on a custom clock.
    #[must_use]
    pub fn with_clock(clock: C, options: TrackerOptions) -> Self {
        Self {
            session: FocusSession::with_tick_interval(clock, options.tick_interval_ms),
            detector: options.detector,
            estimator: GazeEstimator::new(options.viewport),
            gaze: None,
            gaze_poll: None,
            gaze_poll_interval_ms: options.gaze_poll_interval_ms,
            require_press: options.require_press,
            pressed: false,
            last_gaze: None,
        }
    }

    /// Start the session.
    pub fn start(&mut self) {
        self.session.start();
        self.arm_gaze_poll();
    }

    /// Stop the session. The gaze poll is cancelled before returning.
    pub fn stop(&mut self) {
        self.gaze_poll = None;
        self.session.stop();
    }

    /// Stop and clear all counters.
    pub fn reset(&mut self) {
        self.gaze_poll = None;
        self.session.reset();
        self.last_gaze = None;
    }

    /// Pointer pressed at `sample`. Engages tracking and checks the sample.
    pub fn pointer_down(&mut self, sample: Sample, target: TargetRegion) -> Option<bool> {
        self.pressed = true;
        self.feed_sample(sample, target)
    }

    /// Pointer released. Ends following for pointer input.
    pub fn pointer_up(&mut self) {
        self.pressed = false;
        if !self.is_gaze_enabled() {
            self.session.on_proximity_change(false);
        }
    }

    /// Check a pointer sample against the target.
    ///
    /// Returns the near/far decision, or `None` when the sample was not
    /// evaluated (gaze is the active source, or the pointer is not pressed
    /// while presses are required).
    pub fn feed_sample(&mut self, sample: Sample, target: TargetRegion) -> Option<bool> {
        if self.is_gaze_enabled() || (self.require_press && !self.pressed) {
            return None;
        }
        let near = self.detector.check(&sample, &target, InputSource::Pointer);
        self.session.on_proximity_change(near);
        Some(near)
    }

    /// Estimate gaze from a frame and check it against the target.
    ///
    /// Unusable frames return `None` and leave the session untouched.
    pub fn feed_frame(&mut self, frame: &PixelBuffer, target: TargetRegion) -> Option<bool> {
        let Some((x, y)) = self.estimator.estimate(frame) else {
            log::debug!(
                "Skipping unusable {}x{} frame",
                frame.width(),
                frame.height()
            );
            return None;
        };
        self.last_gaze = Some((x, y));
        let sample = Sample::new(x, y, self.session.clock().now_ms());
        let near = self.detector.check(&sample, &target, InputSource::Gaze);
        self.session.on_proximity_change(near);
        Some(near)
    }

    /// Install the frame source used when gaze is enabled. A previously
    /// attached source is released.
    pub fn attach_frame_source(&mut self, source: Box<dyn FrameSource>) {
        self.disable_gaze();
        self.gaze = Some(GazeSource::new(source));
    }

    /// Switch gaze input on or off.
    ///
    /// Returns whether gaze is enabled afterwards. A missing or failing
    /// camera is not fatal: gaze stays off and the pointer keeps working.
    pub fn set_gaze_enabled(&mut self, enabled: bool) -> bool {
        if !enabled {
            self.disable_gaze();
            return false;
        }
        if self.is_gaze_enabled() {
            return true;
        }

        let Some(gaze) = self.gaze.as_mut() else {
            log::warn!("Gaze requested but no frame source is attached; using pointer input");
            return false;
        };
        if let Err(e) = gaze.open() {
            log::warn!("Gaze source unavailable ({e}); using pointer input");
            return false;
        }

        // Pointer-driven following does not carry over to gaze.
        self.session.on_proximity_change(false);
        self.arm_gaze_poll();
        true
    }

    fn disable_gaze(&mut self) {
        self.gaze_poll = None;
        if let Some(gaze) = self.gaze.as_mut() {
            if gaze.is_open() {
                gaze.close();
                self.session.on_proximity_change(false);
            }
        }
        self.last_gaze = None;
    }

    fn arm_gaze_poll(&mut self) {
        if self.gaze_poll.is_none() && self.session.is_running() && self.is_gaze_enabled() {
            let now = self.session.clock().now_ms();
            self.gaze_poll = Some(Interval::starting_at(now, self.gaze_poll_interval_ms));
        }
    }

    /// Whether gaze is the active input source.
    #[must_use]
    pub fn is_gaze_enabled(&self) -> bool {
        self.gaze.as_ref().is_some_and(GazeSource::is_open)
    }

    /// Drive both timers. Call this from the event loop.
    ///
    /// `target` is the dot position right now, used if a gaze frame is
    /// captured. Returns the number of session ticks delivered.
    pub fn pump(&mut self, target: TargetRegion) -> u32 {
        let ticks = self.session.pump();

        let now = self.session.clock().now_ms();
        let due = self.gaze_poll.as_mut().map_or(0, |poll| poll.poll(now));
        if due == 0 {
            return ticks;
        }

        // Frames that fell due while we were busy are stale; take one.
        let captured = match self.gaze.as_mut() {
            Some(gaze) => gaze.capture(),
            None => Ok(None),
        };
        match captured {
            Ok(Some(frame)) => {
                self.feed_frame(&frame, target);
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("Gaze capture failed ({e}); falling back to pointer input");
                self.disable_gaze();
            }
        }
        ticks
    }

    /// Viewport gaze points are scaled to.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.estimator.viewport()
    }

    /// Update the gaze viewport, e.g. after a terminal resize.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.estimator.set_viewport(viewport);
    }

    /// Whether a pointer press is engaged.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Last gaze estimate, for drawing a gaze cursor.
    #[must_use]
    pub const fn last_gaze_point(&self) -> Option<(f64, f64)> {
        self.last_gaze
    }

    /// The underlying session.
    #[must_use]
    pub const fn session(&self) -> &FocusSession<C> {
        &self.session
    }

    /// Read-only view for presentation code.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Whether the session is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.session.is_running()
    }

    /// Whether input is on the dot.
    #[must_use]
    pub const fn is_following(&self) -> bool {
        self.session.is_following()
    }
}
