//! Application state for the TUI.

use std::f64::consts::TAU;
use std::path::PathBuf;

use ratatui::layout::Rect;

use crate::config::{AudioConfig, DotConfig, DotMotion, TrackingConfig};
use crate::features::ambient::AmbientAudioPlayer;
use crate::features::focus::{
    Clock, FocusTracker, Sample, SessionSnapshot, SystemClock, TargetRegion, TrackerOptions,
};
use crate::features::gaze::{ImageDirSource, Viewport};

/// Volume change per `+`/`-` press.
const VOLUME_STEP: u8 = 10;

/// Field size in cells until the first draw reports the real one.
const INITIAL_FIELD_COLS: u16 = 80;
const INITIAL_FIELD_ROWS: u16 = 20;

/// Audio rendered per UI frame for the level meter.
const METER_WINDOW_SECS: f64 = 0.05;

/// Everything the terminal front end needs to start.
#[derive(Debug, Clone, Default)]
pub struct TuiOptions {
    /// Proximity and timing settings.
    pub tracking: TrackingConfig,
    /// Dot motion.
    pub dot: DotConfig,
    /// Ambient tone settings.
    pub audio: AudioConfig,
    /// Image directory used as the gaze source, if any.
    pub frames: Option<PathBuf>,
    /// Enable gaze right away.
    pub gaze_on_start: bool,
    /// Start the ambient tone right away.
    pub music_on_start: bool,
}

/// Application state.
pub struct App<C: Clock = SystemClock> {
    tracker: FocusTracker<C>,
    player: AmbientAudioPlayer,
    dot: DotConfig,
    cell_width_px: f64,
    cell_height_px: f64,
    /// Area of the terminal the dot moves in.
    pub field: Rect,
    /// Peak level of the last rendered audio chunk, 0.0-1.0.
    pub audio_level: f32,
    /// Status message to display.
    pub status: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App<SystemClock> {
    /// Create a new app on the system clock.
    #[must_use]
    pub fn new(options: TuiOptions) -> Self {
        Self::with_clock(SystemClock::new(), options)
    }
}

impl<C: Clock> App<C> {
    /// Create a new app on a custom clock.
    pub fn with_clock(clock: C, options: TuiOptions) -> Self {
        let field = Rect::new(0, 0, INITIAL_FIELD_COLS, INITIAL_FIELD_ROWS);
        let viewport = Viewport::new(
            f64::from(field.width) * options.tracking.cell_width_px,
            f64::from(field.height) * options.tracking.cell_height_px,
        );
        let tracker_options = TrackerOptions::from_config(&options.tracking, viewport);
        let mut tracker = FocusTracker::with_clock(clock, tracker_options);

        if let Some(dir) = options.frames {
            tracker.attach_frame_source(Box::new(ImageDirSource::new(dir)));
        }

        let mut player = AmbientAudioPlayer::new(options.audio.mode, options.audio.sample_rate);
        player.set_volume(options.audio.volume_percent);

        let mut app = Self {
            tracker,
            player,
            dot: options.dot,
            cell_width_px: options.tracking.cell_width_px,
            cell_height_px: options.tracking.cell_height_px,
            field,
            audio_level: 0.0,
            status: Some("s:start | hold mouse on the dot | ?:help".to_string()),
            should_quit: false,
        };

        if options.gaze_on_start {
            app.toggle_gaze();
        }
        if options.music_on_start {
            app.toggle_music();
        }
        app
    }

    /// Resize the field the dot moves in.
    pub fn set_field(&mut self, field: Rect) {
        if field == self.field {
            return;
        }
        self.field = field;
        let (w, h) = self.field_size_px();
        self.tracker.set_viewport(Viewport::new(w, h));
    }

    /// Field size in pixels.
    #[must_use]
    pub fn field_size_px(&self) -> (f64, f64) {
        (
            f64::from(self.field.width) * self.cell_width_px,
            f64::from(self.field.height) * self.cell_height_px,
        )
    }

    /// Dot center in field pixels right now.
    #[must_use]
    pub fn target(&self) -> TargetRegion {
        let (w, h) = self.field_size_px();
        #[allow(clippy::cast_precision_loss)]
        let t = self.tracker.session().clock().now_ms() as f64 / 1000.0;
        let (x, y) = dot_position(&self.dot, w, h, t);
        TargetRegion::new(x, y)
    }

    /// Terminal cell holding a field-pixel position.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_to_cell(&self, x: f64, y: f64) -> (u16, u16) {
        let col = (x / self.cell_width_px).floor().max(0.0) as u16;
        let row = (y / self.cell_height_px).floor().max(0.0) as u16;
        (
            self.field.x + col.min(self.field.width.saturating_sub(1)),
            self.field.y + row.min(self.field.height.saturating_sub(1)),
        )
    }

    /// Field-pixel sample at the center of a terminal cell.
    ///
    /// Returns `None` outside the field.
    #[must_use]
    pub fn cell_to_sample(&self, column: u16, row: u16) -> Option<Sample> {
        let inside = column >= self.field.x
            && column < self.field.x + self.field.width
            && row >= self.field.y
            && row < self.field.y + self.field.height;
        if !inside {
            return None;
        }
        let x = (f64::from(column - self.field.x) + 0.5) * self.cell_width_px;
        let y = (f64::from(row - self.field.y) + 0.5) * self.cell_height_px;
        Some(Sample::new(x, y, self.tracker.session().clock().now_ms()))
    }

    /// Mouse button pressed.
    pub fn mouse_down(&mut self, column: u16, row: u16) {
        if let Some(sample) = self.cell_to_sample(column, row) {
            let target = self.target();
            self.tracker.pointer_down(sample, target);
        }
    }

    /// Mouse moved or dragged.
    pub fn mouse_move(&mut self, column: u16, row: u16) {
        match self.cell_to_sample(column, row) {
            Some(sample) => {
                let target = self.target();
                self.tracker.feed_sample(sample, target);
            }
            // Leaving the field counts as letting go.
            None if self.tracker.is_pressed() => self.tracker.pointer_up(),
            None => {}
        }
    }

    /// Mouse button released.
    pub fn mouse_up(&mut self) {
        self.tracker.pointer_up();
    }

    /// Start the session.
    pub fn start(&mut self) {
        self.tracker.start();
        self.status = Some("Session running".to_string());
    }

    /// Stop the session.
    pub fn stop(&mut self) {
        self.tracker.stop();
        self.status = Some("Session stopped".to_string());
    }

    /// Stop and zero everything.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.status = Some("Session reset".to_string());
    }

    /// Switch gaze input on or off.
    pub fn toggle_gaze(&mut self) {
        let want = !self.tracker.is_gaze_enabled();
        let enabled = self.tracker.set_gaze_enabled(want);
        self.status = Some(match (want, enabled) {
            (true, true) => "Gaze tracking on".to_string(),
            (true, false) => "Gaze unavailable, using mouse".to_string(),
            (false, _) => "Gaze tracking off".to_string(),
        });
    }

    /// Start or stop the ambient tone.
    pub fn toggle_music(&mut self) {
        let playing = self.player.toggle();
        self.status = Some(if playing {
            format!("{} tone on", self.player.mode())
        } else {
            "Tone off".to_string()
        });
    }

    /// Raise the tone volume.
    pub fn volume_up(&mut self) {
        let volume = self.player.volume_percent().saturating_add(VOLUME_STEP);
        self.player.set_volume(volume);
        self.status = Some(format!("Volume {}%", self.player.volume_percent()));
    }

    /// Lower the tone volume.
    pub fn volume_down(&mut self) {
        let volume = self.player.volume_percent().saturating_sub(VOLUME_STEP);
        self.player.set_volume(volume);
        self.status = Some(format!("Volume {}%", self.player.volume_percent()));
    }

    /// Advance timers and audio. Called once per loop iteration.
    pub fn tick(&mut self) {
        let target = self.target();
        self.tracker.pump(target);

        if self.player.is_playing() {
            let chunk = self.player.render_seconds(METER_WINDOW_SECS);
            self.audio_level = chunk.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        } else {
            self.audio_level = 0.0;
        }
    }

    /// Stop everything and return the final numbers.
    pub fn finish(&mut self) -> SessionSnapshot {
        self.tracker.stop();
        self.player.stop();
        self.tracker.snapshot()
    }

    /// Current session numbers.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tracker.snapshot()
    }

    /// Whether gaze is the active input.
    #[must_use]
    pub fn is_gaze_enabled(&self) -> bool {
        self.tracker.is_gaze_enabled()
    }

    /// Last gaze estimate in field pixels.
    #[must_use]
    pub const fn last_gaze_point(&self) -> Option<(f64, f64)> {
        self.tracker.last_gaze_point()
    }

    /// Whether the mouse button is held.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.tracker.is_pressed()
    }

    /// Whether the tone is playing.
    #[must_use]
    pub const fn is_music_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Tone volume, 0-100.
    #[must_use]
    pub fn volume_percent(&self) -> u8 {
        self.player.volume_percent()
    }

    /// Underlying tracker.
    #[must_use]
    pub const fn tracker(&self) -> &FocusTracker<C> {
        &self.tracker
    }
}

/// Dot center for a field of `width` x `height` pixels at `t` seconds.
#[must_use]
pub fn dot_position(dot: &DotConfig, width: f64, height: f64, t: f64) -> (f64, f64) {
    let (cx, cy) = (width / 2.0, height / 2.0);
    match dot.motion {
        DotMotion::Fixed => (cx, cy),
        DotMotion::Orbit => {
            let angle = TAU * t / dot.orbit_period_secs;
            let ratio = dot.orbit_radius_ratio.clamp(0.0, 0.5);
            (
                (width * ratio).mul_add(angle.cos(), cx),
                (height * ratio).mul_add(angle.sin(), cy),
            )
        }
    }
}
