//! Configuration settings for focusdot.
//!
//! Settings are loaded from `~/.focusdot/config.yaml`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::FocusError;
use crate::features::ambient::ToneMode;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Proximity and timing settings.
    pub tracking: TrackingConfig,
    /// Target dot behaviour.
    pub dot: DotConfig,
    /// Ambient tone settings.
    pub audio: AudioConfig,
    /// Static page server settings.
    pub server: ServerConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Proximity and timing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackingConfig {
    /// Near radius for mouse and touch input, in pixels.
    #[serde(default = "default_pointer_threshold")]
    pub pointer_threshold_px: f64,
    /// Near radius for gaze estimates, in pixels.
    #[serde(default = "default_gaze_threshold")]
    pub gaze_threshold_px: f64,
    /// Session clock period.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Gaze frame polling period.
    #[serde(default = "default_gaze_poll_interval")]
    pub gaze_poll_interval_ms: u64,
    /// Only count pointer movement while a button is held.
    #[serde(default = "default_true")]
    pub require_press: bool,
    /// Width of one terminal cell in pixels.
    #[serde(default = "default_cell_width")]
    pub cell_width_px: f64,
    /// Height of one terminal cell in pixels.
    #[serde(default = "default_cell_height")]
    pub cell_height_px: f64,
}

/// How the target dot moves.
#[derive(ValueEnum, Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DotMotion {
    /// Stays in the middle of the field.
    Fixed,
    /// Travels around an ellipse.
    #[default]
    Orbit,
}

/// Target dot settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DotConfig {
    /// Movement pattern.
    #[serde(default)]
    pub motion: DotMotion,
    /// Seconds per orbit.
    #[serde(default = "default_orbit_period")]
    pub orbit_period_secs: f64,
    /// Orbit radius as a fraction of the field size.
    #[serde(default = "default_orbit_radius")]
    pub orbit_radius_ratio: f64,
}

/// Ambient tone settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AudioConfig {
    /// Initial volume, 0-100.
    #[serde(default = "default_volume")]
    pub volume_percent: u8,
    /// Tone generator.
    #[serde(default)]
    pub mode: ToneMode,
    /// Sample rate for rendering and export.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

/// Static page server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen port. The `PORT` environment variable wins over this.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Listen address.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory containing `index.html` and assets.
    #[serde(default = "default_root")]
    pub root: String,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_pointer_threshold() -> f64 {
    50.0
}

const fn default_gaze_threshold() -> f64 {
    100.0
}

const fn default_tick_interval() -> u64 {
    1000
}

const fn default_gaze_poll_interval() -> u64 {
    100
}

const fn default_true() -> bool {
    true
}

const fn default_cell_width() -> f64 {
    8.0
}

const fn default_cell_height() -> f64 {
    16.0
}

const fn default_orbit_period() -> f64 {
    20.0
}

const fn default_orbit_radius() -> f64 {
    0.3
}

const fn default_volume() -> u8 {
    50
}

const fn default_sample_rate() -> u32 {
    44_100
}

const fn default_port() -> u16 {
    3000
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_root() -> String {
    ".".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            pointer_threshold_px: default_pointer_threshold(),
            gaze_threshold_px: default_gaze_threshold(),
            tick_interval_ms: default_tick_interval(),
            gaze_poll_interval_ms: default_gaze_poll_interval(),
            require_press: default_true(),
            cell_width_px: default_cell_width(),
            cell_height_px: default_cell_height(),
        }
    }
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            motion: DotMotion::default(),
            orbit_period_secs: default_orbit_period(),
            orbit_radius_ratio: default_orbit_radius(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume_percent: default_volume(),
            mode: ToneMode::default(),
            sample_rate: default_sample_rate(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            root: default_root(),
        }
    }
}

/// Sample rates accepted for tone rendering and export.
pub const SAMPLE_RATE_RANGE: std::ops::RangeInclusive<u32> = 8_000..=192_000;

fn is_positive(value: f64) -> bool {
    value > 0.0
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, FocusError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// holds out-of-range values.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, FocusError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            FocusError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            FocusError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the tracker cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `FocusError::Config` naming the first bad field.
    pub fn validate(&self) -> Result<(), FocusError> {
        let t = &self.tracking;
        if !is_positive(t.pointer_threshold_px) || !is_positive(t.gaze_threshold_px) {
            return Err(FocusError::Config(
                "tracking thresholds must be positive".to_string(),
            ));
        }
        if t.tick_interval_ms == 0 || t.gaze_poll_interval_ms == 0 {
            return Err(FocusError::Config(
                "tracking intervals must be at least 1ms".to_string(),
            ));
        }
        if !is_positive(t.cell_width_px) || !is_positive(t.cell_height_px) {
            return Err(FocusError::Config(
                "cell dimensions must be positive".to_string(),
            ));
        }
        if !is_positive(self.dot.orbit_period_secs) {
            return Err(FocusError::Config(
                "dot.orbit_period_secs must be positive".to_string(),
            ));
        }
        if self.audio.volume_percent > 100 {
            return Err(FocusError::Config(
                "audio.volume_percent must be 0-100".to_string(),
            ));
        }
        if !SAMPLE_RATE_RANGE.contains(&self.audio.sample_rate) {
            return Err(FocusError::Config(format!(
                "audio.sample_rate must be {}-{}",
                SAMPLE_RATE_RANGE.start(),
                SAMPLE_RATE_RANGE.end()
            )));
        }
        Ok(())
    }

    /// Save configuration to the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save(&self) -> Result<(), FocusError> {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        self.save_to_path(&paths.config_file)
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), FocusError> {
        let contents = self.to_yaml()?;

        std::fs::write(path, contents).map_err(|e| {
            FocusError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Render as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, FocusError> {
        serde_yaml::to_string(self)
            .map_err(|e| FocusError::Config(format!("Failed to serialize config: {e}")))
    }
}
