//! Configuration management for focusdot.
//!
//! This module handles loading and saving configuration from `~/.focusdot/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{
    AudioConfig, ColorSetting, Config, DotConfig, DotMotion, GeneralConfig, ServerConfig,
    TrackingConfig,
};
