//! focusdot - follow the dot and measure your focus
//!
//! This crate tracks how long a pointer (or an approximate gaze estimate)
//! stays near a moving target dot, and reports focus time and accuracy.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod output;
pub mod server;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::FocusError;
pub use features::focus::{FocusSession, FocusTracker, SessionSnapshot};
