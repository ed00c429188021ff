//! Command implementations for focusdot.
//!
//! Each command returns the text to print; an empty string prints nothing.

mod completions;
mod config;
mod run;
mod serve;
mod tone;

pub use completions::{completion_install_instructions, completions, generate_completions, shell_from_str};
pub use config::config;
pub use run::{run, tui_options};
pub use serve::{serve, server_options};
pub use tone::tone;
