//! Output formatting for focusdot.
//!
//! This module provides formatters for session summaries and command
//! results in pretty and JSON form.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::FocusError;
use crate::features::focus::SessionSnapshot;

pub use json::*;
pub use pretty::*;

/// Format an end-of-run session summary.
///
/// # Errors
///
/// Returns `FocusError::Parse` if JSON serialization fails.
pub fn format_summary(snapshot: &SessionSnapshot, format: OutputFormat) -> Result<String, FocusError> {
    match format {
        OutputFormat::Pretty => Ok(format_summary_pretty(snapshot)),
        OutputFormat::Json => format_summary_json(snapshot),
    }
}
