//! Config command implementation.

use colored::Colorize;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::FocusError;
use crate::output::to_json;

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the config cannot be read, serialized or written.
pub fn config(
    paths: &Paths,
    config: &Config,
    cmd: ConfigCommands,
    format: OutputFormat,
) -> Result<String, FocusError> {
    match cmd {
        ConfigCommands::Show => match format {
            OutputFormat::Pretty => config.to_yaml(),
            OutputFormat::Json => to_json(config),
        },

        ConfigCommands::Path => match format {
            OutputFormat::Pretty => Ok(paths.config_file.display().to_string()),
            OutputFormat::Json => to_json(&serde_json::json!({
                "config_file": paths.config_file,
                "log_file": paths.log_file,
                "frames": paths.frames,
            })),
        },

        ConfigCommands::Init { force } => init(paths, force, format),
    }
}

fn init(paths: &Paths, force: bool, format: OutputFormat) -> Result<String, FocusError> {
    if paths.config_file.exists() && !force {
        return Err(FocusError::Config(format!(
            "{} already exists. Use --force to overwrite.",
            paths.config_file.display()
        )));
    }

    paths.ensure_dirs()?;
    Config::default().save_to_path(&paths.config_file)?;
    log::info!("Wrote default config to {}", paths.config_file.display());

    match format {
        OutputFormat::Pretty => Ok(format!(
            "{} {}",
            "Wrote".green(),
            paths.config_file.display()
        )),
        OutputFormat::Json => to_json(&serde_json::json!({
            "written": paths.config_file,
        })),
    }
}
