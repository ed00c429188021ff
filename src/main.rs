use std::fs::OpenOptions;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use focusdot::cli::args::{Cli, Commands, OutputFormat};
use focusdot::cli::commands;
use focusdot::config::{ColorSetting, Config, Paths};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = Paths::default();

    if matches!(cli.command, Commands::Run(_)) {
        setup_file_logging(&paths)?;
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_timestamp_secs()
            .target(env_logger::Target::Stderr)
            .init();
    }

    let config = Config::load_from_path(&paths.config_file)?;
    match config.general.color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {}
    }

    // --output left at its default defers to the config file.
    let format = match cli.output {
        OutputFormat::Pretty => config.general.default_output,
        OutputFormat::Json => OutputFormat::Json,
    };

    let output = match cli.command {
        Commands::Run(args) => commands::run(args, &config, &paths, format)?,
        Commands::Serve(args) => commands::serve(args, &config)?,
        Commands::Tone(args) => commands::tone(&args, &config, format)?,
        Commands::Config(args) => commands::config(&paths, &config, args.command, format)?,
        Commands::Completions { shell, install } => commands::completions(&shell, install)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Send logs to `~/.focusdot/focusdot.log` while the TUI owns the terminal.
fn setup_file_logging(paths: &Paths) -> Result<()> {
    paths.ensure_dirs()?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.log_file)
        .with_context(|| format!("Failed to open log file {}", paths.log_file.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    Ok(())
}
