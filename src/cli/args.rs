use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::DotMotion;
use crate::features::ambient::ToneMode;

#[derive(Parser)]
#[command(name = "focusdot")]
#[command(about = "Follow the dot and measure how well you stay on it")]
#[command(long_about = "focusdot - a focus exercise for the terminal

A dot drifts around the screen. Hold the mouse button and keep the pointer
on it, or turn on gaze tracking and look at it. The timer counts while the
session runs; focus time counts only while you are on the dot.

QUICK START:
  focusdot run                      Start the exercise
  focusdot run --frames ./cam       Use recorded frames for gaze tracking
  focusdot serve                    Host the browser version
  focusdot tone --out calm.wav      Export the ambient tone

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  focusdot <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the focus exercise in the terminal
    ///
    /// Opens a full-screen view with the moving dot, the session timer,
    /// focus time and accuracy. A summary is printed on exit.
    ///
    /// # Keys
    ///
    ///   s        Start the session
    ///   x        Stop the session
    ///   r        Reset
    ///   g        Toggle gaze tracking
    ///   m        Toggle ambient tone
    ///   + / -    Volume up / down
    ///   q, Esc   Quit
    ///
    /// # Examples
    ///
    ///   focusdot run
    ///   focusdot run --hover --motion fixed
    ///   focusdot run --frames ~/.focusdot/frames --gaze
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Serve the browser version of the exercise
    ///
    /// Serves index.html and its assets from a directory, plus a
    /// GET /health endpoint for container platforms.
    ///
    /// # Examples
    ///
    ///   focusdot serve
    ///   focusdot serve --port 8080 --root ./public
    ///   PORT=8080 focusdot serve
    Serve(ServeArgs),

    /// Render the ambient tone to a WAV file
    ///
    /// # Examples
    ///
    ///   focusdot tone --out calm.wav
    ///   focusdot tone --out pulse.wav --mode pulse --seconds 8
    Tone(ToneArgs),

    /// Show or initialize configuration
    ///
    /// # Subcommands
    ///
    ///   show   Print the effective configuration
    ///   path   Print the config file location
    ///   init   Write a default config file
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// Outputs completion script for the specified shell.
    /// Redirect to a file or source directly.
    ///
    /// Example: focusdot completions bash > ~/.bash_completion.d/focusdot
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,

        /// Show installation instructions
        #[arg(long, short = 'i')]
        install: bool,
    },
}

/// Arguments for the run command.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Directory of recorded camera frames used as the gaze source
    ///
    /// PNG, JPEG and BMP files are read in name order and cycled.
    /// Defaults to ~/.focusdot/frames.
    #[arg(long, short = 'f')]
    pub frames: Option<PathBuf>,

    /// Turn gaze tracking on at startup
    #[arg(long, short = 'g')]
    pub gaze: bool,

    /// Pointer near radius in pixels
    #[arg(long, short = 't')]
    pub threshold: Option<f64>,

    /// How the dot moves
    #[arg(long, short = 'm', value_enum)]
    pub motion: Option<DotMotion>,

    /// Count pointer movement without holding a button
    #[arg(long)]
    pub hover: bool,

    /// Start the ambient tone immediately
    #[arg(long)]
    pub music: bool,
}

/// Arguments for the serve command.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, short = 'b')]
    pub bind: Option<String>,

    /// Directory containing index.html
    #[arg(long, short = 'r')]
    pub root: Option<PathBuf>,
}

/// Arguments for the tone command.
#[derive(Args, Debug)]
pub struct ToneArgs {
    /// Output WAV file
    #[arg(long)]
    pub out: PathBuf,

    /// Length of the recording in seconds
    #[arg(long, short = 's', default_value = "10")]
    pub seconds: f64,

    /// Tone generator
    #[arg(long, short = 'm', value_enum)]
    pub mode: Option<ToneMode>,

    /// Volume, 0-100
    #[arg(long, short = 'v', value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_run_defaults() {
        let cli = Cli::try_parse_from(["focusdot", "run"]).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert!(args.frames.is_none());
                assert!(!args.gaze);
                assert!(!args.hover);
                assert!(args.threshold.is_none());
                assert!(args.motion.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_run_alias() {
        let cli = Cli::try_parse_from(["focusdot", "r"]).unwrap();
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_run_with_options() {
        let cli = Cli::try_parse_from([
            "focusdot",
            "run",
            "--frames",
            "/tmp/frames",
            "--gaze",
            "--threshold",
            "75",
            "--motion",
            "fixed",
            "--hover",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.frames, Some(PathBuf::from("/tmp/frames")));
                assert!(args.gaze);
                assert_eq!(args.threshold, Some(75.0));
                assert_eq!(args.motion, Some(DotMotion::Fixed));
                assert!(args.hover);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_serve_port() {
        let cli = Cli::try_parse_from(["focusdot", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.root.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_tone() {
        let cli = Cli::try_parse_from([
            "focusdot", "tone", "--out", "out.wav", "--mode", "pulse", "--seconds", "2.5", "-v", "80",
        ])
        .unwrap();
        match cli.command {
            Commands::Tone(args) => {
                assert_eq!(args.out, PathBuf::from("out.wav"));
                assert_eq!(args.mode, Some(ToneMode::Pulse));
                assert!((args.seconds - 2.5).abs() < f64::EPSILON);
                assert_eq!(args.volume, Some(80));
            }
            _ => panic!("Expected Tone command"),
        }
    }

    #[test]
    fn test_cli_tone_volume_range() {
        let result = Cli::try_parse_from(["focusdot", "tone", "--out", "out.wav", "-v", "101"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_config_init_force() {
        let cli = Cli::try_parse_from(["focusdot", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(args) => {
                assert!(matches!(args.command, ConfigCommands::Init { force: true }));
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_cli_completions() {
        let cli = Cli::try_parse_from(["focusdot", "completions", "zsh", "-i"]).unwrap();
        match cli.command {
            Commands::Completions { shell, install } => {
                assert_eq!(shell, "zsh");
                assert!(install);
            }
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_output_format_default() {
        let cli = Cli::try_parse_from(["focusdot", "run"]).unwrap();
        assert!(matches!(cli.output, OutputFormat::Pretty));
    }

    #[test]
    fn test_cli_output_format_short() {
        let cli = Cli::try_parse_from(["focusdot", "-o", "json", "run"]).unwrap();
        assert!(matches!(cli.output, OutputFormat::Json));
    }

    #[test]
    fn test_cli_output_format_global() {
        let cli = Cli::try_parse_from(["focusdot", "config", "show", "--output", "json"]).unwrap();
        assert!(matches!(cli.output, OutputFormat::Json));
    }
}
