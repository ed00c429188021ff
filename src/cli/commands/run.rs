//! Run command: the terminal focus exercise.

use crate::cli::args::{OutputFormat, RunArgs};
use crate::config::{Config, Paths};
use crate::error::FocusError;
use crate::output::format_summary;
use crate::tui::{self, TuiOptions};

/// Merge command-line overrides into the configured settings.
///
/// # Errors
///
/// Returns `FocusError::InvalidArgument` for a non-positive threshold.
pub fn tui_options(args: RunArgs, config: &Config, paths: &Paths) -> Result<TuiOptions, FocusError> {
    let mut tracking = config.tracking.clone();
    if let Some(threshold) = args.threshold {
        if threshold.is_nan() || threshold <= 0.0 {
            return Err(FocusError::InvalidArgument(format!(
                "--threshold must be positive, got {threshold}"
            )));
        }
        tracking.pointer_threshold_px = threshold;
    }
    if args.hover {
        tracking.require_press = false;
    }

    let mut dot = config.dot.clone();
    if let Some(motion) = args.motion {
        dot.motion = motion;
    }

    // An explicit frame directory means the user wants gaze input.
    let gaze_on_start = args.gaze || args.frames.is_some();
    let frames = args.frames.unwrap_or_else(|| paths.frames.clone());
    let frames = if frames.is_dir() {
        Some(frames)
    } else {
        log::info!("No frame directory at {}; gaze unavailable", frames.display());
        None
    };

    Ok(TuiOptions {
        tracking,
        dot,
        audio: config.audio.clone(),
        frames,
        gaze_on_start,
        music_on_start: args.music,
    })
}

/// Execute the run command and format the end-of-run summary.
///
/// # Errors
///
/// Returns an error if the terminal cannot be driven or the summary
/// cannot be formatted.
pub fn run(
    args: RunArgs,
    config: &Config,
    paths: &Paths,
    format: OutputFormat,
) -> Result<String, FocusError> {
    let options = tui_options(args, config, paths)?;
    let snapshot = tui::run(options)?;
    format_summary(&snapshot, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DotMotion;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_applied() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().to_path_buf());
        let args = RunArgs {
            threshold: Some(80.0),
            motion: Some(DotMotion::Fixed),
            hover: true,
            gaze: true,
            ..RunArgs::default()
        };

        let options = tui_options(args, &Config::default(), &paths).unwrap();
        assert!((options.tracking.pointer_threshold_px - 80.0).abs() < f64::EPSILON);
        assert!(!options.tracking.require_press);
        assert_eq!(options.dot.motion, DotMotion::Fixed);
        assert!(options.gaze_on_start);
    }

    #[test]
    fn test_defaults_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().to_path_buf());

        let options = tui_options(RunArgs::default(), &Config::default(), &paths).unwrap();
        assert!((options.tracking.pointer_threshold_px - 50.0).abs() < f64::EPSILON);
        assert!(options.tracking.require_press);
        assert_eq!(options.dot.motion, DotMotion::Orbit);
        // Default frame directory was never created.
        assert!(options.frames.is_none());
    }

    #[test]
    fn test_existing_frames_dir_used() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().to_path_buf());
        paths.ensure_dirs().unwrap();

        let options = tui_options(RunArgs::default(), &Config::default(), &paths).unwrap();
        assert_eq!(options.frames, Some(paths.frames));
        assert!(!options.gaze_on_start);
    }

    #[test]
    fn test_explicit_frames_enable_gaze() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("home"));
        let args = RunArgs {
            frames: Some(temp_dir.path().to_path_buf()),
            ..RunArgs::default()
        };

        let options = tui_options(args, &Config::default(), &paths).unwrap();
        assert_eq!(options.frames, Some(temp_dir.path().to_path_buf()));
        assert!(options.gaze_on_start);
    }

    #[test]
    fn test_bad_threshold() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().to_path_buf());
        let args = RunArgs {
            threshold: Some(0.0),
            ..RunArgs::default()
        };

        let result = tui_options(args, &Config::default(), &paths);
        assert!(matches!(result, Err(FocusError::InvalidArgument(_))));
    }
}
