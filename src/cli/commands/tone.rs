//! Tone command: export the ambient tone as WAV.

use colored::Colorize;
use serde_json::json;

use crate::cli::args::{OutputFormat, ToneArgs};
use crate::config::Config;
use crate::error::FocusError;
use crate::features::ambient::{write_wav, AmbientAudioPlayer};
use crate::output::to_json;

/// Longest export accepted.
const MAX_SECONDS: f64 = 600.0;

/// Execute the tone command.
///
/// # Errors
///
/// Returns an error for an out-of-range length or if the file cannot be
/// written.
pub fn tone(args: &ToneArgs, config: &Config, format: OutputFormat) -> Result<String, FocusError> {
    let in_range = args.seconds > 0.0 && args.seconds <= MAX_SECONDS;
    if !in_range {
        return Err(FocusError::InvalidArgument(format!(
            "--seconds must be in (0, {MAX_SECONDS}], got {}",
            args.seconds
        )));
    }

    let mode = args.mode.unwrap_or(config.audio.mode);
    let mut player = AmbientAudioPlayer::new(mode, config.audio.sample_rate);
    player.set_volume(args.volume.unwrap_or(config.audio.volume_percent));
    player.start();
    let samples = player.render_seconds(args.seconds);
    player.stop();

    write_wav(&args.out, &samples, player.sample_rate())?;

    match format {
        OutputFormat::Pretty => Ok(format!(
            "{} {:.1}s {} tone to {}",
            "Wrote".green(),
            args.seconds,
            mode,
            args.out.display()
        )),
        OutputFormat::Json => to_json(&json!({
            "path": args.out,
            "mode": mode,
            "seconds": args.seconds,
            "sample_rate": player.sample_rate(),
            "samples": samples.len(),
            "volume_percent": player.volume_percent(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ambient::ToneMode;
    use tempfile::TempDir;

    #[test]
    fn test_tone_writes_wav() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("pulse.wav");
        let mut config = Config::default();
        config.audio.sample_rate = 8000;
        let args = ToneArgs {
            out: out.clone(),
            seconds: 0.5,
            mode: Some(ToneMode::Pulse),
            volume: Some(100),
        };

        let result = tone(&args, &config, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(value["mode"], "pulse");
        assert_eq!(value["samples"], 4000);

        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(bytes.len(), 44 + 4000 * 2);
    }

    #[test]
    fn test_tone_rejects_bad_length() {
        let temp_dir = TempDir::new().unwrap();
        let args = ToneArgs {
            out: temp_dir.path().join("x.wav"),
            seconds: 0.0,
            mode: None,
            volume: None,
        };
        let result = tone(&args, &Config::default(), OutputFormat::Pretty);
        assert!(matches!(result, Err(FocusError::InvalidArgument(_))));
        assert!(!args.out.exists());
    }
}
