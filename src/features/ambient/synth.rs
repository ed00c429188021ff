//! Oscillator tone generator.

use std::f64::consts::TAU;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Base frequencies of the ambient chord: A3, E4, A4.
pub const AMBIENT_FREQUENCIES: [f64; 3] = [220.0, 330.0, 440.0];

/// Per-voice gain of the ambient chord.
const AMBIENT_GAIN: f64 = 0.02;

/// Frequency wobble of each ambient voice, in Hz.
const LFO_DEPTH_HZ: f64 = 2.0;

/// Pulse tone pitch.
pub const PULSE_FREQUENCY: f64 = 220.0;

/// Pulse envelope: starts here and decays exponentially...
const PULSE_START_GAIN: f64 = 0.1;
/// ...to here at the end of each pulse.
const PULSE_END_GAIN: f64 = 0.01;
/// Length of one pulse.
const PULSE_SECONDS: f64 = 2.0;

/// Which sound to generate.
#[derive(ValueEnum, Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToneMode {
    /// Three slowly wobbling sine voices, continuous.
    #[default]
    Ambient,
    /// A single decaying sine note repeated every two seconds.
    Pulse,
}

impl std::fmt::Display for ToneMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ambient => write!(f, "ambient"),
            Self::Pulse => write!(f, "pulse"),
        }
    }
}

#[derive(Debug, Clone)]
struct Voice {
    frequency: f64,
    lfo_frequency: f64,
    gain: f64,
    phase: f64,
    lfo_phase: f64,
}

impl Voice {
    fn ambient(index: usize, frequency: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let lfo_frequency = 0.05f64.mul_add(index as f64, 0.1);
        Self {
            frequency,
            lfo_frequency,
            gain: AMBIENT_GAIN,
            phase: 0.0,
            lfo_phase: 0.0,
        }
    }

    fn next(&mut self, sample_rate: f64) -> f64 {
        let value = self.phase.sin() * self.gain;
        let wobble = self.lfo_phase.sin() * LFO_DEPTH_HZ;
        self.phase = (self.phase + TAU * (self.frequency + wobble) / sample_rate) % TAU;
        self.lfo_phase = (self.lfo_phase + TAU * self.lfo_frequency / sample_rate) % TAU;
        value
    }
}

/// Decorative background tone player.
///
/// Entirely independent of the focus session. Rendering is pull-based: the
/// caller asks for samples and gets silence while the player is stopped.
#[derive(Debug, Clone)]
pub struct AmbientAudioPlayer {
    mode: ToneMode,
    sample_rate: u32,
    volume: f64,
    playing: bool,
    voices: Vec<Voice>,
    position: u64,
}

impl AmbientAudioPlayer {
    /// Create a stopped player.
    #[must_use]
    pub fn new(mode: ToneMode, sample_rate: u32) -> Self {
        Self {
            mode,
            sample_rate: sample_rate.max(1),
            volume: 1.0,
            playing: false,
            voices: Vec::new(),
            position: 0,
        }
    }

    /// Start playing. No-op if already playing.
    pub fn start(&mut self) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.position = 0;
        self.voices = match self.mode {
            ToneMode::Ambient => AMBIENT_FREQUENCIES
                .iter()
                .enumerate()
                .map(|(i, &f)| Voice::ambient(i, f))
                .collect(),
            ToneMode::Pulse => vec![Voice {
                frequency: PULSE_FREQUENCY,
                lfo_frequency: 0.0,
                gain: 1.0,
                phase: 0.0,
                lfo_phase: 0.0,
            }],
        };
        log::debug!("{} tone started", self.mode);
    }

    /// Stop playing and drop all oscillators. No-op if stopped.
    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.voices.clear();
        log::debug!("{} tone stopped", self.mode);
    }

    /// Flip between playing and stopped. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.stop();
        } else {
            self.start();
        }
        self.playing
    }

    /// Set the output volume from a 0-100 slider value.
    pub fn set_volume(&mut self, percent: u8) {
        self.volume = f64::from(percent.min(100)) / 100.0;
    }

    /// Current volume as a 0-100 value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn volume_percent(&self) -> u8 {
        (self.volume * 100.0).round() as u8
    }

    /// Whether oscillators are running.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current generator.
    #[must_use]
    pub const fn mode(&self) -> ToneMode {
        self.mode
    }

    /// Samples per second.
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Fill `out` with mono samples in `[-1.0, 1.0]`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn render(&mut self, out: &mut [f32]) {
        if !self.playing {
            out.fill(0.0);
            return;
        }
        let rate = f64::from(self.sample_rate);
        for slot in out.iter_mut() {
            let envelope = match self.mode {
                ToneMode::Ambient => 1.0,
                ToneMode::Pulse => pulse_gain(self.position as f64 / rate),
            };
            let mixed: f64 = self.voices.iter_mut().map(|v| v.next(rate)).sum();
            *slot = (mixed * envelope * self.volume).clamp(-1.0, 1.0) as f32;
            self.position += 1;
        }
    }

    /// Render `seconds` of audio into a new buffer.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn render_seconds(&mut self, seconds: f64) -> Vec<f32> {
        let count = (seconds.max(0.0) * f64::from(self.sample_rate)).round() as usize;
        let mut buf = vec![0.0; count];
        self.render(&mut buf);
        buf
    }
}

/// Pulse envelope at `t` seconds since playback started.
fn pulse_gain(t: f64) -> f64 {
    let within = t % PULSE_SECONDS;
    PULSE_START_GAIN * (PULSE_END_GAIN / PULSE_START_GAIN).powf(within / PULSE_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_stopped_player_is_silent() {
        let mut player = AmbientAudioPlayer::new(ToneMode::Ambient, 8000);
        let buf = player.render_seconds(0.5);
        assert_eq!(buf.len(), 4000);
        assert!(buf.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_ambient_level() {
        let mut player = AmbientAudioPlayer::new(ToneMode::Ambient, 8000);
        player.start();
        let buf = player.render_seconds(1.0);
        let p = peak(&buf);
        // Three voices at 0.02 each.
        assert!(p > 0.01);
        assert!(p <= 0.06 + 1e-6);
    }

    #[test]
    fn test_start_stop_idempotent() {
        let mut player = AmbientAudioPlayer::new(ToneMode::Ambient, 8000);
        player.start();
        player.start();
        assert!(player.is_playing());
        player.stop();
        player.stop();
        assert!(!player.is_playing());
        assert!(player.toggle());
        assert!(!player.toggle());
    }

    #[test]
    fn test_volume_scales_output() {
        let mut loud = AmbientAudioPlayer::new(ToneMode::Ambient, 8000);
        let mut quiet = AmbientAudioPlayer::new(ToneMode::Ambient, 8000);
        quiet.set_volume(50);
        loud.start();
        quiet.start();
        let a = loud.render_seconds(0.25);
        let b = quiet.render_seconds(0.25);
        for (x, y) in a.iter().zip(&b) {
            assert!((x * 0.5 - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_volume_clamped() {
        let mut player = AmbientAudioPlayer::new(ToneMode::Pulse, 8000);
        player.set_volume(250);
        assert_eq!(player.volume_percent(), 100);
        player.set_volume(0);
        player.start();
        assert!(player.render_seconds(0.1).iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_pulse_envelope() {
        assert!((pulse_gain(0.0) - 0.1).abs() < 1e-12);
        assert!((pulse_gain(1.0) - 0.1 * 0.1f64.sqrt()).abs() < 1e-12);
        assert!(pulse_gain(1.999) > 0.01);
        // Restarts every two seconds.
        assert!((pulse_gain(2.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_pulse_decays_within_cycle() {
        let mut player = AmbientAudioPlayer::new(ToneMode::Pulse, 8000);
        player.start();
        let buf = player.render_seconds(4.0);
        let early = peak(&buf[..800]);
        let late = peak(&buf[14_400..16_000]);
        let next_cycle = peak(&buf[16_000..16_800]);
        assert!(early > late * 5.0);
        assert!(next_cycle > late * 5.0);
    }

    #[test]
    fn test_lfo_rates() {
        let voices: Vec<Voice> = AMBIENT_FREQUENCIES
            .iter()
            .enumerate()
            .map(|(i, &f)| Voice::ambient(i, f))
            .collect();
        let rates: Vec<f64> = voices.iter().map(|v| v.lfo_frequency).collect();
        assert!((rates[0] - 0.1).abs() < 1e-12);
        assert!((rates[1] - 0.15).abs() < 1e-12);
        assert!((rates[2] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_tone_mode_display() {
        assert_eq!(ToneMode::Ambient.to_string(), "ambient");
        assert_eq!(ToneMode::Pulse.to_string(), "pulse");
    }
}
