//! Ambient background tones.
//!
//! Purely decorative and independent of focus tracking:
//! - Ambient chord of frequency-modulated sine voices
//! - Decaying pulse tone
//! - WAV export

pub mod synth;
pub mod wav;

pub use synth::{AmbientAudioPlayer, ToneMode};
pub use wav::{encode_wav, write_wav};
