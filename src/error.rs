//! Error types for focusdot.

use thiserror::Error;

/// Errors that can occur while running focusdot.
#[derive(Error, Debug)]
pub enum FocusError {
    /// Configuration could not be loaded, parsed, or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The terminal could not be set up, drawn to, or read from.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// The gaze frame source could not be opened or read.
    #[error("Frame source error: {0}")]
    FrameSource(String),

    /// An image file could not be decoded into a frame.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The static page server failed to bind or serve.
    #[error("Server error: {0}")]
    Server(String),

    /// Tone synthesis or export failed.
    #[error("Audio error: {0}")]
    Audio(String),

    /// A command-line argument was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
