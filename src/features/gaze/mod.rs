//! Approximate gaze input.
//!
//! Turns camera frames into rough screen positions so the dot can be
//! followed with the eyes instead of the pointer:
//! - Darkest-region pupil heuristic
//! - Scoped frame sources (camera or recorded image directory)

pub mod estimator;
pub mod source;

pub use estimator::{locate_darkest, GazeEstimator, PixelBuffer, Viewport};
pub use source::{FrameSource, GazeSource, ImageDirSource};
