//! Pointer and gaze proximity to the target dot.

use serde::{Deserialize, Serialize};

/// Radius used for mouse and touch input.
pub const POINTER_THRESHOLD_PX: f64 = 50.0;

/// Radius used for gaze estimates, which are much noisier.
pub const GAZE_THRESHOLD_PX: f64 = 100.0;

/// A single input position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// When the input was produced.
    pub source_timestamp_ms: u64,
}

impl Sample {
    /// Create a sample.
    #[must_use]
    pub const fn new(x: f64, y: f64, source_timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            source_timestamp_ms,
        }
    }
}

/// Center of the tracked dot at the moment of a check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRegion {
    /// Horizontal center.
    pub center_x: f64,
    /// Vertical center.
    pub center_y: f64,
}

impl TargetRegion {
    /// Create a target region.
    #[must_use]
    pub const fn new(center_x: f64, center_y: f64) -> Self {
        Self { center_x, center_y }
    }

    /// Euclidean distance from the center to a sample.
    #[must_use]
    pub fn distance_to(&self, sample: &Sample) -> f64 {
        (sample.x - self.center_x).hypot(sample.y - self.center_y)
    }
}

/// Where a sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    /// Mouse or touch.
    Pointer,
    /// Camera-based gaze estimate.
    Gaze,
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pointer => write!(f, "pointer"),
            Self::Gaze => write!(f, "gaze"),
        }
    }
}

/// True iff the sample lies strictly inside `threshold_px` of the target.
#[must_use]
pub fn is_near(sample: &Sample, target: &TargetRegion, threshold_px: f64) -> bool {
    target.distance_to(sample) < threshold_px
}

/// Threshold presets per input source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityDetector {
    pointer_threshold_px: f64,
    gaze_threshold_px: f64,
}

impl ProximityDetector {
    /// Create a detector with custom radii.
    #[must_use]
    pub const fn new(pointer_threshold_px: f64, gaze_threshold_px: f64) -> Self {
        Self {
            pointer_threshold_px,
            gaze_threshold_px,
        }
    }

    /// Radius for a given source.
    #[must_use]
    pub const fn threshold_for(&self, source: InputSource) -> f64 {
        match source {
            InputSource::Pointer => self.pointer_threshold_px,
            InputSource::Gaze => self.gaze_threshold_px,
        }
    }

    /// Check a sample using the preset for its source.
    #[must_use]
    pub fn check(&self, sample: &Sample, target: &TargetRegion, source: InputSource) -> bool {
        is_near(sample, target, self.threshold_for(source))
    }
}

impl Default for ProximityDetector {
    fn default() -> Self {
        Self::new(POINTER_THRESHOLD_PX, GAZE_THRESHOLD_PX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: TargetRegion = TargetRegion::new(100.0, 100.0);

    #[test]
    fn test_exact_threshold_is_not_near() {
        let sample = Sample::new(150.0, 100.0, 0);
        assert!(!is_near(&sample, &TARGET, 50.0));
    }

    #[test]
    fn test_just_inside_threshold_is_near() {
        let sample = Sample::new(150.0 - 1e-9, 100.0, 0);
        assert!(is_near(&sample, &TARGET, 50.0));
    }

    #[test]
    fn test_diagonal_distance() {
        // 3-4-5 triangle scaled by 10.
        let sample = Sample::new(130.0, 140.0, 0);
        assert!((TARGET.distance_to(&sample) - 50.0).abs() < 1e-9);
        assert!(!is_near(&sample, &TARGET, 50.0));
        assert!(is_near(&sample, &TARGET, 50.1));
    }

    #[test]
    fn test_detector_presets() {
        let detector = ProximityDetector::default();
        assert_eq!(detector.threshold_for(InputSource::Pointer), 50.0);
        assert_eq!(detector.threshold_for(InputSource::Gaze), 100.0);

        let sample = Sample::new(175.0, 100.0, 0);
        assert!(!detector.check(&sample, &TARGET, InputSource::Pointer));
        assert!(detector.check(&sample, &TARGET, InputSource::Gaze));
    }

    #[test]
    fn test_input_source_display() {
        assert_eq!(InputSource::Pointer.to_string(), "pointer");
        assert_eq!(InputSource::Gaze.to_string(), "gaze");
    }
}
