//! Darkest-region gaze heuristic.
//!
//! This is not eye detection. It assumes a frontal face filling a webcam
//! frame, looks for the darkest pixel in the area where eyes usually sit, and
//! calls that the pupil. Expect noisy, approximate positions; it must never
//! be used as a biometric signal.

use serde::{Deserialize, Serialize};

/// Pixel step in both axes while scanning.
pub const SCAN_STRIDE: usize = 2;

/// An 8-bit interleaved RGB or RGBA frame, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl PixelBuffer {
    /// Wrap raw bytes. Size mismatches are tolerated here and make the frame
    /// degenerate rather than failing.
    #[must_use]
    pub const fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    /// Wrap packed RGB bytes.
    #[must_use]
    pub const fn from_rgb(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self::new(data, width, height, 3)
    }

    /// Wrap packed RGBA bytes. Alpha is ignored.
    #[must_use]
    pub const fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self::new(data, width, height, 4)
    }

    /// A solid RGB frame.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let data = rgb.iter().copied().cycle().take(pixels * 3).collect();
        Self::from_rgb(data, width, height)
    }

    /// Frame width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// True when the frame cannot be scanned.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width == 0
            || self.height == 0
            || !matches!(self.channels, 3 | 4)
            || self.data.len() < self.width as usize * self.height as usize * self.channels as usize
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * self.channels as usize)
    }

    /// RGB at a pixel, or `None` outside the frame.
    #[must_use]
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let idx = self.offset(x, y)?;
        let px = self.data.get(idx..idx + 3)?;
        Some([px[0], px[1], px[2]])
    }

    /// Overwrite a pixel. Out-of-range writes are ignored.
    pub fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if let Some(idx) = self.offset(x, y) {
            if let Some(px) = self.data.get_mut(idx..idx + 3) {
                px.copy_from_slice(&rgb);
            }
        }
    }
}

impl From<image::RgbImage> for PixelBuffer {
    fn from(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::from_rgb(img.into_raw(), width, height)
    }
}

impl From<&image::DynamicImage> for PixelBuffer {
    fn from(img: &image::DynamicImage) -> Self {
        img.to_rgb8().into()
    }
}

/// Screen area gaze estimates are mapped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Maps camera frames to approximate screen positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeEstimator {
    viewport: Viewport,
}

impl GazeEstimator {
    /// Create an estimator for a viewport.
    #[must_use]
    pub const fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    /// Replace the viewport, e.g. after a resize.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Current viewport.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Estimated gaze position in viewport coordinates.
    ///
    /// `None` means the frame was unusable, not that the user looked away.
    #[must_use]
    pub fn estimate(&self, frame: &PixelBuffer) -> Option<(f64, f64)> {
        let (px, py) = locate_darkest(frame)?;
        let x = f64::from(px) / f64::from(frame.width()) * self.viewport.width;
        let y = f64::from(py) / f64::from(frame.height()) * self.viewport.height;
        Some((x, y))
    }
}

/// Frame coordinates of the darkest sampled pixel in the eye search circle.
///
/// The circle has radius `min(w, h) / 4` around `(w / 2, h / 3)` and is
/// sampled every [`SCAN_STRIDE`] pixels. Brightness is the plain mean of
/// R, G and B. The first minimum in row-major order wins.
#[must_use]
pub fn locate_darkest(frame: &PixelBuffer) -> Option<(u32, u32)> {
    if frame.is_degenerate() {
        return None;
    }

    let width = i64::from(frame.width());
    let height = i64::from(frame.height());
    let cx = width / 2;
    let cy = height / 3;
    let radius = width.min(height) / 4;
    let radius_sq = radius * radius;

    // Comparing channel sums orders pixels exactly like comparing means.
    let mut best: Option<(u16, u32, u32)> = None;

    for y in (cy - radius..=cy + radius).step_by(SCAN_STRIDE) {
        let Ok(py) = u32::try_from(y) else { continue };
        for x in (cx - radius..=cx + radius).step_by(SCAN_STRIDE) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy > radius_sq {
                continue;
            }
            let Ok(px) = u32::try_from(x) else { continue };
            let Some([r, g, b]) = frame.rgb_at(px, py) else {
                continue;
            };
            let sum = u16::from(r) + u16::from(g) + u16::from(b);
            if best.map_or(true, |(min, _, _)| sum < min) {
                best = Some((sum, px, py));
            }
        }
    }

    best.map(|(_, x, y)| (x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1920.0, 1080.0)
    }

    #[test]
    fn test_single_dark_pixel_is_found() {
        // 100x90: center (50, 30), radius 22, scan starts at (28, 8).
        let mut frame = PixelBuffer::filled(100, 90, [200, 200, 200]);
        frame.set_rgb(50, 30, [0, 0, 0]);

        let estimator = GazeEstimator::new(viewport());
        let (x, y) = estimator.estimate(&frame).unwrap();
        assert!((x - 50.0 / 100.0 * 1920.0).abs() < 1e-9);
        assert!((y - 30.0 / 90.0 * 1080.0).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let mut frame = PixelBuffer::filled(100, 90, [180, 170, 160]);
        frame.set_rgb(40, 20, [10, 20, 30]);
        let estimator = GazeEstimator::new(viewport());

        let first = estimator.estimate(&frame);
        for _ in 0..5 {
            assert_eq!(estimator.estimate(&frame), first);
        }
        assert_eq!(locate_darkest(&frame), Some((40, 20)));
    }

    #[test]
    fn test_dark_pixel_outside_circle_is_ignored() {
        let mut frame = PixelBuffer::filled(100, 90, [200, 200, 200]);
        frame.set_rgb(0, 89, [0, 0, 0]);
        // Uniform frame inside the circle: first sampled pixel wins.
        let (x, y) = locate_darkest(&frame).unwrap();
        assert_ne!((x, y), (0, 89));
        let (dx, dy) = (i64::from(x) - 50, i64::from(y) - 30);
        assert!(dx * dx + dy * dy <= 22 * 22);
    }

    #[test]
    fn test_off_stride_pixel_is_not_sampled() {
        let mut frame = PixelBuffer::filled(100, 90, [200, 200, 200]);
        frame.set_rgb(51, 31, [0, 0, 0]);
        assert_ne!(locate_darkest(&frame), Some((51, 31)));
    }

    #[test]
    fn test_first_minimum_wins() {
        let mut frame = PixelBuffer::filled(100, 90, [200, 200, 200]);
        frame.set_rgb(50, 30, [5, 5, 5]);
        frame.set_rgb(44, 30, [5, 5, 5]);
        assert_eq!(locate_darkest(&frame), Some((44, 30)));
    }

    #[test]
    fn test_brightness_is_unweighted_mean() {
        let mut frame = PixelBuffer::filled(100, 90, [200, 200, 200]);
        // Same sum, so the earlier pixel stays the minimum.
        frame.set_rgb(44, 30, [0, 0, 90]);
        frame.set_rgb(50, 30, [90, 0, 0]);
        assert_eq!(locate_darkest(&frame), Some((44, 30)));
    }

    #[test]
    fn test_rgba_frame() {
        let mut data = vec![255u8; 100 * 90 * 4];
        let idx = (30 * 100 + 50) * 4;
        data[idx..idx + 3].copy_from_slice(&[0, 0, 0]);
        let frame = PixelBuffer::from_rgba(data, 100, 90);
        assert_eq!(locate_darkest(&frame), Some((50, 30)));
    }

    #[test]
    fn test_degenerate_frames() {
        let estimator = GazeEstimator::new(viewport());
        assert!(estimator.estimate(&PixelBuffer::from_rgb(Vec::new(), 0, 0)).is_none());
        assert!(estimator.estimate(&PixelBuffer::from_rgb(Vec::new(), 10, 10)).is_none());
        assert!(estimator.estimate(&PixelBuffer::new(vec![0; 100], 10, 10, 1)).is_none());
    }

    #[test]
    fn test_tiny_frame_uses_center_pixel() {
        // Radius rounds down to zero, leaving only the center.
        let frame = PixelBuffer::filled(3, 3, [10, 10, 10]);
        assert_eq!(locate_darkest(&frame), Some((1, 1)));
    }

    #[test]
    fn test_from_rgb_image() {
        let mut img = image::RgbImage::from_pixel(100, 90, image::Rgb([220, 220, 220]));
        img.put_pixel(50, 30, image::Rgb([1, 1, 1]));
        let frame = PixelBuffer::from(img);
        assert_eq!(locate_darkest(&frame), Some((50, 30)));
    }

    #[test]
    fn test_set_viewport() {
        let mut estimator = GazeEstimator::new(viewport());
        estimator.set_viewport(Viewport::new(100.0, 90.0));
        let mut frame = PixelBuffer::filled(100, 90, [200, 200, 200]);
        frame.set_rgb(50, 30, [0, 0, 0]);
        let (x, y) = estimator.estimate(&frame).unwrap();
        assert!((x - 50.0).abs() < 1e-9);
        assert!((y - 30.0).abs() < 1e-9);
    }
}
