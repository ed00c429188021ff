//! Frame sources for gaze input.
//!
//! A camera is a scoped resource. [`GazeSource`] owns a [`FrameSource`] and
//! guarantees it is released when gaze is switched off, when a capture
//! fails, and when the guard is dropped.

use std::path::{Path, PathBuf};

use super::estimator::PixelBuffer;
use crate::error::FocusError;

/// File extensions accepted by [`ImageDirSource`].
const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Something that produces camera frames.
#[cfg_attr(test, mockall::automock)]
pub trait FrameSource {
    /// Human-readable name for logs.
    fn name(&self) -> String;

    /// Acquire the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is missing or access is denied.
    fn open(&mut self) -> Result<(), FocusError>;

    /// Grab the next frame, or `None` if no frame is ready yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the device fails mid-stream.
    fn capture(&mut self) -> Result<Option<PixelBuffer>, FocusError>;

    /// Stop all tracks and free the device.
    fn release(&mut self);
}

/// Owning guard around an open-or-closed [`FrameSource`].
pub struct GazeSource {
    source: Box<dyn FrameSource>,
    open: bool,
}

impl GazeSource {
    /// Wrap a source without opening it.
    #[must_use]
    pub fn new(source: Box<dyn FrameSource>) -> Self {
        Self {
            source,
            open: false,
        }
    }

    /// Acquire the device. A failed open leaves the source released.
    ///
    /// # Errors
    ///
    /// Returns the source's error when it cannot be opened.
    pub fn open(&mut self) -> Result<(), FocusError> {
        if self.open {
            return Ok(());
        }
        match self.source.open() {
            Ok(()) => {
                self.open = true;
                log::info!("Frame source '{}' opened", self.source.name());
                Ok(())
            }
            Err(e) => {
                self.source.release();
                Err(e)
            }
        }
    }

    /// Release the device if it is open.
    pub fn close(&mut self) {
        if self.open {
            self.source.release();
            self.open = false;
            log::info!("Frame source '{}' released", self.source.name());
        }
    }

    /// Whether the device is currently held.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Name of the wrapped source.
    #[must_use]
    pub fn name(&self) -> String {
        self.source.name()
    }

    /// Grab a frame. Closed sources yield `None`; a failing source is
    /// released before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the source's capture error.
    pub fn capture(&mut self) -> Result<Option<PixelBuffer>, FocusError> {
        if !self.open {
            return Ok(None);
        }
        match self.source.capture() {
            Ok(frame) => Ok(frame),
            Err(e) => {
                self.close();
                Err(e)
            }
        }
    }
}

impl Drop for GazeSource {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for GazeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GazeSource")
            .field("source", &self.source.name())
            .field("open", &self.open)
            .finish()
    }
}

/// Replays image files from a directory as if they were camera frames.
///
/// Files are played in name order and loop forever. Useful for recorded
/// webcam captures and for trying the gaze path without a camera.
#[derive(Debug, Clone)]
pub struct ImageDirSource {
    dir: PathBuf,
    frames: Vec<PathBuf>,
    next: usize,
}

impl ImageDirSource {
    /// Create a source over `dir`. Nothing is read until [`FrameSource::open`].
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            frames: Vec::new(),
            next: 0,
        }
    }

    /// Directory being replayed.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn is_frame_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
    }
}

impl FrameSource for ImageDirSource {
    fn name(&self) -> String {
        self.dir.display().to_string()
    }

    fn open(&mut self) -> Result<(), FocusError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            FocusError::FrameSource(format!(
                "Cannot read frame directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let mut frames: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && Self::is_frame_file(path))
            .collect();
        frames.sort();

        if frames.is_empty() {
            return Err(FocusError::FrameSource(format!(
                "No image frames in {}",
                self.dir.display()
            )));
        }

        log::debug!("Loaded {} frame paths from {}", frames.len(), self.dir.display());
        self.frames = frames;
        self.next = 0;
        Ok(())
    }

    fn capture(&mut self) -> Result<Option<PixelBuffer>, FocusError> {
        if self.frames.is_empty() {
            return Ok(None);
        }
        let path = &self.frames[self.next % self.frames.len()];
        self.next = (self.next + 1) % self.frames.len();
        let img = image::open(path)?;
        Ok(Some(PixelBuffer::from(&img)))
    }

    fn release(&mut self) {
        self.frames.clear();
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn named_mock() -> MockFrameSource {
        let mut mock = MockFrameSource::new();
        mock.expect_name().return_const("mock-camera".to_string());
        mock
    }

    #[test]
    fn test_open_and_drop_releases() {
        let mut mock = named_mock();
        mock.expect_open().times(1).returning(|| Ok(()));
        mock.expect_release().times(1).return_const(());

        let mut source = GazeSource::new(Box::new(mock));
        source.open().unwrap();
        assert!(source.is_open());
        drop(source);
    }

    #[test]
    fn test_failed_open_releases_and_stays_closed() {
        let mut mock = named_mock();
        mock.expect_open()
            .times(1)
            .returning(|| Err(FocusError::FrameSource("permission denied".to_string())));
        mock.expect_release().times(1).return_const(());

        let mut source = GazeSource::new(Box::new(mock));
        assert!(source.open().is_err());
        assert!(!source.is_open());
    }

    #[test]
    fn test_capture_error_releases() {
        let mut mock = named_mock();
        mock.expect_open().returning(|| Ok(()));
        mock.expect_capture()
            .times(1)
            .returning(|| Err(FocusError::FrameSource("unplugged".to_string())));
        mock.expect_release().times(1).return_const(());

        let mut source = GazeSource::new(Box::new(mock));
        source.open().unwrap();
        assert!(source.capture().is_err());
        assert!(!source.is_open());
        // Dropping a closed guard must not release again.
        drop(source);
    }

    #[test]
    fn test_closed_source_does_not_capture() {
        let mut mock = named_mock();
        mock.expect_capture().never();
        mock.expect_release().never();

        let mut source = GazeSource::new(Box::new(mock));
        assert!(source.capture().unwrap().is_none());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut mock = named_mock();
        mock.expect_open().returning(|| Ok(()));
        mock.expect_release().times(1).return_const(());

        let mut source = GazeSource::new(Box::new(mock));
        source.open().unwrap();
        source.close();
        source.close();
    }

    #[test]
    fn test_image_dir_missing() {
        let mut source = ImageDirSource::new("/definitely/not/a/frame/dir");
        assert!(matches!(source.open(), Err(FocusError::FrameSource(_))));
    }

    #[test]
    fn test_image_dir_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();
        let mut source = ImageDirSource::new(dir.path());
        assert!(source.open().is_err());
    }

    #[test]
    fn test_image_dir_cycles_frames() {
        let dir = TempDir::new().unwrap();
        image::RgbImage::from_pixel(4, 4, image::Rgb([10, 10, 10]))
            .save(dir.path().join("a.png"))
            .unwrap();
        image::RgbImage::from_pixel(6, 6, image::Rgb([20, 20, 20]))
            .save(dir.path().join("b.png"))
            .unwrap();

        let mut source = ImageDirSource::new(dir.path());
        source.open().unwrap();
        let widths: Vec<u32> = (0..3)
            .map(|_| source.capture().unwrap().unwrap().width())
            .collect();
        assert_eq!(widths, vec![4, 6, 4]);

        source.release();
        assert!(source.capture().unwrap().is_none());
    }

    #[test]
    fn test_frame_extension_filter() {
        assert!(ImageDirSource::is_frame_file(Path::new("f.PNG")));
        assert!(ImageDirSource::is_frame_file(Path::new("f.jpeg")));
        assert!(!ImageDirSource::is_frame_file(Path::new("f.gif")));
        assert!(!ImageDirSource::is_frame_file(Path::new("frame")));
    }
}
