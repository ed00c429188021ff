//! Path resolution for focusdot configuration and data files.
//!
//! All focusdot data is stored in `~/.focusdot/`:
//! - `config.yaml` - Main configuration file
//! - `focusdot.log` - Log output while the terminal UI is running
//! - `frames/` - Default directory for recorded gaze frames

use std::path::PathBuf;

use crate::error::FocusError;

/// Paths to focusdot configuration and data directories.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.focusdot/`
    pub root: PathBuf,
    /// Config file: `~/.focusdot/config.yaml`
    pub config_file: PathBuf,
    /// Log file: `~/.focusdot/focusdot.log`
    pub log_file: PathBuf,
    /// Frames directory: `~/.focusdot/frames/`
    pub frames: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, FocusError> {
        let home = std::env::var("HOME")
            .map_err(|_| FocusError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".focusdot")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            log_file: root.join("focusdot.log"),
            frames: root.join("frames"),
            root,
        }
    }

    /// Ensure all directories exist, creating them if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), FocusError> {
        for dir in [&self.root, &self.frames] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    FocusError::Config(format!(
                        "Failed to create directory {}: {e}",
                        dir.display()
                    ))
                })?;
            }
        }

        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if home cannot be determined
            Self::with_root(PathBuf::from(".focusdot"))
        })
    }
}
