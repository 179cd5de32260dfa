//! # Raw Audio Blob Store
//!
//! Persists inbound request bodies under generated names and hands paths
//! to the container framer. Names are `audio_{uuid}.raw` / `audio_{uuid}.wav`,
//! so concurrent requests never touch the same file.

use crate::error::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Filesystem home for audio artifacts.
///
/// `.raw` files in the directory are transient (deleted after framing);
/// `.wav` files are retained and not cleaned up by this service.
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
}

impl AudioStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the audio artifacts.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the audio directory if it does not exist (idempotent).
    pub fn ensure_dir(&self) -> AppResult<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| AppError::Io(format!("Failed to create {}: {}", self.dir.display(), e)))
    }

    /// Write the full byte stream to a freshly named `.raw` file.
    ///
    /// A zero-length body is accepted; it yields an empty blob and later a
    /// zero-frame WAV.
    pub fn save_raw(&self, content: &[u8]) -> AppResult<PathBuf> {
        self.ensure_dir()?;

        let raw_name = format!("audio_{}.raw", Uuid::new_v4());
        let raw_path = self.dir.join(&raw_name);

        debug!("Saving RAW file to: {}", raw_path.display());
        fs::write(&raw_path, content)
            .map_err(|e| AppError::Io(format!("Failed to write {}: {}", raw_path.display(), e)))?;
        debug!("RAW file saved. Size: {} bytes", content.len());

        Ok(raw_path)
    }

    /// Generate a destination for the framed container.
    ///
    /// Returns the bare file name (reported to the caller on success) and
    /// the full path the framer writes to.
    pub fn wav_destination(&self) -> (String, PathBuf) {
        let wav_name = format!("audio_{}.wav", Uuid::new_v4());
        let wav_path = self.dir.join(&wav_name);
        (wav_name, wav_path)
    }

    /// Delete a raw blob once it has been successfully framed.
    pub fn delete_raw(&self, raw_path: &Path) -> AppResult<()> {
        fs::remove_file(raw_path)
            .map_err(|e| AppError::Io(format!("Failed to delete {}: {}", raw_path.display(), e)))?;
        debug!("RAW file deleted: {}", raw_path.display());
        Ok(())
    }
}
