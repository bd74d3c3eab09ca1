//! Checkpoint store
//!
//! The checkpoint is one line of text, `YYYY-MM-DD` in the Jalali calendar,
//! naming the next day to fetch. Loading falls back to the configured
//! starting date when the file is missing or unreadable (the normal
//! fresh-start path); saving overwrites the file in place. A failed save is
//! reported by the caller but never stops the crawl, so resumability
//! degrades rather than the run aborting.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::jalali::JalaliDate;

/// Checkpoint errors
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    /// Checkpoint file could not be written
    #[error("cannot write checkpoint file {path}: {source}")]
    WriteFailed {
        /// Checkpoint file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Reads and writes the single-date checkpoint file.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    /// Create a store backed by the given file path.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the checkpointed date, falling back to `fallback`.
    ///
    /// A missing, unreadable, or unparseable file is not an error: it means
    /// no prior run completed a day, and the crawl starts from `fallback`.
    pub fn load(&self, fallback: JalaliDate) -> JalaliDate {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match contents.trim().parse::<JalaliDate>() {
                Ok(date) => {
                    debug!(path = %self.path.display(), %date, "checkpoint loaded");
                    date
                }
                Err(e) => {
                    info!(
                        path = %self.path.display(),
                        error = %e,
                        "checkpoint file unparseable; starting from {fallback}"
                    );
                    fallback
                }
            },
            Err(_) => {
                info!(
                    path = %self.path.display(),
                    "checkpoint file does not exist; starting from {fallback}"
                );
                fallback
            }
        }
    }

    /// Overwrite the checkpoint file with the cursor's normalized form.
    ///
    /// Saving the same date twice produces a byte-identical file, and a load
    /// immediately after a save returns the saved date.
    pub fn save(&self, cursor: &JalaliDate) -> Result<(), CheckpointError> {
        std::fs::write(&self.path, cursor.to_string()).map_err(|source| {
            CheckpointError::WriteFailed {
                path: self.path.clone(),
                source,
            }
        })?;
        debug!(path = %self.path.display(), %cursor, "checkpoint saved");
        Ok(())
    }
}
