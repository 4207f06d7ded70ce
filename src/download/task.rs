//! Download tasks and their terminal outcomes.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::filename::sanitize_filename;
use crate::asset::AssetLink;

/// A selected asset paired with its on-disk destination.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    /// The asset to fetch.
    pub link: AssetLink,
    /// Sanitized filename derived from the link's display name.
    pub filename: String,
    /// Destination directory.
    pub directory: PathBuf,
}

impl DownloadTask {
    /// Builds a task for `link`, sanitizing its display name for `directory`.
    #[must_use]
    pub fn new(link: AssetLink, directory: impl Into<PathBuf>) -> Self {
        let filename = sanitize_filename(&link.display_name);
        Self {
            link,
            filename,
            directory: directory.into(),
        }
    }

    /// Builds one task per link, preserving order.
    #[must_use]
    pub fn batch(links: impl IntoIterator<Item = AssetLink>, directory: &Path) -> Vec<Self> {
        links
            .into_iter()
            .map(|link| Self::new(link, directory))
            .collect()
    }

    /// Full path the asset is written to.
    #[must_use]
    pub fn destination(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// Terminal state of a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// The asset was written in full.
    Completed {
        /// Where the file was written.
        path: PathBuf,
        /// Number of bytes written.
        bytes: u64,
    },
    /// The asset could not be fetched or written.
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
}

impl DownloadOutcome {
    /// Returns true for [`DownloadOutcome::Completed`].
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Outcome of one task within a batch, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskReport {
    /// Zero-based position of the task in the submitted batch.
    pub index: usize,
    /// Sanitized filename of the task.
    pub filename: String,
    /// Terminal outcome.
    pub outcome: DownloadOutcome,
}
