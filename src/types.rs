//! Core types for earth-wallpapers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary used when a run placed nothing new on disk
pub const NO_NEW_POSTS: &str = "no new posts";

/// Outcome of one acquisition run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionResult {
    /// Files downloaded during this run (valid or not)
    pub downloaded: usize,
    /// Downloaded files moved to quarantine
    pub invalid: usize,
    /// Human-readable summary of the counts
    pub summary: String,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
}

impl AcquisitionResult {
    /// Result for a run that produced nothing
    pub fn empty() -> Self {
        Self::from_counts(0, 0)
    }

    /// Build a result, deriving the summary from the counts
    pub fn from_counts(downloaded: usize, invalid: usize) -> Self {
        let summary = if downloaded == 0 {
            NO_NEW_POSTS.to_string()
        } else {
            format!("downloaded {downloaded} new wallpapers ({invalid} invalid)")
        };
        Self {
            downloaded,
            invalid,
            summary,
            finished_at: Utc::now(),
        }
    }

    /// Number of downloads that were kept in the accepted directory
    pub fn accepted(&self) -> usize {
        self.downloaded.saturating_sub(self.invalid)
    }
}

/// What the external rotation command reported
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationOutcome {
    /// Command succeeded
    Changed,
    /// User dismissed the OS prompt; not a failure
    Cancelled,
}

/// Why a candidate URL was not downloaded
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// A file with this name is already in the accepted or quarantine directory
    AlreadySeen,
    /// The URL has no usable final path segment
    NoFileName,
    /// A storage directory could not be created
    StorageUnavailable {
        /// Error text
        error: String,
    },
}

/// Event emitted during acquisition and scheduling
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A run started
    AcquisitionStarted,

    /// The feed cache was re-downloaded
    FeedRefreshed {
        /// Cache file location
        path: PathBuf,
    },

    /// The feed could not be fetched or decoded; the run ends empty
    FeedUnavailable {
        /// Error text
        error: String,
    },

    /// Feed decoded
    FeedParsed {
        /// Children in the listing
        candidates: usize,
        /// Candidates whose URL passed the suffix filter
        eligible: usize,
    },

    /// Candidate skipped without a download
    Skipped {
        /// Source URL
        url: String,
        /// Why it was skipped
        reason: SkipReason,
    },

    /// Download of a candidate failed; other candidates continue
    DownloadFailed {
        /// Source URL
        url: String,
        /// Error text
        error: String,
    },

    /// Candidate downloaded into the accepted directory
    Downloaded {
        /// Source URL
        url: String,
        /// Where the file was written
        path: PathBuf,
    },

    /// Downloaded file passed validation
    Accepted {
        /// File name
        file_name: String,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },

    /// Downloaded file failed validation and was moved to quarantine
    Quarantined {
        /// File name
        file_name: String,
        /// Rejection reason ("portrait", "below-resolution", "decode-error")
        reason: String,
    },

    /// Invalid file could not be moved to quarantine
    QuarantineFailed {
        /// File name
        file_name: String,
        /// Error text
        error: String,
    },

    /// A run finished
    AcquisitionFinished {
        /// Files downloaded
        downloaded: usize,
        /// Files quarantined
        invalid: usize,
    },

    /// The periodic schedule was switched on or off
    ScheduleChanged {
        /// New state
        enabled: bool,
    },

    /// The rotation command failed
    RotationFailed {
        /// Error text
        error: String,
    },
}
