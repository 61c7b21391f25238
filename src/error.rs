//! Error types for earth-wallpapers
//!
//! This module provides the error taxonomy for the library:
//! - Feed-level errors ([`FetchError`], [`DecodeError`]) which the acquisition pipeline
//!   degrades into an empty result instead of propagating
//! - Per-item filesystem errors ([`FilesystemError`]) which are isolated to one wallpaper
//! - Rotation errors ([`RotationError`]), the only errors surfaced to the user
//!
//! A user dismissing the OS picker is not an error; see
//! [`RotationOutcome::Cancelled`](crate::types::RotationOutcome::Cancelled).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for earth-wallpapers operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for earth-wallpapers
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "storage.wallpaper_dir")
        key: Option<String>,
    },

    /// Feed or image fetch failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Feed document or image header could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Directory creation, file write or move failed
    #[error("filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// External wallpaper rotation failed
    #[error("rotation error: {0}")]
    Rotation(#[from] RotationError),

    /// Operation not supported (missing binary, unsupported platform)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Machine-readable code for structured logs and events
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Fetch(FetchError::Timeout { .. }) => "fetch_timeout",
            Error::Fetch(_) => "fetch_error",
            Error::Decode(_) => "decode_error",
            Error::Filesystem(_) => "filesystem_error",
            Error::Rotation(_) => "rotation_error",
            Error::NotSupported(_) => "not_supported",
            Error::Other(_) => "internal_error",
        }
    }
}

/// Network and transport errors while fetching the feed or an image
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with something other than 200 OK
    #[error("bad status {status} from {url}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code returned by the server
        status: u16,
    },

    /// Request did not complete within the configured timeout
    #[error("timed out fetching {url}")]
    Timeout {
        /// Requested URL
        url: String,
    },

    /// Connection, TLS or body transfer failure
    #[error("transport failure fetching {url}: {source}")]
    Transport {
        /// Requested URL
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// Response body could not be persisted
    #[error("failed to store response from {url} at {}: {source}", path.display())]
    Store {
        /// Requested URL
        url: String,
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Classify a reqwest error for the given URL
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

/// Structural decoding errors
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The feed document is not a well-formed listing
    #[error("malformed feed document: {0}")]
    Feed(#[from] serde_json::Error),

    /// The image header could not be decoded
    #[error("unreadable image header in {}: {reason}", path.display())]
    Image {
        /// Image file path
        path: PathBuf,
        /// Decoder message
        reason: String,
    },
}

/// Filesystem errors while placing wallpapers
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// Directory could not be created
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        /// Directory path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File could not be written
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File could not be moved into quarantine
    #[error("failed to move {} to {}: {source}", from.display(), to.display())]
    Move {
        /// Source path
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// External rotation command failures
#[derive(Debug, Error)]
pub enum RotationError {
    /// Command ran and failed for a reason other than user cancellation
    #[error("{program} failed ({exit}): {output}")]
    Failed {
        /// Program that was invoked
        program: String,
        /// Exit status description
        exit: String,
        /// Combined stdout/stderr with newlines removed
        output: String,
    },

    /// Command could not be spawned
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that was invoked
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Command did not finish in time
    #[error("{program} timed out after {timeout_secs}s")]
    TimedOut {
        /// Program that was invoked
        program: String,
        /// Timeout in seconds
        timeout_secs: u64,
    },
}
