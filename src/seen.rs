//! Tracking which wallpapers have already been downloaded.
//!
//! The default index is the filesystem itself: a wallpaper counts as seen when a
//! file of the same name exists in the accepted or the quarantine directory. This
//! survives restarts and heals itself when files are deleted by hand. The
//! [`SeenIndex`] trait leaves room for an indexed store if directory checks ever
//! become too slow.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Answers whether a wallpaper file name was already processed
#[async_trait]
pub trait SeenIndex: Send + Sync {
    /// Whether `file_name` was already downloaded (accepted or quarantined)
    async fn has_seen(&self, file_name: &str) -> bool;

    /// Name of this implementation for logs
    fn name(&self) -> &'static str;
}

/// Seen-index backed by the accepted and quarantine directories
#[derive(Clone, Debug)]
pub struct DirectorySeenIndex {
    accepted_dir: PathBuf,
    invalid_dir: PathBuf,
}

impl DirectorySeenIndex {
    /// Index over the two storage directories
    pub fn new(accepted_dir: impl Into<PathBuf>, invalid_dir: impl Into<PathBuf>) -> Self {
        Self {
            accepted_dir: accepted_dir.into(),
            invalid_dir: invalid_dir.into(),
        }
    }
}

async fn exists(path: &Path) -> bool {
    // An unreadable entry is still an entry; do not download over it.
    tokio::fs::try_exists(path).await.unwrap_or(true)
}

#[async_trait]
impl SeenIndex for DirectorySeenIndex {
    async fn has_seen(&self, file_name: &str) -> bool {
        exists(&self.accepted_dir.join(file_name)).await
            || exists(&self.invalid_dir.join(file_name)).await
    }

    fn name(&self) -> &'static str {
        "directory"
    }
}
