//! On-disk cache of the raw feed document.
//!
//! The cache file's modification time is the only freshness signal. A missing
//! file counts as infinitely stale. The file is only ever replaced by a complete
//! 200 response; failed fetches leave the previous content in place.

use crate::error::FetchError;
use crate::utils::{get_ok, is_stale, write_atomically};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Whether `ensure_fresh` had to hit the network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    /// Cache was young enough; no request was made
    Fresh,
    /// Cache was missing or stale and has been re-downloaded
    Refreshed,
}

/// Fetches the feed and keeps a copy on disk
pub struct FeedCache {
    http_client: reqwest::Client,
    url: String,
    path: PathBuf,
    max_age: Duration,
}

impl FeedCache {
    /// Create a cache for `url` stored at `path`
    ///
    /// The client is expected to carry the User-Agent and request timeout.
    pub fn new(
        http_client: reqwest::Client,
        url: impl Into<String>,
        path: impl Into<PathBuf>,
        max_age: Duration,
    ) -> Self {
        Self {
            http_client,
            url: url.into(),
            path: path.into(),
            max_age,
        }
    }

    /// Cache file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the cache file must be re-downloaded before use
    pub async fn needs_refresh(&self) -> bool {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => match meta.modified() {
                Ok(modified) => is_stale(modified, SystemTime::now(), self.max_age),
                Err(_) => true,
            },
            Err(_) => true,
        }
    }

    /// Make sure the cache holds a document younger than the staleness threshold
    ///
    /// # Errors
    /// Returns [`FetchError`] on transport failure, timeout, a non-200 status, or
    /// if the body cannot be written. The previous cache file is left untouched.
    pub async fn ensure_fresh(&self) -> Result<CacheStatus, FetchError> {
        if !self.needs_refresh().await {
            debug!(path = %self.path.display(), "feed cache is fresh");
            return Ok(CacheStatus::Fresh);
        }

        info!(url = %self.url, "downloading feed");
        let response = get_ok(&self.http_client, &self.url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(&self.url, e))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.store_error(source))?;
        }
        write_atomically(&self.path, &body)
            .await
            .map_err(|source| self.store_error(source))?;

        info!(path = %self.path.display(), bytes = body.len(), "feed cache refreshed");
        Ok(CacheStatus::Refreshed)
    }

    /// Read the cached document
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    fn store_error(&self, source: std::io::Error) -> FetchError {
        FetchError::Store {
            url: self.url.clone(),
            path: self.path.clone(),
            source,
        }
    }
}
