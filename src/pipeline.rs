//! The acquisition pipeline.
//!
//! One run goes: feed cache → decode → suffix filter → seen check → download →
//! header validation → placement. Feed-level failures end the run with an empty
//! result; per-item failures are logged, broadcast as [`Event`]s and skipped so one
//! bad wallpaper never aborts the batch.
//!
//! Runs may overlap (user-triggered and scheduled). There is no lock: the cache is
//! replaced atomically and the seen check makes overlapping runs converge. At
//! worst two runs download the same new file and the later write wins with
//! identical content.

use crate::config::{Config, FeedConfig, ValidationConfig};
use crate::error::{Error, FilesystemError, Result};
use crate::feed::{self, CandidatePost, FeedCache};
use crate::seen::{DirectorySeenIndex, SeenIndex};
use crate::types::{AcquisitionResult, Event, SkipReason};
use crate::utils::{download_to_file, file_name_from_url, has_allowed_suffix};
use crate::validator::{self, Classification};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Build the HTTP client shared by feed and image requests
///
/// Every request carries the configured User-Agent and a bounded timeout so a
/// stalled endpoint cannot wedge a scheduled run.
pub fn build_http_client(feed: &FeedConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(feed.request_timeout)
        .user_agent(feed.user_agent.clone())
        .build()
        .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))
}

/// Keep the candidate URLs that look like images, in feed order
pub fn filter_candidates(posts: &[CandidatePost], suffixes: &[String]) -> Vec<String> {
    posts
        .iter()
        .filter(|post| has_allowed_suffix(&post.url, suffixes))
        .map(|post| post.url.clone())
        .collect()
}

/// What happened to one candidate URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemOutcome {
    Skipped,
    DownloadFailed,
    Accepted,
    Quarantined,
    QuarantineFailed,
}

/// Downloads new wallpapers from the feed into the accepted directory
pub struct AcquisitionPipeline {
    http_client: reqwest::Client,
    cache: FeedCache,
    seen: Arc<dyn SeenIndex>,
    accepted_dir: PathBuf,
    invalid_dir: PathBuf,
    validation: ValidationConfig,
    event_tx: broadcast::Sender<Event>,
}

impl AcquisitionPipeline {
    /// Create a pipeline from configuration
    ///
    /// Uses a [`DirectorySeenIndex`] over the accepted and quarantine directories.
    pub fn new(
        config: &Config,
        http_client: reqwest::Client,
        event_tx: broadcast::Sender<Event>,
    ) -> Self {
        let accepted_dir = config.storage.wallpaper_dir.clone();
        let invalid_dir = config.storage.invalid_dir();
        let cache = FeedCache::new(
            http_client.clone(),
            config.feed.url.clone(),
            config.feed.cache_path.clone(),
            config.feed.cache_max_age,
        );
        let seen = Arc::new(DirectorySeenIndex::new(&accepted_dir, &invalid_dir));

        Self {
            http_client,
            cache,
            seen,
            accepted_dir,
            invalid_dir,
            validation: config.validation.clone(),
            event_tx,
        }
    }

    /// Replace the seen-index
    pub fn with_seen_index(mut self, seen: Arc<dyn SeenIndex>) -> Self {
        self.seen = seen;
        self
    }

    /// Accepted directory
    pub fn accepted_dir(&self) -> &Path {
        &self.accepted_dir
    }

    /// Quarantine directory
    pub fn invalid_dir(&self) -> &Path {
        &self.invalid_dir
    }

    /// Run the pipeline once
    ///
    /// Never fails: anything that goes wrong shows up in the logs, in the event
    /// stream, and as lower counts in the result.
    pub async fn run(&self) -> AcquisitionResult {
        self.emit(Event::AcquisitionStarted);
        info!("get posts");

        let Some(posts) = self.load_candidates().await else {
            info!("no new posts");
            return self.finish(0, 0);
        };

        let urls = filter_candidates(&posts, &self.validation.allowed_suffixes);
        info!(candidates = posts.len(), eligible = urls.len(), "filtered feed");
        self.emit(Event::FeedParsed {
            candidates: posts.len(),
            eligible: urls.len(),
        });

        if urls.is_empty() {
            info!("no new posts");
            return self.finish(0, 0);
        }

        if let Err(e) = self.prepare_storage().await {
            error!(error = %e, "storage unavailable, skipping all downloads");
            for url in urls {
                self.emit(Event::Skipped {
                    url,
                    reason: SkipReason::StorageUnavailable {
                        error: e.to_string(),
                    },
                });
            }
            return self.finish(0, 0);
        }

        let mut downloaded = 0;
        let mut invalid = 0;
        for url in &urls {
            match self.process_url(url).await {
                ItemOutcome::Accepted => downloaded += 1,
                ItemOutcome::Quarantined => {
                    downloaded += 1;
                    invalid += 1;
                }
                ItemOutcome::QuarantineFailed => downloaded += 1,
                ItemOutcome::Skipped | ItemOutcome::DownloadFailed => {}
            }
        }

        self.finish(downloaded, invalid)
    }

    /// Refresh the cache if needed and decode it
    ///
    /// `None` means "no data this cycle"; a failed refresh never falls back to
    /// the stale document.
    async fn load_candidates(&self) -> Option<Vec<CandidatePost>> {
        match self.cache.ensure_fresh().await {
            Ok(feed::CacheStatus::Refreshed) => {
                self.emit(Event::FeedRefreshed {
                    path: self.cache.path().to_path_buf(),
                });
            }
            Ok(feed::CacheStatus::Fresh) => {}
            Err(e) => {
                warn!(error = %e, "feed fetch failed");
                self.emit(Event::FeedUnavailable {
                    error: e.to_string(),
                });
                return None;
            }
        }

        debug!(path = %self.cache.path().display(), "reading cache file");
        let bytes = match self.cache.read().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %self.cache.path().display(), error = %e, "failed to read feed cache");
                self.emit(Event::FeedUnavailable {
                    error: e.to_string(),
                });
                return None;
            }
        };

        match feed::parse(&bytes) {
            Ok(posts) => Some(posts),
            Err(e) => {
                warn!(error = %e, "feed decode failed");
                self.emit(Event::FeedUnavailable {
                    error: e.to_string(),
                });
                None
            }
        }
    }

    /// Create the accepted and quarantine directories
    async fn prepare_storage(&self) -> std::result::Result<(), FilesystemError> {
        for dir in [&self.accepted_dir, &self.invalid_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| FilesystemError::CreateDir {
                    path: dir.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    async fn process_url(&self, url: &str) -> ItemOutcome {
        let Some(file_name) = file_name_from_url(url) else {
            warn!(url = %url, "no file name in URL");
            self.emit(Event::Skipped {
                url: url.to_string(),
                reason: SkipReason::NoFileName,
            });
            return ItemOutcome::Skipped;
        };

        if self.seen.has_seen(&file_name).await {
            debug!(url = %url, file = %file_name, index = self.seen.name(), "file exists");
            self.emit(Event::Skipped {
                url: url.to_string(),
                reason: SkipReason::AlreadySeen,
            });
            return ItemOutcome::Skipped;
        }

        let dest = self.accepted_dir.join(&file_name);
        match download_to_file(&self.http_client, url, &dest).await {
            Ok(bytes) => {
                info!(url = %url, path = %dest.display(), bytes, "saved");
                self.emit(Event::Downloaded {
                    url: url.to_string(),
                    path: dest.clone(),
                });
            }
            Err(e) => {
                warn!(url = %url, error = %e, code = e.error_code(), "download failed");
                self.emit(Event::DownloadFailed {
                    url: url.to_string(),
                    error: e.to_string(),
                });
                return ItemOutcome::DownloadFailed;
            }
        }

        match self.classify(&dest).await {
            Classification::Valid { width, height } => {
                info!(file = %file_name, width, height, "wallpaper accepted");
                self.emit(Event::Accepted {
                    file_name,
                    width,
                    height,
                });
                ItemOutcome::Accepted
            }
            Classification::Invalid(reason) => {
                let target = self.invalid_dir.join(&file_name);
                let moved = tokio::fs::rename(&dest, &target).await;
                match moved {
                    Ok(()) => {
                        info!(file = %file_name, reason = %reason, "wallpaper quarantined");
                        self.emit(Event::Quarantined {
                            file_name,
                            reason: reason.label().to_string(),
                        });
                        ItemOutcome::Quarantined
                    }
                    Err(source) => {
                        let e = FilesystemError::Move {
                            from: dest,
                            to: target,
                            source,
                        };
                        error!(file = %file_name, reason = %reason, error = %e, "failed to quarantine");
                        self.emit(Event::QuarantineFailed {
                            file_name,
                            error: e.to_string(),
                        });
                        ItemOutcome::QuarantineFailed
                    }
                }
            }
        }
    }

    async fn classify(&self, path: &Path) -> Classification {
        let path = path.to_path_buf();
        let rules = self.validation.clone();
        tokio::task::spawn_blocking(move || validator::classify(&path, &rules))
            .await
            .unwrap_or_else(|e| {
                Classification::Invalid(validator::InvalidReason::DecodeError(e.to_string()))
            })
    }

    fn finish(&self, downloaded: usize, invalid: usize) -> AcquisitionResult {
        let result = AcquisitionResult::from_counts(downloaded, invalid);
        info!(downloaded, invalid, "{}", result.summary);
        self.emit(Event::AcquisitionFinished {
            downloaded,
            invalid,
        });
        result
    }

    fn emit(&self, event: Event) {
        // No subscribers is fine.
        self.event_tx.send(event).ok();
    }
}
