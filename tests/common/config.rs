//! Test configuration helpers: a mock feed server and isolated managers

use super::fixtures::{jpeg_bytes, listing_json};
use earth_wallpapers::{Config, WallpaperManager};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the mock server serves the listing on
pub const FEED_PATH: &str = "/r/earthporn/hot";

/// Mock feed plus image host
pub struct FeedServer {
    /// The wiremock server
    pub server: MockServer,
}

impl FeedServer {
    /// Start an empty server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Full feed URL
    pub fn feed_url(&self) -> String {
        format!("{}{}", self.server.uri(), FEED_PATH)
    }

    /// URL of an image path on this server
    pub fn image_url(&self, file_name: &str) -> String {
        format!("{}/img/{}", self.server.uri(), file_name)
    }

    /// Serve a listing linking to the given URLs
    pub async fn serve_listing(&self, urls: &[String]) {
        Mock::given(method("GET"))
            .and(path(FEED_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_json(urls)))
            .mount(&self.server)
            .await;
    }

    /// Serve a JPEG of the given size under `/img/<file_name>`
    pub async fn serve_jpeg(&self, file_name: &str, width: u32, height: u32) {
        self.serve_bytes(file_name, jpeg_bytes(width, height)).await;
    }

    /// Serve arbitrary bytes under `/img/<file_name>`
    pub async fn serve_bytes(&self, file_name: &str, bytes: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(format!("/img/{file_name}")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
            .mount(&self.server)
            .await;
    }
}

/// Config with every path inside `root`
pub fn test_config(root: &Path, feed_url: &str) -> Config {
    let mut config = Config::default();
    config.feed.url = feed_url.to_string();
    config.feed.user_agent = "earth-wallpapers-e2e/0.1".to_string();
    config.feed.cache_path = root.join("cache").join("cache.json");
    config.feed.request_timeout = Duration::from_secs(5);
    config.storage.wallpaper_dir = root.join("EarthWallpapers");
    config.schedule.interval = Duration::from_millis(100);
    config
}

/// A manager over a fresh temporary directory
///
/// Returns the TempDir so it lives as long as the test.
pub async fn create_test_manager(feed: &FeedServer) -> (WallpaperManager, TempDir) {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(root.path(), &feed.feed_url());
    let manager = WallpaperManager::new(config)
        .await
        .expect("Failed to create manager");
    (manager, root)
}

/// Accepted directory of a manager
pub fn accepted_dir(manager: &WallpaperManager) -> PathBuf {
    manager.config().storage.wallpaper_dir.clone()
}

/// Quarantine directory of a manager
pub fn invalid_dir(manager: &WallpaperManager) -> PathBuf {
    manager.config().storage.invalid_dir()
}
