//! Configuration types for earth-wallpapers

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Hot listing of r/EarthPorn, JSON flavour with unescaped URLs
pub const DEFAULT_FEED_URL: &str = "https://api.reddit.com/r/earthporn/hot?raw_json=1";

/// User-Agent sent with every request (the API rejects anonymous agents)
pub const DEFAULT_USER_AGENT: &str = "Golang_Wallpaper_bot/0.0.1";

/// AppleScript passed to `osascript` by the default rotation command.
///
/// It re-reads and re-applies the desktop change interval, which nudges the
/// system rotation rather than picking a specific image.
pub const NEXT_WALLPAPER_SCRIPT: &str = r#"
    tell application "System Events"
        tell current desktop
            set initInterval to get change interval
            set change interval to initInterval
         end tell
    end tell
    "#;

/// Remote feed and local cache settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed endpoint (default: r/EarthPorn hot listing)
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// User-Agent header for feed and image requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Raw feed cache file (default: "<temp dir>/cache.json")
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Maximum cache age before the feed is fetched again (default: 1 hour)
    #[serde(default = "default_cache_max_age", with = "duration_serde")]
    pub cache_max_age: Duration,

    /// Per-request timeout for feed and image downloads (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            user_agent: default_user_agent(),
            cache_path: default_cache_path(),
            cache_max_age: default_cache_max_age(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Where accepted and rejected wallpapers live
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Accepted wallpapers (default: "~/Pictures/EarthWallpapers")
    #[serde(default = "default_wallpaper_dir")]
    pub wallpaper_dir: PathBuf,

    /// Quarantine for rejected downloads (default: "<wallpaper_dir>/invalid")
    #[serde(default)]
    pub invalid_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolved quarantine directory
    pub fn invalid_dir(&self) -> PathBuf {
        self.invalid_dir
            .clone()
            .unwrap_or_else(|| self.wallpaper_dir.join("invalid"))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            wallpaper_dir: default_wallpaper_dir(),
            invalid_dir: None,
        }
    }
}

/// Image eligibility rules
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum accepted width in pixels (default: 1920)
    #[serde(default = "default_min_width")]
    pub min_width: u32,

    /// Minimum accepted height in pixels (default: 1080)
    #[serde(default = "default_min_height")]
    pub min_height: u32,

    /// URL suffixes treated as images (default: [".jpg"])
    ///
    /// Matching is a case-sensitive suffix test on the raw URL, so query strings
    /// defeat it.
    #[serde(default = "default_allowed_suffixes")]
    pub allowed_suffixes: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_width: default_min_width(),
            min_height: default_min_height(),
            allowed_suffixes: default_allowed_suffixes(),
        }
    }
}

/// Periodic acquisition
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Time between unattended runs (default: 1 hour)
    #[serde(default = "default_schedule_interval", with = "duration_serde")]
    pub interval: Duration,

    /// Enable the schedule as soon as the manager is created (default: false)
    #[serde(default)]
    pub enabled_on_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval: default_schedule_interval(),
            enabled_on_start: false,
        }
    }
}

/// External wallpaper rotation command
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Program to run (default: "osascript")
    #[serde(default = "default_rotation_program")]
    pub program: PathBuf,

    /// Arguments (default: ["-e", <next wallpaper script>])
    #[serde(default = "default_rotation_args")]
    pub args: Vec<String>,

    /// Kill the command after this long (default: 30 seconds)
    #[serde(default = "default_rotation_timeout", with = "duration_serde")]
    pub timeout: Duration,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            program: default_rotation_program(),
            args: default_rotation_args(),
            timeout: default_rotation_timeout(),
        }
    }
}

/// Main configuration for WallpaperManager
///
/// Every path the pipeline touches is carried here so tests can point the whole
/// system at temporary directories.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote feed and cache
    #[serde(default)]
    pub feed: FeedConfig,

    /// Accepted and quarantine directories
    #[serde(default)]
    pub storage: StorageConfig,

    /// Geometry and URL rules
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Periodic acquisition
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Rotation command
    #[serde(default)]
    pub rotation: RotationConfig,
}

impl Config {
    /// Check the configuration for values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = url::Url::parse(&self.feed.url) {
            return Err(config_error(
                format!("invalid feed URL '{}': {}", self.feed.url, e),
                "feed.url",
            ));
        }
        if self.feed.user_agent.trim().is_empty() {
            return Err(config_error("user agent must not be empty", "feed.user_agent"));
        }
        if self.feed.request_timeout.is_zero() {
            return Err(config_error(
                "request timeout must be greater than zero",
                "feed.request_timeout",
            ));
        }
        if self.schedule.interval.is_zero() {
            return Err(config_error(
                "schedule interval must be greater than zero",
                "schedule.interval",
            ));
        }
        if self.validation.allowed_suffixes.is_empty() {
            return Err(config_error(
                "at least one image suffix is required",
                "validation.allowed_suffixes",
            ));
        }
        if self.storage.invalid_dir() == self.storage.wallpaper_dir {
            return Err(config_error(
                "quarantine directory must differ from the wallpaper directory",
                "storage.invalid_dir",
            ));
        }
        Ok(())
    }
}

fn config_error(message: impl Into<String>, key: &str) -> Error {
    Error::Config {
        message: message.into(),
        key: Some(key.to_string()),
    }
}

// Default value functions
fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_cache_path() -> PathBuf {
    std::env::temp_dir().join("cache.json")
}

fn default_cache_max_age() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_wallpaper_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("Pictures"))
        .join("EarthWallpapers")
}

fn default_min_width() -> u32 {
    1920
}

fn default_min_height() -> u32 {
    1080
}

fn default_allowed_suffixes() -> Vec<String> {
    vec![".jpg".into()]
}

fn default_schedule_interval() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_rotation_program() -> PathBuf {
    PathBuf::from("osascript")
}

fn default_rotation_args() -> Vec<String> {
    vec!["-e".into(), NEXT_WALLPAPER_SCRIPT.into()]
}

fn default_rotation_timeout() -> Duration {
    Duration::from_secs(30)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
