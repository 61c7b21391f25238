//! Shared helpers for unit tests: fixture images, feed documents and configs.

use crate::config::Config;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

/// Encode a black JPEG of the given size
pub(crate) fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .unwrap();
    bytes
}

/// Build a listing document linking to each URL in order
pub(crate) fn listing_json(urls: &[String]) -> String {
    let children: Vec<serde_json::Value> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            serde_json::json!({
                "kind": "t3",
                "data": {
                    "id": format!("post{i}"),
                    "name": format!("t3_post{i}"),
                    "permalink": format!("/r/EarthPorn/comments/post{i}/"),
                    "ups": 100 + i,
                    "downs": 0,
                    "author": "tester",
                    "title": format!("Landscape {i} [3840x2160]"),
                    "score": 100 + i,
                    "url": url,
                    "domain": "i.redd.it",
                    "over_18": false,
                    "subreddit": "EarthPorn",
                    "is_self": false,
                    "num_comments": 3,
                    "thumbnail": "default"
                }
            })
        })
        .collect();
    serde_json::json!({
        "kind": "Listing",
        "data": { "dist": urls.len(), "children": children }
    })
    .to_string()
}

/// Config pointing every path into `root` and the feed at `feed_url`
pub(crate) fn test_config(root: &Path, feed_url: &str) -> Config {
    let mut config = Config::default();
    config.feed.url = feed_url.to_string();
    config.feed.user_agent = "earth-wallpapers-tests/0.1".to_string();
    config.feed.cache_path = root.join("cache").join("cache.json");
    config.feed.request_timeout = Duration::from_secs(5);
    config.storage.wallpaper_dir = root.join("EarthWallpapers");
    config.schedule.interval = Duration::from_millis(50);
    config
}
