//! Feed documents and image fixtures

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Encode a black JPEG of the given size
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .expect("Failed to encode JPEG fixture");
    bytes
}

/// Bytes that no image decoder accepts
pub const NOT_AN_IMAGE: &[u8] = b"<html><body>removed</body></html>";

/// Build a listing document with one post per URL, in order
pub fn listing_json(urls: &[String]) -> String {
    let children: Vec<serde_json::Value> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            serde_json::json!({
                "kind": "t3",
                "data": {
                    "id": format!("e2e{i}"),
                    "name": format!("t3_e2e{i}"),
                    "permalink": format!("/r/EarthPorn/comments/e2e{i}/"),
                    "title": format!("Somewhere nice [{i}]"),
                    "author": "photographer",
                    "ups": 1000,
                    "score": 1000,
                    "url": url,
                    "domain": "i.redd.it",
                    "over_18": false,
                    "is_self": false
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
