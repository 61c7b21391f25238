//! Feed document model and decoding.
//!
//! The feed is a Reddit listing:
//! `{ kind, data: { dist, children: [ { kind, data: <post> }, ... ] } }`.
//! Decoding is strict: an envelope that does not match yields [`DecodeError`] and
//! no candidates at all, never a partial list.

pub mod cache;

pub use cache::{CacheStatus, FeedCache};

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level listing document
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Listing {
    /// Envelope kind ("Listing")
    pub kind: String,
    /// Listing payload
    pub data: ListingData,
}

/// Listing payload
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListingData {
    /// Number of children the server says it returned
    pub dist: i64,
    /// Wrapped posts
    pub children: Vec<Thing>,
}

/// A wrapped post (`kind` is "t3" for links)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Thing {
    /// Thing kind
    pub kind: String,
    /// Post fields
    pub data: CandidatePost,
}

/// A single post from the feed
///
/// Only `url` drives behaviour; everything else is carried through as payload.
/// Optional fields accept both `null` and absence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidatePost {
    /// Post id
    pub id: String,
    /// Fullname (`t3_<id>`)
    #[serde(default)]
    pub name: String,
    /// Relative link to the comments page
    #[serde(default)]
    pub permalink: String,
    /// Source URL of the linked content
    pub url: String,
    /// Post title
    #[serde(default)]
    pub title: String,
    /// Author name
    #[serde(default)]
    pub author: String,
    /// Domain of `url`
    #[serde(default)]
    pub domain: String,
    /// Subreddit name
    #[serde(default)]
    pub subreddit: String,
    /// Subreddit fullname
    #[serde(default)]
    pub subreddit_id: Option<String>,
    /// Upvotes
    #[serde(default)]
    pub ups: i64,
    /// Downvotes
    #[serde(default)]
    pub downs: i64,
    /// Score
    #[serde(default)]
    pub score: i64,
    /// Comment count
    #[serde(default)]
    pub num_comments: i64,
    /// Gildings
    #[serde(default)]
    pub gilded: i64,
    /// Marked NSFW
    #[serde(default)]
    pub over_18: bool,
    /// Self (text) post
    #[serde(default)]
    pub is_self: bool,
    /// Deleted post
    #[serde(default)]
    pub deleted: bool,
    /// Hidden by the requesting user
    #[serde(default)]
    pub hidden: bool,
    /// Locked thread
    #[serde(default)]
    pub locked: bool,
    /// Stickied thread
    #[serde(default)]
    pub stickied: bool,
    /// Hosted on Reddit's media domain
    #[serde(default)]
    pub is_reddit_media_domain: bool,
    /// Vote of the requesting user
    #[serde(default)]
    pub likes: Option<bool>,
    /// Thumbnail URL or keyword
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Self text (markdown)
    #[serde(default)]
    pub selftext: Option<String>,
    /// Self text (HTML)
    #[serde(default)]
    pub selftext_html: Option<String>,
    /// Author flair CSS class
    #[serde(default)]
    pub author_flair_css_class: Option<String>,
    /// Author flair text
    #[serde(default)]
    pub author_flair_text: Option<String>,
    /// Link flair CSS class
    #[serde(default)]
    pub link_flair_css_class: Option<String>,
    /// Link flair text
    #[serde(default)]
    pub link_flair_text: Option<String>,
    /// Moderator/admin distinction
    #[serde(default)]
    pub distinguished: Option<String>,
}

/// Decode raw feed bytes into candidate posts
///
/// # Errors
/// Returns [`DecodeError::Feed`] if the bytes are not a well-formed listing.
pub fn parse(bytes: &[u8]) -> Result<Vec<CandidatePost>, DecodeError> {
    let listing: Listing = serde_json::from_slice(bytes)?;
    debug!(
        children = listing.data.children.len(),
        dist = listing.data.dist,
        "decoded feed listing"
    );
    Ok(listing
        .data
        .children
        .into_iter()
        .map(|thing| thing.data)
        .collect())
}
