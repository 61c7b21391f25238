//! Utility functions for URLs, file placement and HTTP downloads

use crate::error::{FetchError, FilesystemError};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use tokio::io::AsyncWriteExt;

/// Counter that keeps temporary file names unique within the process
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Derive the on-disk file name for a wallpaper from its source URL
///
/// Uses the final path segment of the URL; query and fragment are ignored.
/// Returns `None` for unparseable URLs or URLs ending in `/`.
///
/// # Examples
///
/// ```
/// use earth_wallpapers::utils::file_name_from_url;
///
/// assert_eq!(
///     file_name_from_url("https://i.redd.it/abc123.jpg").as_deref(),
///     Some("abc123.jpg")
/// );
/// assert_eq!(file_name_from_url("https://i.redd.it/"), None);
/// ```
#[must_use]
pub fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
        return None;
    }
    Some(segment.to_string())
}

/// Whether the raw URL ends with one of the allowed suffixes
///
/// This is a literal, case-sensitive suffix test: `c.jpg?x=1` does not match `.jpg`.
#[must_use]
pub fn has_allowed_suffix(url: &str, suffixes: &[String]) -> bool {
    suffixes.iter().any(|suffix| url.ends_with(suffix.as_str()))
}

/// Whether a cache file modified at `modified` must be refreshed at `now`
///
/// Ages strictly greater than `max_age` are stale. A modification time in the
/// future is treated as stale.
#[must_use]
pub fn is_stale(modified: SystemTime, now: SystemTime, max_age: Duration) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age > max_age,
        Err(_) => {
            tracing::warn!("cache modification time is in the future, treating as stale");
            true
        }
    }
}

/// Build a sibling temporary path that no concurrent writer in this process shares
pub(crate) fn temp_sibling(path: &Path) -> std::path::PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());
    path.with_file_name(format!(".{}.{}.{}.part", name, std::process::id(), n))
}

/// Write bytes to `path` through a temporary sibling and a rename
///
/// Readers never observe a half-written file, and a failed write leaves any
/// previous content at `path` untouched.
pub async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = temp_sibling(path);
    let written = match tokio::fs::write(&tmp, bytes).await {
        Ok(()) => tokio::fs::rename(&tmp, path).await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        remove_temp(&tmp).await;
    }
    written
}

/// Best-effort removal of a temporary file left behind by a failed write
async fn remove_temp(tmp: &Path) {
    if let Err(e) = tokio::fs::remove_file(tmp).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %tmp.display(), error = %e, "failed to remove temporary file");
    }
}

/// Issue a GET and return the response if it is 200 OK
pub(crate) async fn get_ok(
    client: &reqwest::Client,
    url: &str,
) -> Result<reqwest::Response, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// Download `url` into `dest`, streaming the body to disk
///
/// The body goes to a temporary sibling that is renamed onto `dest` only after a
/// complete 200 response has been flushed, so `dest` never holds a partial image.
/// A failed transfer removes the temporary file and leaves `dest` untouched, so
/// the name is not mistaken for an already-seen wallpaper on the next run.
///
/// Returns the number of bytes written.
pub async fn download_to_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> crate::error::Result<u64> {
    let mut response = get_ok(client, url).await?;

    let tmp = temp_sibling(dest);
    let write_error = |source| FilesystemError::Write {
        path: dest.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(&tmp).await.map_err(write_error)?;

    let mut written = 0u64;
    let outcome: crate::error::Result<()> = async {
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?
        {
            file.write_all(&chunk).await.map_err(write_error)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(write_error)?;
        drop(file);
        tokio::fs::rename(&tmp, dest).await.map_err(write_error)?;
        Ok(())
    }
    .await;

    if let Err(e) = outcome {
        remove_temp(&tmp).await;
        return Err(e);
    }

    Ok(written)
}
