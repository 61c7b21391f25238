//! Image geometry validation.
//!
//! Only the image header is read to learn width and height; pixel data is never
//! decoded, so cost is proportional to header size rather than file size.

use crate::config::ValidationConfig;
use crate::error::DecodeError;
use image::ImageReader;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Why an image was rejected
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidReason {
    /// Header could not be decoded (corrupt or unsupported format)
    DecodeError(String),
    /// Taller than wide
    Portrait {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Smaller than the configured minimum in either dimension
    BelowResolution {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
}

impl InvalidReason {
    /// Short label used in logs and events
    pub fn label(&self) -> &'static str {
        match self {
            InvalidReason::DecodeError(_) => "decode-error",
            InvalidReason::Portrait { .. } => "portrait",
            InvalidReason::BelowResolution { .. } => "below-resolution",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verdict for one image file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Landscape and at least the target resolution
    Valid {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Must be quarantined
    Invalid(InvalidReason),
}

impl Classification {
    /// Whether the image may stay in the accepted directory
    pub fn is_valid(&self) -> bool {
        matches!(self, Classification::Valid { .. })
    }
}

/// Apply the geometry rule to known dimensions
///
/// Priority: portrait first, then resolution.
pub fn classify_dimensions(width: u32, height: u32, rules: &ValidationConfig) -> Classification {
    if height > width {
        Classification::Invalid(InvalidReason::Portrait { width, height })
    } else if width < rules.min_width || height < rules.min_height {
        Classification::Invalid(InvalidReason::BelowResolution { width, height })
    } else {
        Classification::Valid { width, height }
    }
}

/// Read width and height from the image header at `path`
///
/// The format is guessed from the file content, not the extension.
pub fn read_dimensions(path: &Path) -> Result<(u32, u32), DecodeError> {
    let image_error = |reason: String| DecodeError::Image {
        path: path.to_path_buf(),
        reason,
    };
    ImageReader::open(path)
        .map_err(|e| image_error(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| image_error(e.to_string()))?
        .into_dimensions()
        .map_err(|e| image_error(e.to_string()))
}

/// Classify the image file at `path`
///
/// Blocking; callers on the async runtime should wrap it in `spawn_blocking`.
pub fn classify(path: &Path, rules: &ValidationConfig) -> Classification {
    match read_dimensions(path) {
        Ok((width, height)) => {
            debug!(path = %path.display(), width, height, "read image header");
            classify_dimensions(width, height, rules)
        }
        Err(e) => {
            debug!(error = %e, "image header decode failed");
            Classification::Invalid(InvalidReason::DecodeError(e.to_string()))
        }
    }
}
