//! Input validation helpers
//!
//! Pure checks for URLs and local media files. None of these panic or
//! return errors: malformed input is simply an invalid [`Verdict`].

use std::path::{Path, PathBuf};

use url::Url;

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv"];
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

pub const DEFAULT_MAX_VIDEO_MB: f64 = 100.0;
pub const DEFAULT_MAX_IMAGE_MB: f64 = 10.0;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Input is acceptable; `size_mb` is set for file checks
    Valid { size_mb: Option<f64> },
    Invalid(Rejection),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid { .. })
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Valid { .. } => None,
            Verdict::Invalid(rejection) => Some(rejection),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    MalformedUrl(String),
    FileNotFound(PathBuf),
    DisallowedExtension {
        extension: Option<String>,
        allowed: &'static [&'static str],
    },
    TooLarge { size_mb: f64, max_mb: f64 },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::MalformedUrl(reason) => write!(f, "Invalid URL: {}", reason),
            Rejection::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
            Rejection::DisallowedExtension { extension, allowed } => write!(
                f,
                "Invalid file extension '{}'. Allowed: {}",
                extension.as_deref().unwrap_or(""),
                allowed.join(", ")
            ),
            Rejection::TooLarge { size_mb, max_mb } => {
                write!(f, "File too large ({:.1}MB). Max: {}MB", size_mb, max_mb)
            }
        }
    }
}

/// A URL is valid when it parses and has both a scheme and a host.
pub fn validate_url(url: &str) -> Verdict {
    match Url::parse(url.trim()) {
        Ok(parsed) if parsed.host_str().is_some_and(|host| !host.is_empty()) => {
            Verdict::Valid { size_mb: None }
        }
        Ok(_) => Verdict::Invalid(Rejection::MalformedUrl(format!("'{}' has no host", url))),
        Err(e) => Verdict::Invalid(Rejection::MalformedUrl(format!("'{}': {}", url, e))),
    }
}

/// Check that `path` names an existing regular file.
///
/// With `check_exists` false every path is accepted.
pub fn validate_file_path(path: impl AsRef<Path>, check_exists: bool) -> Verdict {
    let path = path.as_ref();
    if !check_exists || path.is_file() {
        Verdict::Valid { size_mb: None }
    } else {
        Verdict::Invalid(Rejection::FileNotFound(path.to_path_buf()))
    }
}

pub fn validate_video_file(path: impl AsRef<Path>, max_size_mb: f64) -> Verdict {
    validate_media_file(path.as_ref(), VIDEO_EXTENSIONS, max_size_mb)
}

pub fn validate_image_file(path: impl AsRef<Path>, max_size_mb: f64) -> Verdict {
    validate_media_file(path.as_ref(), IMAGE_EXTENSIONS, max_size_mb)
}

fn validate_media_file(path: &Path, allowed: &'static [&'static str], max_mb: f64) -> Verdict {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => return Verdict::Invalid(Rejection::FileNotFound(path.to_path_buf())),
    };

    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    if !extension
        .as_deref()
        .is_some_and(|ext| allowed.contains(&ext))
    {
        return Verdict::Invalid(Rejection::DisallowedExtension { extension, allowed });
    }

    let size_mb = metadata.len() as f64 / BYTES_PER_MB;
    if size_mb > max_mb {
        return Verdict::Invalid(Rejection::TooLarge { size_mb, max_mb });
    }

    Verdict::Valid {
        size_mb: Some(size_mb),
    }
}
