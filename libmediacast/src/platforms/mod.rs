//! Platform abstraction and implementations
//!
//! Every vendor API sits behind the [`Publisher`] trait. A publisher turns
//! one uniform request into that vendor's HTTP calls and folds whatever comes
//! back into a [`PublishResult`]; it never returns an error for expected
//! failures.
//!
//! # Examples
//!
//! ```no_run
//! use libmediacast::platforms::{facebook::FacebookPublisher, Publisher};
//! use libmediacast::Config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let publisher = FacebookPublisher::from_config(&config)?;
//!
//! let result = publisher.post_text("Hello from Mediacast!").await;
//! match &result.outcome {
//!     Ok(id) => println!("Posted: {}", id.value),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use async_trait::async_trait;
use tracing::{error, info};

use crate::error::PlatformError;
use crate::types::{ContentKind, ImagePost, Platform, PublishResult, PublishedId, VideoPost};

pub mod facebook;
pub(crate) mod http;
pub mod instagram;
pub mod tiktok;
pub mod youtube;

// Mock publisher is available for all builds to support integration tests
pub mod mock;

/// Uniform publishing capability over one vendor API.
///
/// Implementations override only the operations their platform supports;
/// the defaults report [`PlatformError::Unsupported`]. The orchestrator
/// consults [`Platform::supports`] and never calls an unsupported operation.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Which platform this publisher posts to
    fn platform(&self) -> Platform;

    /// Publish a plain text post
    async fn post_text(&self, _message: &str) -> PublishResult {
        unsupported(self.platform(), ContentKind::Text)
    }

    /// Publish an image by reference, with a caption
    async fn post_image(&self, _post: &ImagePost) -> PublishResult {
        unsupported(self.platform(), ContentKind::Image)
    }

    /// Publish a video from a local file or public URL, depending on platform
    async fn post_video(&self, _post: &VideoPost) -> PublishResult {
        unsupported(self.platform(), ContentKind::Video)
    }

    fn supports(&self, kind: ContentKind) -> bool {
        self.platform().supports(kind)
    }
}

fn unsupported(platform: Platform, kind: ContentKind) -> PublishResult {
    PublishResult::failure(platform, PlatformError::Unsupported { platform, kind })
}

/// Fold an adapter outcome into a result, logging it either way.
pub(crate) fn finish(
    platform: Platform,
    action: &str,
    outcome: Result<PublishedId, PlatformError>,
) -> PublishResult {
    match outcome {
        Ok(id) => {
            info!("✓ {} {} succeeded: {}", platform, action, id.value);
            PublishResult {
                platform,
                outcome: Ok(id),
            }
        }
        Err(e) => {
            error!("✗ {} {} failed: {}", platform, action, e);
            PublishResult::failure(platform, e)
        }
    }
}

/// Open a local media file for a streamed upload, returning it with its
/// length in bytes.
///
/// A missing file is reported distinctly so callers can tell it apart from
/// transport failures. No network activity happens before this returns.
pub(crate) async fn open_media_file(path: &Path) -> Result<(tokio::fs::File, u64), PlatformError> {
    let read_error = |e: std::io::Error| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PlatformError::FileNotFound(path.to_path_buf())
        } else {
            PlatformError::FileRead(format!("{}: {}", path.display(), e))
        }
    };

    let file = tokio::fs::File::open(path).await.map_err(read_error)?;
    let metadata = file.metadata().await.map_err(read_error)?;
    if !metadata.is_file() {
        return Err(PlatformError::FileRead(format!(
            "{}: not a regular file",
            path.display()
        )));
    }
    Ok((file, metadata.len()))
}

/// Require an optional request field, naming it in the failure.
pub(crate) fn required<'a, T: ?Sized>(
    value: Option<&'a T>,
    what: &str,
) -> Result<&'a T, PlatformError> {
    value.ok_or_else(|| PlatformError::InvalidInput(format!("No {} provided", what)))
}

/// Require a well-formed public URL.
pub(crate) fn required_url<'a>(value: Option<&'a str>, what: &str) -> Result<&'a str, PlatformError> {
    let url = required(value, what)?;
    match crate::validation::validate_url(url).rejection() {
        None => Ok(url.trim()),
        Some(rejection) => Err(PlatformError::InvalidInput(rejection.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct TextOnly;

    #[async_trait]
    impl Publisher for TextOnly {
        fn platform(&self) -> Platform {
            Platform::TikTok
        }
    }

    #[tokio::test]
    async fn test_default_operations_are_unsupported() {
        let publisher = TextOnly;
        let result = publisher.post_text("hello").await;

        assert_eq!(
            result.error(),
            Some(&PlatformError::Unsupported {
                platform: Platform::TikTok,
                kind: ContentKind::Text,
            })
        );
        assert!(!publisher.supports(ContentKind::Image));
        assert!(publisher.supports(ContentKind::Video));
    }

    #[tokio::test]
    async fn test_open_media_file_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.mp4");

        let err = open_media_file(&path).await.unwrap_err();
        assert_eq!(err, PlatformError::FileNotFound(path));
    }

    #[tokio::test]
    async fn test_open_media_file_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = open_media_file(dir.path()).await.unwrap_err();
        assert!(matches!(err, PlatformError::FileRead(_)));
    }

    #[tokio::test]
    async fn test_open_media_file_reports_length() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, vec![0u8; 4096]).unwrap();

        let (_file, len) = open_media_file(&path).await.unwrap();
        assert_eq!(len, 4096);
    }

    #[test]
    fn test_required_url() {
        assert_eq!(
            required_url(Some("https://example.com/a.jpg"), "image URL").unwrap(),
            "https://example.com/a.jpg"
        );
        assert_eq!(
            required_url(None, "image URL").unwrap_err(),
            PlatformError::InvalidInput("No image URL provided".to_string())
        );
        assert!(matches!(
            required_url(Some("not a url"), "image URL"),
            Err(PlatformError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_required_url_is_trimmed() {
        assert_eq!(
            required_url(Some("  https://example.com/a.jpg\n"), "image URL").unwrap(),
            "https://example.com/a.jpg"
        );
    }
}
