//! Multi-platform publishing orchestration
//!
//! This module dispatches one logical publish request to every platform
//! that can carry it, concurrently, and collects the independent outcomes
//! into an [`AggregateResult`].

use std::collections::BTreeMap;
use std::path::Path;

use futures::future::join_all;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{ConfigError, PlatformError};
use crate::platforms::facebook::FacebookPublisher;
use crate::platforms::instagram::InstagramPublisher;
use crate::platforms::tiktok::TikTokPublisher;
use crate::platforms::youtube::YouTubePublisher;
use crate::platforms::Publisher;
use crate::types::{
    AggregateResult, ImagePost, Platform, Privacy, PublishRequest, PublishResult, VideoMetadata,
    VideoPost,
};

/// Multi-platform poster holding at most one publisher per platform
///
/// A platform whose publisher could not be constructed simply has no slot;
/// fan-out skips it and direct calls report it as not initialized.
#[derive(Default)]
pub struct MultiPlatformPoster {
    publishers: BTreeMap<Platform, Box<dyn Publisher>>,
}

impl MultiPlatformPoster {
    /// Create a poster with no publishers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create publishers for every configured platform
    ///
    /// Construction failures are logged and leave that platform's slot unset;
    /// they never prevent the other platforms from initializing.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libmediacast::{Config, MultiPlatformPoster, PublishRequest};
    ///
    /// # async fn example() {
    /// let config = Config::from_env();
    /// let poster = MultiPlatformPoster::from_config(&config);
    ///
    /// let results = poster.post_to_all(&PublishRequest::text("Hello!")).await;
    /// for result in results.iter() {
    ///     println!("{}: {}", result.platform, result.is_success());
    /// }
    /// # }
    /// ```
    pub fn from_config(config: &Config) -> Self {
        let mut poster = Self::new();

        poster.register(
            Platform::Facebook,
            FacebookPublisher::from_config(config).map(boxed),
        );
        poster.register(
            Platform::Instagram,
            InstagramPublisher::from_config(config).map(boxed),
        );
        poster.register(
            Platform::TikTok,
            TikTokPublisher::from_config(config).map(boxed),
        );

        if config.is_configured(Platform::YouTube) {
            poster.register(
                Platform::YouTube,
                YouTubePublisher::from_config(config).map(boxed),
            );
        } else {
            info!(
                "YouTube not configured: {} not found",
                config.youtube.client_secrets_file.display()
            );
        }

        poster
    }

    fn register(&mut self, platform: Platform, built: Result<Box<dyn Publisher>, ConfigError>) {
        match built {
            Ok(publisher) => {
                info!("✓ {} Publisher initialized successfully", platform);
                self.publishers.insert(platform, publisher);
            }
            Err(ConfigError::MissingCredential(_)) => {
                info!("{} not configured, skipping", platform);
            }
            Err(e) => {
                error!("✗ {} Publisher initialization failed: {}", platform, e);
            }
        }
    }

    /// Install a publisher in its platform's slot, replacing any existing one
    pub fn with_publisher(mut self, publisher: Box<dyn Publisher>) -> Self {
        self.publishers.insert(publisher.platform(), publisher);
        self
    }

    pub fn is_available(&self, platform: Platform) -> bool {
        self.publishers.contains_key(&platform)
    }

    /// Platforms with an initialized publisher, in fixed platform order
    pub fn available_platforms(&self) -> Vec<Platform> {
        self.publishers.keys().copied().collect()
    }

    fn slot(&self, platform: Platform) -> Option<&dyn Publisher> {
        self.publishers.get(&platform).map(|publisher| publisher.as_ref())
    }

    /// Post to Facebook
    ///
    /// A video path takes precedence over an image URL; with neither, the
    /// message is posted as text.
    pub async fn post_to_facebook(
        &self,
        message: &str,
        image_url: Option<&str>,
        video_path: Option<&Path>,
    ) -> PublishResult {
        let Some(publisher) = self.slot(Platform::Facebook) else {
            return not_initialized(Platform::Facebook);
        };

        match (video_path, image_url) {
            (Some(path), _) => {
                publisher
                    .post_video(&VideoPost::new(message).with_path(path))
                    .await
            }
            (None, Some(url)) => publisher.post_image(&ImagePost::new(message, url)).await,
            (None, None) => publisher.post_text(message).await,
        }
    }

    /// Post an image or reel to Instagram
    ///
    /// A video URL takes precedence over an image URL. Instagram has no text
    /// posts, so supplying neither is reported as a failure.
    pub async fn post_to_instagram(
        &self,
        image_url: Option<&str>,
        video_url: Option<&str>,
        caption: &str,
    ) -> PublishResult {
        let Some(publisher) = self.slot(Platform::Instagram) else {
            return not_initialized(Platform::Instagram);
        };

        match (video_url, image_url) {
            (Some(url), _) => {
                publisher
                    .post_video(&VideoPost::new(caption).with_url(url))
                    .await
            }
            (None, Some(url)) => publisher.post_image(&ImagePost::new(caption, url)).await,
            (None, None) => {
                warn!("No media URL provided for Instagram post");
                PublishResult::failure(
                    Platform::Instagram,
                    PlatformError::InvalidInput("No media URL provided".to_string()),
                )
            }
        }
    }

    pub async fn post_to_tiktok(
        &self,
        video_url: &str,
        title: &str,
        privacy: Option<Privacy>,
    ) -> PublishResult {
        let Some(publisher) = self.slot(Platform::TikTok) else {
            return not_initialized(Platform::TikTok);
        };

        let metadata = VideoMetadata {
            title: Some(title.to_string()),
            privacy,
            ..VideoMetadata::default()
        };
        let post = VideoPost::new(title)
            .with_url(video_url)
            .with_metadata(metadata);
        publisher.post_video(&post).await
    }

    pub async fn post_to_youtube(&self, video_path: &Path, metadata: &VideoMetadata) -> PublishResult {
        let Some(publisher) = self.slot(Platform::YouTube) else {
            return not_initialized(Platform::YouTube);
        };

        let post = VideoPost::new(metadata.title.clone().unwrap_or_default())
            .with_path(video_path)
            .with_metadata(metadata.clone());
        publisher.post_video(&post).await
    }

    /// Publish to every initialized platform that supports the content kind
    ///
    /// Text reaches Facebook only; images reach Facebook and Instagram;
    /// videos reach all four platforms. Each platform's outcome is independent
    /// of the others.
    pub async fn post_to_all(&self, request: &PublishRequest) -> AggregateResult {
        self.fan_out(request, None).await
    }

    /// Same as [`post_to_all`](Self::post_to_all), restricted to `platforms`
    pub async fn post_to_selected(
        &self,
        request: &PublishRequest,
        platforms: &[Platform],
    ) -> AggregateResult {
        self.fan_out(request, Some(platforms)).await
    }

    async fn fan_out(&self, request: &PublishRequest, only: Option<&[Platform]>) -> AggregateResult {
        let kind = request.kind();
        let targets: Vec<&dyn Publisher> = Platform::for_kind(kind)
            .filter(|platform| only.map_or(true, |only| only.contains(platform)))
            .filter_map(|platform| self.slot(platform))
            .collect();

        let names: Vec<String> = targets.iter().map(|p| p.platform().to_string()).collect();
        if names.is_empty() {
            info!("Starting {} publication to no platforms", kind);
        } else {
            info!("Starting {} publication to {}", kind, names.join(", "));
        }

        let results: AggregateResult = join_all(
            targets
                .into_iter()
                .map(|publisher| dispatch(publisher, request)),
        )
        .await
        .into_iter()
        .collect();

        log_summary(&results);
        results
    }
}

fn boxed<P: Publisher + 'static>(publisher: P) -> Box<dyn Publisher> {
    Box::new(publisher)
}

fn not_initialized(platform: Platform) -> PublishResult {
    error!("{} publisher not initialized", platform);
    PublishResult::failure(platform, PlatformError::NotInitialized)
}

async fn dispatch(publisher: &dyn Publisher, request: &PublishRequest) -> PublishResult {
    match request {
        PublishRequest::Text(post) => publisher.post_text(&post.message).await,
        PublishRequest::Image(post) => publisher.post_image(post).await,
        PublishRequest::Video(post) => publisher.post_video(post).await,
    }
}

fn log_summary(results: &AggregateResult) {
    info!("{}", "=".repeat(50));
    info!("Publication Summary:");

    if results.is_empty() {
        warn!("No platforms were attempted");
    }

    for result in results.iter() {
        match (result.id(), result.error()) {
            (Some(id), _) => info!("✓ {}: {}: {}", result.platform, id.kind.label(), id.value),
            (None, Some(e)) => warn!("✗ {}: {}", result.platform, e),
            (None, None) => {}
        }
    }

    info!("{}", "=".repeat(50));
}
