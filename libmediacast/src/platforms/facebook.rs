//! Facebook platform implementation
//!
//! Posts to a Facebook Page through the Graph API. Text goes to the page
//! feed, images are posted by URL, and videos are uploaded from a local file
//! as multipart form data.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{Config, FacebookConfig};
use crate::error::{ConfigError, PlatformError};
use crate::platforms::{finish, http, open_media_file, required, required_url, Publisher};
use crate::types::{IdKind, ImagePost, Platform, PublishResult, PublishedId, VideoPost};

pub const GRAPH_API_URL: &str = "https://graph.facebook.com/v18.0";

/// Facebook Page publisher
pub struct FacebookPublisher {
    client: Client,
    access_token: SecretString,
    page_id: String,
    graph_url: String,
}

impl FacebookPublisher {
    pub fn new(config: &FacebookConfig) -> Self {
        Self {
            client: http::client(),
            access_token: config.access_token.clone(),
            page_id: config.page_id.clone(),
            graph_url: GRAPH_API_URL.to_string(),
        }
    }

    /// Create a publisher from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` when the page access token or
    /// page id is not configured.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let facebook = config
            .facebook
            .as_ref()
            .ok_or(ConfigError::MissingCredential(Platform::Facebook))?;
        Ok(Self::new(facebook))
    }

    /// Point the publisher at a different Graph API root
    pub fn with_graph_url(mut self, graph_url: impl Into<String>) -> Self {
        self.graph_url = graph_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, edge: &str) -> String {
        format!("{}/{}/{}", self.graph_url, self.page_id, edge)
    }

    async fn send_text(&self, message: &str) -> Result<PublishedId, PlatformError> {
        let response = self
            .client
            .post(self.endpoint("feed"))
            .form(&[
                ("message", message),
                ("access_token", self.access_token.expose_secret()),
            ])
            .send()
            .await?;

        parse_feed_response(&http::read_json(response).await?)
    }

    async fn send_image(&self, message: &str, image_url: &str) -> Result<PublishedId, PlatformError> {
        let response = self
            .client
            .post(self.endpoint("photos"))
            .form(&[
                ("message", message),
                ("url", image_url),
                ("access_token", self.access_token.expose_secret()),
            ])
            .send()
            .await?;

        parse_photo_response(&http::read_json(response).await?)
    }

    async fn send_video(&self, path: &Path, description: &str) -> Result<PublishedId, PlatformError> {
        let (file, len) = open_media_file(path).await?;
        debug!("Streaming {} bytes from {}", len, path.display());

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video.mp4".to_string());

        let form = Form::new()
            .part(
                "source",
                Part::stream_with_length(Body::from(file), len).file_name(file_name),
            )
            .text("description", description.to_string())
            .text("access_token", self.access_token.expose_secret().to_string());

        let response = self
            .client
            .post(self.endpoint("videos"))
            .multipart(form)
            .send()
            .await?;

        parse_video_response(&http::read_json(response).await?)
    }
}

#[async_trait]
impl Publisher for FacebookPublisher {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    async fn post_text(&self, message: &str) -> PublishResult {
        info!(
            "Posting text to Facebook: {}...",
            message.chars().take(50).collect::<String>()
        );
        finish(Platform::Facebook, "post", self.send_text(message).await)
    }

    async fn post_image(&self, post: &ImagePost) -> PublishResult {
        let outcome = match required_url(post.image_url.as_deref(), "image URL") {
            Ok(image_url) => {
                info!("Posting image to Facebook: {}", image_url);
                self.send_image(&post.message, image_url).await
            }
            Err(e) => Err(e),
        };
        finish(Platform::Facebook, "image post", outcome)
    }

    async fn post_video(&self, post: &VideoPost) -> PublishResult {
        let outcome = match required(post.video_path.as_deref(), "video path") {
            Ok(path) => {
                info!("Posting video to Facebook: {}", path.display());
                self.send_video(path, &post.message).await
            }
            Err(e) => Err(e),
        };
        finish(Platform::Facebook, "video upload", outcome)
    }
}

/// `POST /{page}/feed` answers `{"id": "<page>_<post>"}`
pub fn parse_feed_response(body: &Value) -> Result<PublishedId, PlatformError> {
    http::id_field(body, "/id")
        .map(|id| PublishedId::new(IdKind::Post, id))
        .ok_or_else(|| PlatformError::Api(body.to_string()))
}

/// `POST /{page}/photos` answers `{"id": "<photo>", "post_id": "<page>_<post>"}`
///
/// The feed post id is what callers can link to, so it wins when present.
pub fn parse_photo_response(body: &Value) -> Result<PublishedId, PlatformError> {
    let photo_id =
        http::id_field(body, "/id").ok_or_else(|| PlatformError::Api(body.to_string()))?;
    let id = http::id_field(body, "/post_id").unwrap_or(photo_id);
    Ok(PublishedId::new(IdKind::Post, id))
}

/// `POST /{page}/videos` answers `{"id": "<video>"}`
pub fn parse_video_response(body: &Value) -> Result<PublishedId, PlatformError> {
    http::id_field(body, "/id")
        .map(|id| PublishedId::new(IdKind::Video, id))
        .ok_or_else(|| PlatformError::Api(body.to_string()))
}
