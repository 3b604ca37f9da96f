//! Instagram platform implementation
//!
//! Uses the Instagram Graph API content publishing flow: create a media
//! container from a public URL, then publish the container. Media must be
//! reachable by Instagram's servers; nothing is uploaded from disk.
//!
//! Video containers are published immediately. If Instagram is still
//! processing the video, the publish call fails and that failure is
//! reported as-is.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{Config, InstagramConfig};
use crate::error::{ConfigError, PlatformError};
use crate::platforms::facebook::GRAPH_API_URL;
use crate::platforms::{finish, http, required_url, Publisher};
use crate::types::{IdKind, ImagePost, Platform, PublishResult, PublishedId, VideoPost};

/// Instagram Business/Creator account publisher
pub struct InstagramPublisher {
    client: Client,
    access_token: SecretString,
    account_id: String,
    graph_url: String,
}

impl InstagramPublisher {
    pub fn new(config: &InstagramConfig) -> Self {
        Self {
            client: http::client(),
            access_token: config.access_token.clone(),
            account_id: config.account_id.clone(),
            graph_url: GRAPH_API_URL.to_string(),
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` when the access token or
    /// account id is not configured.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let instagram = config
            .instagram
            .as_ref()
            .ok_or(ConfigError::MissingCredential(Platform::Instagram))?;
        Ok(Self::new(instagram))
    }

    pub fn with_graph_url(mut self, graph_url: impl Into<String>) -> Self {
        self.graph_url = graph_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, edge: &str) -> String {
        format!("{}/{}/{}", self.graph_url, self.account_id, edge)
    }

    /// Create a media container and return its creation id
    async fn create_container(&self, params: &[(&str, &str)]) -> Result<String, PlatformError> {
        let mut form: Vec<(&str, &str)> = params.to_vec();
        form.push(("access_token", self.access_token.expose_secret()));

        let response = self
            .client
            .post(self.endpoint("media"))
            .form(&form)
            .send()
            .await?;

        let creation_id = parse_container_response(&http::read_json(response).await?)?;
        debug!("Created Instagram media container {}", creation_id);
        Ok(creation_id)
    }

    async fn publish_container(&self, creation_id: &str) -> Result<PublishedId, PlatformError> {
        let response = self
            .client
            .post(self.endpoint("media_publish"))
            .form(&[
                ("creation_id", creation_id),
                ("access_token", self.access_token.expose_secret()),
            ])
            .send()
            .await?;

        parse_publish_response(&http::read_json(response).await?)
    }

    async fn send_image(&self, image_url: &str, caption: &str) -> Result<PublishedId, PlatformError> {
        let creation_id = self
            .create_container(&[("image_url", image_url), ("caption", caption)])
            .await?;
        self.publish_container(&creation_id).await
    }

    async fn send_video(&self, video_url: &str, caption: &str) -> Result<PublishedId, PlatformError> {
        let creation_id = self
            .create_container(&[
                ("media_type", "REELS"),
                ("video_url", video_url),
                ("caption", caption),
            ])
            .await?;
        self.publish_container(&creation_id).await
    }
}

#[async_trait]
impl Publisher for InstagramPublisher {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn post_image(&self, post: &ImagePost) -> PublishResult {
        let outcome = match required_url(post.image_url.as_deref(), "image URL") {
            Ok(image_url) => {
                info!("Posting image to Instagram: {}", image_url);
                self.send_image(image_url, post.caption_or_message()).await
            }
            Err(e) => Err(e),
        };
        finish(Platform::Instagram, "image post", outcome)
    }

    async fn post_video(&self, post: &VideoPost) -> PublishResult {
        let outcome = match required_url(post.video_url.as_deref(), "video URL") {
            Ok(video_url) => {
                info!("Posting video to Instagram: {}", video_url);
                self.send_video(video_url, post.caption_or_message()).await
            }
            Err(e) => Err(e),
        };
        finish(Platform::Instagram, "video post", outcome)
    }
}

/// `POST /{account}/media` answers `{"id": "<container>"}`
pub fn parse_container_response(body: &Value) -> Result<String, PlatformError> {
    http::id_field(body, "/id").ok_or_else(|| PlatformError::Api(body.to_string()))
}

/// `POST /{account}/media_publish` answers `{"id": "<media>"}`
pub fn parse_publish_response(body: &Value) -> Result<PublishedId, PlatformError> {
    http::id_field(body, "/id")
        .map(|id| PublishedId::new(IdKind::Media, id))
        .ok_or_else(|| PlatformError::Api(body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn publisher() -> InstagramPublisher {
        InstagramPublisher::new(&InstagramConfig {
            access_token: SecretString::from("ig-token"),
            account_id: "17841400000000000".to_string(),
        })
        .with_graph_url("http://127.0.0.1:1")
    }

    #[test]
    fn test_parse_container_and_publish() {
        assert_eq!(
            parse_container_response(&json!({"id": "c-1"})).unwrap(),
            "c-1"
        );

        let media = parse_publish_response(&json!({"id": "m-1"})).unwrap();
        assert_eq!(media, PublishedId::new(IdKind::Media, "m-1"));

        assert!(matches!(
            parse_publish_response(&json!({"error": {"code": 9007}})),
            Err(PlatformError::Api(_))
        ));
    }

    #[tokio::test]
    async fn test_text_is_unsupported() {
        let result = publisher().post_text("hello").await;
        assert!(matches!(
            result.error(),
            Some(PlatformError::Unsupported { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_image_url_is_reported() {
        let post = ImagePost {
            message: "caption".to_string(),
            caption: None,
            image_url: None,
        };
        let result = publisher().post_image(&post).await;
        assert_eq!(
            result.error(),
            Some(&PlatformError::InvalidInput("No image URL provided".to_string()))
        );
    }

    #[tokio::test]
    async fn test_malformed_video_url_is_reported_before_network() {
        let post = VideoPost::new("clip").with_url("not a url");
        let result = publisher().post_video(&post).await;
        assert!(matches!(
            result.error(),
            Some(PlatformError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_config_requires_both_fields() {
        let config = Config::from_lookup(|key| match key {
            "INSTAGRAM_ACCESS_TOKEN" => Some("ig-token".to_string()),
            _ => None,
        });
        assert!(InstagramPublisher::from_config(&config).is_err());
    }
}
