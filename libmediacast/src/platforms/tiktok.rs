//! TikTok platform implementation
//!
//! Uses the Content Posting API with `PULL_FROM_URL`: TikTok downloads the
//! video from a public URL. The returned publish id identifies the post
//! while TikTok processes it; completion is not tracked here.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::info;

use crate::config::{Config, TikTokConfig};
use crate::error::{ConfigError, PlatformError};
use crate::platforms::{finish, http, required_url, Publisher};
use crate::types::{IdKind, Platform, Privacy, PublishResult, PublishedId, VideoPost};

pub const TIKTOK_API_URL: &str = "https://open.tiktokapis.com";

const VIDEO_INIT_PATH: &str = "/v2/post/publish/video/init/";

pub struct TikTokPublisher {
    client: Client,
    access_token: SecretString,
    api_url: String,
}

impl TikTokPublisher {
    pub fn new(config: &TikTokConfig) -> Self {
        Self {
            client: http::client(),
            access_token: config.access_token.clone(),
            api_url: TIKTOK_API_URL.to_string(),
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` when no access token is configured.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let tiktok = config
            .tiktok
            .as_ref()
            .ok_or(ConfigError::MissingCredential(Platform::TikTok))?;
        Ok(Self::new(tiktok))
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn send_video(
        &self,
        video_url: &str,
        title: &str,
        privacy: Privacy,
    ) -> Result<PublishedId, PlatformError> {
        let response = self
            .client
            .post(format!("{}{}", self.api_url, VIDEO_INIT_PATH))
            .bearer_auth(self.access_token.expose_secret())
            .json(&init_request(video_url, title, privacy))
            .send()
            .await?;

        parse_init_response(&http::read_json(response).await?)
    }
}

#[async_trait]
impl Publisher for TikTokPublisher {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    async fn post_video(&self, post: &VideoPost) -> PublishResult {
        let privacy = post.metadata.privacy.unwrap_or(Privacy::Public);
        let outcome = match required_url(post.video_url.as_deref(), "video URL") {
            Ok(video_url) => {
                info!("Posting video to TikTok: {}", video_url);
                self.send_video(video_url, post.title_or_message(), privacy)
                    .await
            }
            Err(e) => Err(e),
        };
        finish(Platform::TikTok, "video post", outcome)
    }
}

fn init_request(video_url: &str, title: &str, privacy: Privacy) -> Value {
    json!({
        "post_info": {
            "title": title,
            "privacy_level": privacy.tiktok_level(),
            "disable_duet": false,
            "disable_comment": false,
            "disable_stitch": false,
        },
        "source_info": {
            "source": "PULL_FROM_URL",
            "video_url": video_url,
        }
    })
}

/// Video init answers `{"data": {"publish_id": ...}, "error": {"code": "ok", ...}}`
///
/// Any error code other than `ok` is a failure even if data is present.
pub fn parse_init_response(body: &Value) -> Result<PublishedId, PlatformError> {
    let code = body.pointer("/error/code").and_then(Value::as_str);
    if code.is_some_and(|code| code != "ok") {
        return Err(PlatformError::Api(body.to_string()));
    }

    http::id_field(body, "/data/publish_id")
        .map(|id| PublishedId::new(IdKind::Publish, id))
        .ok_or_else(|| PlatformError::Api(body.to_string()))
}
