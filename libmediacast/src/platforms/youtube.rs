//! YouTube platform implementation
//!
//! Uploads a local video through the YouTube Data API v3 resumable upload
//! protocol. Authentication uses a cached OAuth credential: when it carries
//! a refresh token, a fresh access token is obtained from the client
//! secret's token endpoint before every upload.
//!
//! The consent flow that produces the cached credential is interactive and
//! happens outside this crate.

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::{Config, YouTubeConfig};
use crate::error::{ConfigError, PlatformError};
use crate::platforms::{finish, http, open_media_file, required, Publisher};
use crate::types::{IdKind, Platform, Privacy, PublishResult, PublishedId, VideoMetadata, VideoPost};

pub const UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// "People & Blogs"
const DEFAULT_CATEGORY_ID: &str = "22";
const DEFAULT_TITLE: &str = "Video";

/// Google's client secrets file: `{"installed": {...}}` or `{"web": {...}}`
#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<OAuthClient>,
    web: Option<OAuthClient>,
}

#[derive(Debug, Deserialize)]
struct OAuthClient {
    client_id: String,
    client_secret: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Cached authorized-user credential
///
/// Accepts Google's `token` spelling for the access token as well.
#[derive(Debug, Deserialize)]
struct CachedCredentials {
    #[serde(default, alias = "token")]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

pub struct YouTubePublisher {
    client: Client,
    client_id: String,
    client_secret: SecretString,
    token_uri: String,
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
    upload_url: String,
}

impl YouTubePublisher {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::from_files(&config.youtube)
    }

    /// Load the client secrets and cached credential files
    ///
    /// # Errors
    ///
    /// Returns an error if either file is unreadable or malformed, if the
    /// client secrets hold neither an `installed` nor a `web` client, or if
    /// the cached credential holds no token at all.
    pub fn from_files(config: &YouTubeConfig) -> Result<Self, ConfigError> {
        let secrets: ClientSecretsFile =
            serde_json::from_str(&std::fs::read_to_string(&config.client_secrets_file)?)?;
        let oauth = secrets
            .installed
            .or(secrets.web)
            .ok_or_else(|| ConfigError::MissingField("installed or web client".to_string()))?;

        let cached: CachedCredentials =
            serde_json::from_str(&std::fs::read_to_string(&config.credentials_file)?)?;
        let non_empty = |token: Option<String>| token.filter(|t| !t.is_empty()).map(SecretString::from);
        let access_token = non_empty(cached.access_token);
        let refresh_token = non_empty(cached.refresh_token);

        if access_token.is_none() && refresh_token.is_none() {
            return Err(ConfigError::MissingCredential(Platform::YouTube));
        }

        debug!(
            "Loaded YouTube credentials from {}",
            config.credentials_file.display()
        );

        Ok(Self {
            client: http::client(),
            client_id: oauth.client_id,
            client_secret: SecretString::from(oauth.client_secret),
            token_uri: oauth.token_uri,
            access_token,
            refresh_token,
            upload_url: UPLOAD_URL.to_string(),
        })
    }

    pub fn with_upload_url(mut self, upload_url: impl Into<String>) -> Self {
        self.upload_url = upload_url.into();
        self
    }

    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = token_uri.into();
        self
    }

    /// Obtain a bearer token, refreshing when a refresh token is available
    async fn bearer_token(&self) -> Result<String, PlatformError> {
        if let Some(refresh_token) = &self.refresh_token {
            return self.refresh_access_token(refresh_token).await;
        }

        self.access_token
            .as_ref()
            .map(|token| token.expose_secret().to_string())
            .ok_or_else(|| PlatformError::Authentication("No YouTube access token".to_string()))
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &SecretString,
    ) -> Result<String, PlatformError> {
        let response = self
            .client
            .post(&self.token_uri)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret()),
                ("refresh_token", refresh_token.expose_secret()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PlatformError::Authentication(format!(
                "token refresh returned HTTP {}: {}",
                status, body
            )));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|_| PlatformError::Authentication(format!("token refresh: {}", body)))?;
        http::id_field(&value, "/access_token")
            .ok_or_else(|| PlatformError::Authentication(format!("token refresh: {}", body)))
    }

    /// Open a resumable upload session and return its URL
    async fn start_session(
        &self,
        token: &str,
        metadata: &VideoMetadata,
        content_length: u64,
    ) -> Result<String, PlatformError> {
        let response = self
            .client
            .post(&self.upload_url)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .bearer_auth(token)
            .header("X-Upload-Content-Type", "video/*")
            .header("X-Upload-Content-Length", content_length)
            .json(&video_resource(metadata))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(PlatformError::Network(format!("HTTP {}: {}", status, body)));
        }

        let session_url = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        match session_url {
            Some(session_url) => Ok(session_url),
            None => Err(PlatformError::Api(format!(
                "upload session response had no location header: {}",
                response.text().await?
            ))),
        }
    }

    async fn send_upload(
        &self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<PublishedId, PlatformError> {
        let (file, len) = open_media_file(path).await?;
        let token = self.bearer_token().await?;

        let session_url = self.start_session(&token, metadata, len).await?;
        debug!("Opened YouTube upload session for {}", path.display());

        let response = self
            .client
            .put(&session_url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "video/*")
            .header(CONTENT_LENGTH, len)
            .body(file)
            .send()
            .await?;

        parse_upload_response(&http::read_json(response).await?)
    }
}

#[async_trait]
impl Publisher for YouTubePublisher {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn post_video(&self, post: &VideoPost) -> PublishResult {
        let outcome = match required(post.video_path.as_deref(), "video path") {
            Ok(path) => {
                info!("Uploading video to YouTube: {}", path.display());
                self.send_upload(path, &post.metadata).await
            }
            Err(e) => Err(e),
        };
        finish(Platform::YouTube, "upload", outcome)
    }
}

fn video_resource(metadata: &VideoMetadata) -> Value {
    json!({
        "snippet": {
            "title": metadata.title.as_deref().unwrap_or(DEFAULT_TITLE),
            "description": metadata.description.as_deref().unwrap_or(""),
            "tags": metadata.tags,
            "categoryId": DEFAULT_CATEGORY_ID,
        },
        "status": {
            "privacyStatus": metadata.privacy.unwrap_or(Privacy::Private).youtube_status(),
        }
    })
}

/// The final upload request answers with the video resource
pub fn parse_upload_response(body: &Value) -> Result<PublishedId, PlatformError> {
    http::id_field(body, "/id")
        .map(|id| PublishedId::new(IdKind::Video, id))
        .ok_or_else(|| PlatformError::Api(body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_files(dir: &TempDir, secrets: &str, credentials: &str) -> YouTubeConfig {
        let client_secrets_file = dir.path().join("client_secrets.json");
        let credentials_file = dir.path().join("youtube_credentials.json");
        std::fs::write(&client_secrets_file, secrets).unwrap();
        std::fs::write(&credentials_file, credentials).unwrap();
        YouTubeConfig {
            client_secrets_file,
            credentials_file,
        }
    }

    const SECRETS: &str = r#"{"installed": {"client_id": "cid", "client_secret": "csecret"}}"#;

    #[test]
    fn test_from_files_installed_client() {
        let dir = TempDir::new().unwrap();
        let config = write_files(&dir, SECRETS, r#"{"refresh_token": "rt"}"#);

        let publisher = YouTubePublisher::from_files(&config).unwrap();
        assert_eq!(publisher.client_id, "cid");
        assert_eq!(publisher.token_uri, DEFAULT_TOKEN_URI);
        assert!(publisher.refresh_token.is_some());
        assert!(publisher.access_token.is_none());
    }

    #[test]
    fn test_from_files_web_client_and_google_token_field() {
        let dir = TempDir::new().unwrap();
        let config = write_files(
            &dir,
            r#"{"web": {"client_id": "w", "client_secret": "s", "token_uri": "http://localhost/token"}}"#,
            r#"{"token": "ya29.abc", "scopes": ["https://www.googleapis.com/auth/youtube.upload"]}"#,
        );

        let publisher = YouTubePublisher::from_files(&config).unwrap();
        assert_eq!(publisher.token_uri, "http://localhost/token");
        assert_eq!(
            publisher.access_token.as_ref().unwrap().expose_secret(),
            "ya29.abc"
        );
    }

    #[test]
    fn test_from_files_missing_secrets_file() {
        let config = YouTubeConfig {
            client_secrets_file: PathBuf::from("/nonexistent/client_secrets.json"),
            credentials_file: PathBuf::from("/nonexistent/youtube_credentials.json"),
        };
        assert!(matches!(
            YouTubePublisher::from_files(&config),
            Err(ConfigError::ReadError(_))
        ));
    }

    #[test]
    fn test_from_files_without_tokens() {
        let dir = TempDir::new().unwrap();
        let config = write_files(&dir, SECRETS, r#"{"refresh_token": ""}"#);
        assert!(matches!(
            YouTubePublisher::from_files(&config),
            Err(ConfigError::MissingCredential(Platform::YouTube))
        ));
    }

    #[test]
    fn test_from_files_without_client() {
        let dir = TempDir::new().unwrap();
        let config = write_files(&dir, "{}", r#"{"refresh_token": "rt"}"#);
        assert!(matches!(
            YouTubePublisher::from_files(&config),
            Err(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn test_video_resource_defaults() {
        let resource = video_resource(&VideoMetadata::default());
        assert_eq!(resource["snippet"]["title"], "Video");
        assert_eq!(resource["snippet"]["description"], "");
        assert_eq!(resource["snippet"]["categoryId"], "22");
        assert_eq!(resource["status"]["privacyStatus"], "private");
    }

    #[test]
    fn test_video_resource_metadata() {
        let resource = video_resource(&VideoMetadata {
            title: Some("Launch".to_string()),
            description: Some("Our launch video".to_string()),
            tags: vec!["launch".to_string(), "demo".to_string()],
            privacy: Some(Privacy::Unlisted),
        });
        assert_eq!(resource["snippet"]["title"], "Launch");
        assert_eq!(resource["snippet"]["tags"], json!(["launch", "demo"]));
        assert_eq!(resource["status"]["privacyStatus"], "unlisted");
    }

    #[test]
    fn test_parse_upload_response() {
        let id = parse_upload_response(&json!({"kind": "youtube#video", "id": "abc123"})).unwrap();
        assert_eq!(id, PublishedId::new(IdKind::Video, "abc123"));
        assert!(parse_upload_response(&json!({"kind": "youtube#video"})).is_err());
    }

    #[tokio::test]
    async fn test_upload_missing_file_skips_network() {
        let dir = TempDir::new().unwrap();
        let config = write_files(&dir, SECRETS, r#"{"refresh_token": "rt"}"#);
        let publisher = YouTubePublisher::from_files(&config)
            .unwrap()
            .with_token_uri("http://127.0.0.1:1/token");

        let missing = dir.path().join("missing.mp4");
        let result = publisher
            .post_video(&VideoPost::new("clip").with_path(&missing))
            .await;
        assert_eq!(result.error(), Some(&PlatformError::FileNotFound(missing)));
    }
}
