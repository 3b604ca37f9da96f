//! Core types for Mediacast

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::PlatformError;

// ============================================================================
// Platforms and content kinds
// ============================================================================

/// A supported publishing destination.
///
/// The declaration order is the fixed dispatch and reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
    TikTok,
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::TikTok,
        Platform::YouTube,
    ];

    /// Lowercase identifier (e.g. "facebook", "tiktok")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::TikTok => "tiktok",
            Self::YouTube => "youtube",
        }
    }

    /// Human-facing name used in logs and messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
            Self::TikTok => "TikTok",
            Self::YouTube => "YouTube",
        }
    }

    /// Static capability table: which content kinds each platform accepts.
    pub fn supports(&self, kind: ContentKind) -> bool {
        match (self, kind) {
            (Self::Facebook, _) => true,
            (Self::Instagram, ContentKind::Image | ContentKind::Video) => true,
            (Self::TikTok, ContentKind::Video) => true,
            (Self::YouTube, ContentKind::Video) => true,
            _ => false,
        }
    }

    /// Platforms a fan-out of `kind` content is dispatched to, in order.
    pub fn for_kind(kind: ContentKind) -> impl Iterator<Item = Platform> {
        Self::ALL.into_iter().filter(move |p| p.supports(kind))
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "facebook" | "fb" => Ok(Self::Facebook),
            "instagram" | "ig" => Ok(Self::Instagram),
            "tiktok" => Ok(Self::TikTok),
            "youtube" | "yt" => Ok(Self::YouTube),
            _ => Err(format!(
                "Invalid platform: '{}'. Valid options: facebook, instagram, tiktok, youtube",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Image,
    Video,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            _ => Err(format!(
                "Invalid content kind: '{}'. Valid options: text, image, video",
                s
            )),
        }
    }
}

// ============================================================================
// Video metadata
// ============================================================================

/// Audience for an uploaded video.
///
/// Each platform has its own vocabulary; the adapters translate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    Unlisted,
    Private,
    Friends,
    Followers,
}

impl Privacy {
    /// YouTube `status.privacyStatus` value
    pub fn youtube_status(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Private | Self::Friends | Self::Followers => "private",
        }
    }

    /// TikTok `post_info.privacy_level` value
    pub fn tiktok_level(&self) -> &'static str {
        match self {
            Self::Public => "PUBLIC_TO_EVERYONE",
            Self::Friends => "MUTUAL_FOLLOW_FRIENDS",
            Self::Followers => "FOLLOWER_OF_CREATOR",
            Self::Unlisted | Self::Private => "SELF_ONLY",
        }
    }
}

impl FromStr for Privacy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" | "public_to_everyone" => Ok(Self::Public),
            "unlisted" => Ok(Self::Unlisted),
            "private" | "self_only" => Ok(Self::Private),
            "friends" | "mutual_follow_friends" => Ok(Self::Friends),
            "followers" | "follower_of_creator" => Ok(Self::Followers),
            _ => Err(format!(
                "Invalid privacy: '{}'. Valid options: public, unlisted, private, friends, followers",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub privacy: Option<Privacy>,
}

// ============================================================================
// Publish requests
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TextPost {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePost {
    pub message: String,
    pub caption: Option<String>,
    /// Public URL of the image; platforms fetch it themselves.
    pub image_url: Option<String>,
}

impl ImagePost {
    pub fn new(message: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            caption: None,
            image_url: Some(image_url.into()),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Caption for platforms that distinguish it from the message
    pub fn caption_or_message(&self) -> &str {
        self.caption.as_deref().unwrap_or(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoPost {
    pub message: String,
    pub caption: Option<String>,
    /// Local file, used by platforms that take a binary upload
    pub video_path: Option<PathBuf>,
    /// Public URL, used by platforms that pull the video themselves
    pub video_url: Option<String>,
    pub metadata: VideoMetadata,
}

impl VideoPost {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            caption: None,
            video_path: None,
            video_url: None,
            metadata: VideoMetadata::default(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.video_path = Some(path.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_metadata(mut self, metadata: VideoMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn caption_or_message(&self) -> &str {
        self.caption.as_deref().unwrap_or(&self.message)
    }

    pub fn title_or_message(&self) -> &str {
        self.metadata.title.as_deref().unwrap_or(&self.message)
    }
}

/// One logical piece of content to publish.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishRequest {
    Text(TextPost),
    Image(ImagePost),
    Video(VideoPost),
}

impl PublishRequest {
    pub fn text(message: impl Into<String>) -> Self {
        Self::Text(TextPost {
            message: message.into(),
        })
    }

    pub fn image(message: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self::Image(ImagePost::new(message, image_url))
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Text(_) => ContentKind::Text,
            Self::Image(_) => ContentKind::Image,
            Self::Video(_) => ContentKind::Video,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Text(post) => &post.message,
            Self::Image(post) => &post.message,
            Self::Video(post) => &post.message,
        }
    }
}

impl From<ImagePost> for PublishRequest {
    fn from(post: ImagePost) -> Self {
        Self::Image(post)
    }
}

impl From<VideoPost> for PublishRequest {
    fn from(post: VideoPost) -> Self {
        Self::Video(post)
    }
}

// ============================================================================
// Publish results
// ============================================================================

/// What a platform-assigned identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Post,
    Video,
    Media,
    Publish,
}

impl IdKind {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Post => "post_id",
            Self::Video => "video_id",
            Self::Media => "media_id",
            Self::Publish => "publish_id",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Post => "Post ID",
            Self::Video => "Video ID",
            Self::Media => "Media ID",
            Self::Publish => "Publish ID",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedId {
    pub kind: IdKind,
    pub value: String,
}

impl PublishedId {
    pub fn new(kind: IdKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Uniform outcome of one adapter call.
///
/// Success carries exactly an identifier, failure exactly an error; the
/// `Result` makes the two mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishResult {
    pub platform: Platform,
    pub outcome: std::result::Result<PublishedId, PlatformError>,
}

impl PublishResult {
    pub fn success(platform: Platform, kind: IdKind, id: impl Into<String>) -> Self {
        Self {
            platform,
            outcome: Ok(PublishedId::new(kind, id)),
        }
    }

    pub fn failure(platform: Platform, error: PlatformError) -> Self {
        Self {
            platform,
            outcome: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn id(&self) -> Option<&PublishedId> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&PlatformError> {
        self.outcome.as_ref().err()
    }
}

impl Serialize for PublishResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("platform", &self.platform)?;
        map.serialize_entry("success", &self.is_success())?;
        match &self.outcome {
            Ok(id) => map.serialize_entry(id.kind.field_name(), &id.value)?,
            Err(error) => map.serialize_entry("error", &error.to_string())?,
        }
        map.end()
    }
}

/// Per-platform results of one fan-out call.
///
/// Holds one entry per platform that was actually attempted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregateResult {
    results: BTreeMap<Platform, PublishResult>,
}

impl AggregateResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, result: PublishResult) {
        self.results.insert(result.platform, result);
    }

    pub fn get(&self, platform: Platform) -> Option<&PublishResult> {
        self.results.get(&platform)
    }

    pub fn contains(&self, platform: Platform) -> bool {
        self.results.contains_key(&platform)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results in platform order
    pub fn iter(&self) -> impl Iterator<Item = &PublishResult> {
        self.results.values()
    }

    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.results.keys().copied()
    }

    /// True when at least one platform was attempted and all succeeded
    pub fn all_succeeded(&self) -> bool {
        !self.results.is_empty() && self.results.values().all(PublishResult::is_success)
    }

    pub fn any_succeeded(&self) -> bool {
        self.results.values().any(PublishResult::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &PublishResult> {
        self.results.values().filter(|r| !r.is_success())
    }
}

impl FromIterator<PublishResult> for AggregateResult {
    fn from_iter<I: IntoIterator<Item = PublishResult>>(iter: I) -> Self {
        let mut aggregate = Self::new();
        for result in iter {
            aggregate.insert(result);
        }
        aggregate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_table() {
        assert!(Platform::Facebook.supports(ContentKind::Text));
        assert!(Platform::Facebook.supports(ContentKind::Image));
        assert!(Platform::Facebook.supports(ContentKind::Video));

        assert!(!Platform::Instagram.supports(ContentKind::Text));
        assert!(Platform::Instagram.supports(ContentKind::Image));
        assert!(Platform::Instagram.supports(ContentKind::Video));

        assert!(!Platform::TikTok.supports(ContentKind::Text));
        assert!(!Platform::TikTok.supports(ContentKind::Image));
        assert!(Platform::TikTok.supports(ContentKind::Video));

        assert!(!Platform::YouTube.supports(ContentKind::Text));
        assert!(!Platform::YouTube.supports(ContentKind::Image));
        assert!(Platform::YouTube.supports(ContentKind::Video));
    }

    #[test]
    fn test_platforms_for_kind_keep_fixed_order() {
        let text: Vec<_> = Platform::for_kind(ContentKind::Text).collect();
        assert_eq!(text, vec![Platform::Facebook]);

        let image: Vec<_> = Platform::for_kind(ContentKind::Image).collect();
        assert_eq!(image, vec![Platform::Facebook, Platform::Instagram]);

        let video: Vec<_> = Platform::for_kind(ContentKind::Video).collect();
        assert_eq!(video, Platform::ALL.to_vec());
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("Facebook".parse::<Platform>().unwrap(), Platform::Facebook);
        assert_eq!("TIKTOK".parse::<Platform>().unwrap(), Platform::TikTok);
        assert_eq!(" youtube ".parse::<Platform>().unwrap(), Platform::YouTube);

        let err = "myspace".parse::<Platform>().unwrap_err();
        assert!(err.contains("Invalid platform: 'myspace'"));
    }

    #[test]
    fn test_privacy_translation() {
        let privacy: Privacy = "unlisted".parse().unwrap();
        assert_eq!(privacy.youtube_status(), "unlisted");
        assert_eq!(privacy.tiktok_level(), "SELF_ONLY");

        let privacy: Privacy = "MUTUAL_FOLLOW_FRIENDS".parse().unwrap();
        assert_eq!(privacy, Privacy::Friends);
        assert_eq!(privacy.youtube_status(), "private");

        assert!("everyone-ish".parse::<Privacy>().is_err());
    }

    #[test]
    fn test_result_invariant() {
        let ok = PublishResult::success(Platform::Facebook, IdKind::Post, "123_456");
        assert!(ok.is_success());
        assert!(ok.id().is_some());
        assert!(ok.error().is_none());

        let failed = PublishResult::failure(Platform::TikTok, PlatformError::NotInitialized);
        assert!(!failed.is_success());
        assert!(failed.id().is_none());
        assert!(failed.error().is_some());
    }

    #[test]
    fn test_result_serialization() {
        let ok = PublishResult::success(Platform::YouTube, IdKind::Video, "dQw4w9WgXcQ");
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"platform": "youtube", "success": true, "video_id": "dQw4w9WgXcQ"})
        );

        let failed = PublishResult::failure(Platform::Instagram, PlatformError::NotInitialized);
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"platform": "instagram", "success": false, "error": "Publisher not initialized"})
        );
    }

    #[test]
    fn test_aggregate_result() {
        let aggregate: AggregateResult = vec![
            PublishResult::failure(
                Platform::YouTube,
                PlatformError::Network("timeout".to_string()),
            ),
            PublishResult::success(Platform::Facebook, IdKind::Post, "1"),
        ]
        .into_iter()
        .collect();

        assert_eq!(aggregate.len(), 2);
        assert!(aggregate.any_succeeded());
        assert!(!aggregate.all_succeeded());
        assert_eq!(
            aggregate.platforms().collect::<Vec<_>>(),
            vec![Platform::Facebook, Platform::YouTube]
        );
        assert_eq!(aggregate.failures().count(), 1);

        let json = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(json["facebook"]["post_id"], "1");
        assert_eq!(json["youtube"]["success"], false);
    }

    #[test]
    fn test_empty_aggregate_is_not_success() {
        let aggregate = AggregateResult::new();
        assert!(!aggregate.all_succeeded());
        assert!(!aggregate.any_succeeded());
    }

    #[test]
    fn test_request_accessors() {
        let request = PublishRequest::image("Hello", "https://example.com/a.jpg");
        assert_eq!(request.kind(), ContentKind::Image);
        assert_eq!(request.message(), "Hello");

        let video = VideoPost::new("Clip").with_metadata(VideoMetadata {
            title: Some("My clip".to_string()),
            ..Default::default()
        });
        assert_eq!(video.title_or_message(), "My clip");
        assert_eq!(video.caption_or_message(), "Clip");
    }
}
