//! Mock publisher implementation for testing
//!
//! A configurable publisher that can simulate successes, failures, and
//! delays. It's designed for use in integration tests to verify fan-out
//! logic without credentials or network access.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::error::PlatformError;
use crate::platforms::Publisher;
use crate::types::{ContentKind, IdKind, ImagePost, Platform, PublishResult, VideoPost};

/// Configuration for mock publisher behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Platform slot this mock occupies
    pub platform: Platform,

    /// Error to return from every call; `None` means calls succeed
    pub error: Option<PlatformError>,

    /// Delay before completing operations (simulates network latency)
    pub delay: Duration,

    /// Every operation invoked, in order
    pub calls: Arc<Mutex<Vec<ContentKind>>>,
}

impl MockConfig {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            error: None,
            delay: Duration::from_millis(0),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Mock publisher for testing
///
/// Unlike real publishers it accepts every operation, so tests can observe
/// whether the orchestrator ever routes unsupported content to it.
pub struct MockPublisher {
    config: MockConfig,
}

impl MockPublisher {
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// Create a mock publisher that always succeeds
    pub fn success(platform: Platform) -> Self {
        Self::new(MockConfig::new(platform))
    }

    /// Create a mock publisher that always fails with `error`
    pub fn failure(platform: Platform, error: PlatformError) -> Self {
        Self::new(MockConfig {
            error: Some(error),
            ..MockConfig::new(platform)
        })
    }

    /// Create a mock publisher with a delay
    pub fn with_delay(platform: Platform, delay: Duration) -> Self {
        Self::new(MockConfig {
            delay,
            ..MockConfig::new(platform)
        })
    }

    /// Shared handle to the call log; stays valid after the mock is boxed
    pub fn calls(&self) -> Arc<Mutex<Vec<ContentKind>>> {
        Arc::clone(&self.config.calls)
    }

    pub fn call_count(&self) -> usize {
        self.config.calls.lock().unwrap().len()
    }

    async fn respond(&self, kind: ContentKind) -> PublishResult {
        let sequence = {
            let mut calls = self.config.calls.lock().unwrap();
            calls.push(kind);
            calls.len()
        };

        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }

        match &self.config.error {
            Some(error) => PublishResult::failure(self.config.platform, error.clone()),
            None => {
                let id_kind = match kind {
                    ContentKind::Video => IdKind::Video,
                    ContentKind::Text | ContentKind::Image => IdKind::Post,
                };
                let id = format!("{}:mock-{}", self.config.platform.as_str(), sequence);
                PublishResult::success(self.config.platform, id_kind, id)
            }
        }
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    fn platform(&self) -> Platform {
        self.config.platform
    }

    async fn post_text(&self, _message: &str) -> PublishResult {
        self.respond(ContentKind::Text).await
    }

    async fn post_image(&self, _post: &ImagePost) -> PublishResult {
        self.respond(ContentKind::Image).await
    }

    async fn post_video(&self, _post: &VideoPost) -> PublishResult {
        self.respond(ContentKind::Video).await
    }
}
