//! Mediacast - publish one piece of content to several social platforms
//!
//! This library translates a uniform publish request into the REST calls of
//! Facebook, Instagram, TikTok and YouTube, and normalizes what comes back
//! into one result shape per platform.

pub mod config;
pub mod error;
pub mod logging;
pub mod platforms;
pub mod poster;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{MediacastError, PlatformError, Result};
pub use poster::MultiPlatformPoster;
pub use types::{
    AggregateResult, ContentKind, Platform, Privacy, PublishRequest, PublishResult,
    VideoMetadata,
};
