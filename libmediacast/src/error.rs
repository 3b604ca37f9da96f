//! Error types for Mediacast

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{ContentKind, Platform};

pub type Result<T> = std::result::Result<T, MediacastError>;

#[derive(Error, Debug)]
pub enum MediacastError {
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MediacastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MediacastError::InvalidInput(_) => 3,
            MediacastError::Platform(PlatformError::InvalidInput(_)) => 3,
            MediacastError::Platform(PlatformError::Authentication(_)) => 2,
            MediacastError::Platform(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("{0} credentials are missing in configuration")]
    MissingCredential(Platform),
}

/// Failure reasons carried inside a [`crate::types::PublishResult`].
///
/// These are data, not faults: adapters and the orchestrator return them
/// instead of propagating them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Publisher not initialized")]
    NotInitialized,

    #[error("{platform} does not support {kind} posts")]
    Unsupported {
        platform: Platform,
        kind: ContentKind,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read file: {0}")]
    FileRead(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL so query-string tokens never reach logs.
        PlatformError::Network(err.without_url().to_string())
    }
}
