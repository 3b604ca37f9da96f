//! Configuration management for Mediacast
//!
//! Settings come from environment variables, optionally seeded from a `.env`
//! file in the working directory. The resulting [`Config`] is immutable and
//! handed to each publisher at construction.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::logging::LogFormat;
use crate::types::Platform;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FILE: &str = "logs/automation.log";
pub const DEFAULT_TIMEZONE: &str = "Africa/Cairo";
pub const DEFAULT_YOUTUBE_CLIENT_SECRETS_FILE: &str = "client_secrets.json";
pub const DEFAULT_YOUTUBE_CREDENTIALS_FILE: &str = "youtube_credentials.json";

const REQUIRED_CREDENTIALS: [(&str, &str); 5] = [
    ("FACEBOOK_ACCESS_TOKEN", "Facebook Access Token"),
    ("FACEBOOK_PAGE_ID", "Facebook Page ID"),
    ("TIKTOK_ACCESS_TOKEN", "TikTok Access Token"),
    ("INSTAGRAM_ACCESS_TOKEN", "Instagram Access Token"),
    ("INSTAGRAM_ACCOUNT_ID", "Instagram Account ID"),
];

#[derive(Debug, Clone)]
pub struct Config {
    pub facebook: Option<FacebookConfig>,
    pub instagram: Option<InstagramConfig>,
    pub tiktok: Option<TikTokConfig>,
    pub youtube: YouTubeConfig,
    pub logging: LogSettings,
    pub scheduler: SchedulerSettings,
    warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FacebookConfig {
    pub access_token: SecretString,
    pub page_id: String,
}

#[derive(Debug, Clone)]
pub struct InstagramConfig {
    pub access_token: SecretString,
    pub account_id: String,
}

#[derive(Debug, Clone)]
pub struct TikTokConfig {
    pub access_token: SecretString,
}

/// YouTube authenticates through files rather than a bare token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YouTubeConfig {
    pub client_secrets_file: PathBuf,
    pub credentials_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub file: PathBuf,
    pub format: LogFormat,
}

/// Carried for display; posts are never scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub enabled: bool,
    pub timezone: String,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// A `.env` file in the working directory is loaded first when present;
    /// variables already set in the environment take precedence over it.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut warnings: Vec<String> = REQUIRED_CREDENTIALS
            .iter()
            .filter(|(key, _)| get(*key).is_none())
            .map(|(_, label)| format!("{} is missing", label))
            .collect();

        let facebook = match (get("FACEBOOK_ACCESS_TOKEN"), get("FACEBOOK_PAGE_ID")) {
            (Some(token), Some(page_id)) => Some(FacebookConfig {
                access_token: SecretString::from(token),
                page_id,
            }),
            _ => None,
        };

        let instagram = match (get("INSTAGRAM_ACCESS_TOKEN"), get("INSTAGRAM_ACCOUNT_ID")) {
            (Some(token), Some(account_id)) => Some(InstagramConfig {
                access_token: SecretString::from(token),
                account_id,
            }),
            _ => None,
        };

        let tiktok = get("TIKTOK_ACCESS_TOKEN").map(|token| TikTokConfig {
            access_token: SecretString::from(token),
        });

        let youtube = YouTubeConfig {
            client_secrets_file: get("YOUTUBE_CLIENT_SECRETS_FILE")
                .unwrap_or_else(|| DEFAULT_YOUTUBE_CLIENT_SECRETS_FILE.to_string())
                .into(),
            credentials_file: get("YOUTUBE_CREDENTIALS_FILE")
                .or_else(|| get("YOUTUBE_CREDENTIALS_PICKLE"))
                .unwrap_or_else(|| DEFAULT_YOUTUBE_CREDENTIALS_FILE.to_string())
                .into(),
        };

        // Recorded rather than logged: no subscriber exists while config loads
        let format = match get("LOG_FORMAT") {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                warnings.push(format!("{}; falling back to text", e));
                LogFormat::Text
            }),
            None => LogFormat::Text,
        };

        let logging = LogSettings {
            level: get("LOG_LEVEL")
                .map(|level| level.to_lowercase())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            file: get("LOG_FILE")
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
                .into(),
            format,
        };

        let scheduler = SchedulerSettings {
            enabled: get("ENABLE_SCHEDULER")
                .map(|flag| flag.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            timezone: get("TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        };

        Self {
            facebook,
            instagram,
            tiktok,
            youtube,
            logging,
            scheduler,
            warnings,
        }
    }

    /// Check which platform credentials are missing and which settings
    /// were unusable
    ///
    /// Advisory only: a missing credential disables that platform's
    /// publisher, nothing more. Each warning is also logged, so call this
    /// once logging is initialized.
    pub fn validate(&self) -> Vec<String> {
        for warning in &self.warnings {
            tracing::warn!("Configuration warning: {}", warning);
        }
        self.warnings.clone()
    }

    /// Whether the given platform has what it needs to build a publisher
    pub fn is_configured(&self, platform: Platform) -> bool {
        match platform {
            Platform::Facebook => self.facebook.is_some(),
            Platform::Instagram => self.instagram.is_some(),
            Platform::TikTok => self.tiktok.is_some(),
            Platform::YouTube => self.youtube.client_secrets_file.exists(),
        }
    }

    /// Summary of configuration safe to print (no secrets)
    pub fn status(&self) -> ConfigStatus {
        ConfigStatus {
            platforms: Platform::ALL
                .iter()
                .map(|&platform| (platform, self.is_configured(platform)))
                .collect(),
            scheduler_enabled: self.scheduler.enabled,
            timezone: self.scheduler.timezone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStatus {
    pub platforms: Vec<(Platform, bool)>,
    pub scheduler_enabled: bool,
    pub timezone: String,
}

impl std::fmt::Display for ConfigStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Current Configuration:")?;
        for (platform, configured) in &self.platforms {
            let mark = if *configured {
                "✓ Configured"
            } else {
                "✗ Missing"
            };
            writeln!(f, "   {}: {}", platform, mark)?;
        }
        let scheduler = if self.scheduler_enabled {
            "✓ Enabled"
        } else {
            "✗ Disabled"
        };
        writeln!(f, "   Scheduler: {}", scheduler)?;
        write!(f, "   Timezone: {}", self.timezone)
    }
}
