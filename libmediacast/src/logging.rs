//! Centralized logging configuration
//!
//! Every event goes to stderr and, when a log file is configured, to a
//! daily-rotated file next to it (`automation.log.2024-01-31`, ...).
//!
//! # Examples
//!
//! ```no_run
//! use libmediacast::logging::{LogFormat, LoggingConfig};
//!
//! let config = LoggingConfig::new(LogFormat::Text, "info".to_string(), false)
//!     .with_file("logs/automation.log");
//! config.init();
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::LogSettings;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text output (no colors, for piping)
    Text,
    /// Machine-parseable JSON (one JSON object per line)
    Json,
    /// Pretty-printed with colors (for development)
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Configuration for logging initialization
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    pub verbose: bool,
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Create a new console-only logging configuration
    ///
    /// # Arguments
    ///
    /// * `format` - Console output format (text, json, or pretty)
    /// * `level` - Minimum log level (error, warn, info, debug, trace)
    /// * `verbose` - If true, defaults to debug level
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
            file: None,
        }
    }

    /// Also write to a daily-rotated file derived from `path`
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Initialize logging with the configured settings
    ///
    /// This should be called once at the start of your program. If the log
    /// file cannot be opened, logging continues on the console only.
    ///
    /// # Panics
    ///
    /// Panics if the logging subscriber has already been initialized
    pub fn init(&self) {
        let (layers, file_error) = self.layers();

        tracing_subscriber::registry()
            .with(layers)
            .with(self.filter())
            .init();

        if let (Some(path), Some(e)) = (&self.file, file_error) {
            tracing::warn!(
                "Could not open log file {}: {}. Logging to console only.",
                path.display(),
                e
            );
        }
    }

    fn filter(&self) -> EnvFilter {
        // RUST_LOG wins over the configured level
        let level = if self.verbose { "debug" } else { self.level.as_str() };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }

    fn layers(&self) -> (Vec<BoxedLayer>, Option<InitError>) {
        let mut layers = vec![self.console_layer()];
        let mut file_error = None;

        if let Some(path) = &self.file {
            match daily_appender(path) {
                Ok(appender) => layers.push(
                    fmt::layer()
                        .with_writer(appender)
                        .with_ansi(false)
                        .with_target(true)
                        .boxed(),
                ),
                Err(e) => file_error = Some(e),
            }
        }

        (layers, file_error)
    }

    fn console_layer(&self) -> BoxedLayer {
        match self.format {
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .flatten_event(true)
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .boxed(),
            LogFormat::Pretty => fmt::layer()
                .pretty()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .boxed(),
            LogFormat::Text => fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .boxed(),
        }
    }
}

impl From<&LogSettings> for LoggingConfig {
    fn from(settings: &LogSettings) -> Self {
        LoggingConfig::new(settings.format, settings.level.clone(), false)
            .with_file(settings.file.clone())
    }
}

/// Build a daily-rotating appender: the file name becomes the prefix and
/// its parent directory is created if needed.
fn daily_appender(path: &Path) -> Result<RollingFileAppender, InitError> {
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let prefix = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mediacast.log".to_string());

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .build(directory)
}

/// Initialize logging from loaded configuration
///
/// `verbose` forces debug level regardless of `LOG_LEVEL`.
pub fn init_from_settings(settings: &LogSettings, verbose: bool) {
    let mut config = LoggingConfig::from(settings);
    config.verbose = verbose;
    config.init();
}
