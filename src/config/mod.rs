use std::env;
use std::time::Duration;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Per-session defaults.
    pub session: SessionConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Per-session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum thoughts stored per session before adds report
    /// a capacity outcome. Only the thought category is capped.
    pub max_thoughts_per_session: usize,
    /// Inactivity window after which a session is evicted.
    pub session_timeout: Duration,
    /// Whether per-category keyword indices are maintained on add.
    /// When disabled, keyword search returns no results.
    pub keyword_indexing: bool,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default tracing filter (overridden by `RUST_LOG`).
    pub level: String,
    /// Log output format.
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// Human-readable output.
    Pretty,
    /// Structured JSON output.
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let session = SessionConfig {
            max_thoughts_per_session: env::var("MAX_THOUGHTS_PER_SESSION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            session_timeout: Duration::from_secs(
                env::var("SESSION_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
            keyword_indexing: env::var("KEYWORD_INDEXING")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        };

        if session.max_thoughts_per_session == 0 {
            return Err(AppError::Config {
                message: "MAX_THOUGHTS_PER_SESSION must be at least 1".to_string(),
            });
        }

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(Config { session, logging })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_thoughts_per_session: 100,
            session_timeout: Duration::from_secs(3600),
            keyword_indexing: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber for this configuration.
    ///
    /// Writes to stderr so embedders can keep stdout for their own protocol.
    /// Panics if a global subscriber is already set.
    pub fn init(&self) {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().with_writer(std::io::stderr))
                    .init();
            }
        }
    }
}
