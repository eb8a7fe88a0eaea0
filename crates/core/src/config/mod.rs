//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (INKWELL_*)
//! 2. TOML config file (if INKWELL_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::limiter::RateLimitConfig;
use crate::scheduler::SchedulerConfig;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (INKWELL_*)
/// 2. TOML config file (if INKWELL_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via INKWELL_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Feedback requests admitted per window, per key.
    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: usize,

    /// Rate limit window in milliseconds.
    #[serde(default = "default_rate_limit_window_ms")]
    pub rate_limit_window_ms: u64,

    /// Quiet period before feedback on a just-completed paragraph.
    ///
    /// The MCP server has no editor session and never schedules feedback;
    /// this and `mid_edit_delay_ms` are read by embedders that drive a
    /// `FeedbackScheduler` through [`AppConfig::scheduler`].
    #[serde(default = "default_paragraph_completed_delay_ms")]
    pub paragraph_completed_delay_ms: u64,

    /// Quiet period before feedback on an edited earlier paragraph.
    #[serde(default = "default_mid_edit_delay_ms")]
    pub mid_edit_delay_ms: u64,

    /// Base URL of the remote content REST API.
    ///
    /// Set via INKWELL_CONTENT_BASE_URL environment variable.
    /// Required only when content has to be fetched.
    #[serde(default)]
    pub content_base_url: Option<String>,

    /// API key sent to the content API.
    #[serde(default)]
    pub content_api_key: Option<String>,

    /// AI feedback endpoint.
    ///
    /// Set via INKWELL_FEEDBACK_URL environment variable.
    #[serde(default)]
    pub feedback_url: Option<String>,

    /// API key sent to the feedback endpoint.
    #[serde(default)]
    pub feedback_api_key: Option<String>,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Age after which cached content is refetched by the repository.
    ///
    /// Unset means cached content is served until explicitly cleared.
    #[serde(default)]
    pub cache_max_age_secs: Option<u64>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./inkwell-cache.sqlite")
}

fn default_rate_limit_max_requests() -> usize {
    10
}

fn default_rate_limit_window_ms() -> u64 {
    60_000
}

fn default_paragraph_completed_delay_ms() -> u64 {
    1_000
}

fn default_mid_edit_delay_ms() -> u64 {
    1_500
}

fn default_user_agent() -> String {
    "inkwell/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            rate_limit_max_requests: default_rate_limit_max_requests(),
            rate_limit_window_ms: default_rate_limit_window_ms(),
            paragraph_completed_delay_ms: default_paragraph_completed_delay_ms(),
            mid_edit_delay_ms: default_mid_edit_delay_ms(),
            content_base_url: None,
            content_api_key: None,
            feedback_url: None,
            feedback_api_key: None,
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_max_age_secs: None,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig { max_requests: self.rate_limit_max_requests, window_ms: self.rate_limit_window_ms }
    }

    /// Debounce delays for an editor-side `FeedbackScheduler`.
    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            paragraph_completed_delay: Duration::from_millis(self.paragraph_completed_delay_ms),
            mid_edit_delay: Duration::from_millis(self.mid_edit_delay_ms),
        }
    }

    pub fn cache_max_age(&self) -> Option<chrono::Duration> {
        self.cache_max_age_secs
            .and_then(|secs| i64::try_from(secs).ok())
            .map(chrono::Duration::seconds)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `INKWELL_`
    /// 2. TOML file from `INKWELL_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("INKWELL_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("INKWELL_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Content API base URL (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the URL is not set.
    pub fn require_content_base_url(&self) -> Result<&str, ConfigError> {
        self.content_base_url.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "content_base_url".into(),
            hint: "Set INKWELL_CONTENT_BASE_URL environment variable".into(),
        })
    }

    /// Feedback endpoint URL (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the URL is not set.
    pub fn require_feedback_url(&self) -> Result<&str, ConfigError> {
        self.feedback_url.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "feedback_url".into(),
            hint: "Set INKWELL_FEEDBACK_URL environment variable".into(),
        })
    }
}
