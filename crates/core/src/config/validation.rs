//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `rate_limit_max_requests` or `rate_limit_window_ms` is 0
    /// - either scheduler delay is 0
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit_max_requests == 0 {
            return Err(invalid("rate_limit_max_requests", "must be greater than 0"));
        }
        if self.rate_limit_window_ms == 0 {
            return Err(invalid("rate_limit_window_ms", "must be greater than 0"));
        }

        if self.paragraph_completed_delay_ms == 0 {
            return Err(invalid("paragraph_completed_delay_ms", "must be greater than 0"));
        }
        if self.mid_edit_delay_ms == 0 {
            return Err(invalid("mid_edit_delay_ms", "must be greater than 0"));
        }
        if self.mid_edit_delay_ms < self.paragraph_completed_delay_ms {
            tracing::warn!(
                mid_edit_delay_ms = self.mid_edit_delay_ms,
                paragraph_completed_delay_ms = self.paragraph_completed_delay_ms,
                "mid-edit delay is shorter than paragraph-completed delay; \
                 edits to old paragraphs will trigger feedback sooner than new paragraphs"
            );
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        Ok(())
    }
}
