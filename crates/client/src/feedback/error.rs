//! AI feedback client error types.

use std::sync::Arc;
use std::time::Duration;

/// Errors from the AI feedback backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FeedbackError {
    /// Nothing to send.
    #[error("paragraph is empty")]
    EmptyParagraph,

    /// Endpoint URL could not be parsed.
    #[error("invalid feedback URL: {0}")]
    InvalidUrl(String),

    /// Admission denied, locally or by the backend.
    #[error("rate limited for {key}: retry after {}ms", .retry_after.as_millis())]
    RateLimited { key: String, retry_after: Duration },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FeedbackError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { FeedbackError::Timeout } else { FeedbackError::Network(Arc::new(err)) }
    }
}

impl From<FeedbackError> for inkwell_core::Error {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::RateLimited { key, retry_after } => inkwell_core::Error::RateLimited { key, retry_after },
            FeedbackError::EmptyParagraph | FeedbackError::InvalidUrl(_) => {
                inkwell_core::Error::InvalidInput(err.to_string())
            }
            other => inkwell_core::Error::FeedbackFailed(other.to_string()),
        }
    }
}
