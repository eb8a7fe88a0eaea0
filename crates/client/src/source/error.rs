//! Remote content source error types.

use std::sync::Arc;

/// Errors from the remote content store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// Base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// The requested entity does not exist remotely.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by the content API.
    #[error("rate limited: too many requests")]
    RateLimited,

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

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { SourceError::Timeout } else { SourceError::Network(Arc::new(err)) }
    }
}

impl From<SourceError> for inkwell_core::Error {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::InvalidUrl(msg) => inkwell_core::Error::InvalidInput(msg),
            other => inkwell_core::Error::RemoteFetch(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SourceError::NotFound("format essay".to_string());
        assert!(err.to_string().contains("not found"));

        let err = SourceError::HttpError { status: 503 };
        assert_eq!(err.to_string(), "HTTP error: 503");
    }

    #[test]
    fn test_into_core_error() {
        let err: inkwell_core::Error = SourceError::RateLimited.into();
        assert!(matches!(err, inkwell_core::Error::RemoteFetch(_)));

        let err: inkwell_core::Error = SourceError::InvalidUrl("nope".into()).into();
        assert!(matches!(err, inkwell_core::Error::InvalidInput(_)));
    }
}
