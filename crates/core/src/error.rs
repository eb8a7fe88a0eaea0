//! Unified error types for inkwell.
//!
//! Every variant carries a stable code prefix in its display string so
//! callers and tool clients can branch on it.

use std::time::Duration;

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the writing trainer core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty category).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored or fetched payload could not be (de)serialized.
    #[error("INVALID_PAYLOAD: {0}")]
    InvalidPayload(String),

    /// The remote content store failed.
    #[error("REMOTE_FETCH_FAILED: {0}")]
    RemoteFetch(String),

    /// Admission denied by the rate limiter.
    #[error("RATE_LIMITED: {key} (retry after {}ms)", .retry_after.as_millis())]
    RateLimited { key: String, retry_after: Duration },

    /// The AI feedback backend failed.
    #[error("FEEDBACK_FAILED: {0}")]
    FeedbackFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidPayload(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::InvalidPayload(msg) => (-32003, msg.clone()),
            Error::RemoteFetch(msg) => (-32004, msg.clone()),
            Error::RateLimited { .. } => (-32005, err.to_string()),
            Error::FeedbackFailed(msg) => (-32006, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::RemoteFetch("format essay".to_string());
        assert!(err.to_string().contains("REMOTE_FETCH_FAILED"));
        assert!(err.to_string().contains("format essay"));
    }

    #[test]
    fn test_rate_limited_display() {
        let err = Error::RateLimited { key: "user-1".into(), retry_after: Duration::from_millis(250) };
        assert_eq!(err.to_string(), "RATE_LIMITED: user-1 (retry after 250ms)");
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::RemoteFetch("HTTP 500".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32004);

        let err = Error::RateLimited { key: "k".into(), retry_after: Duration::from_secs(1) };
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32005);
        assert!(mcp_err.message.contains("RATE_LIMITED"));
    }

    #[test]
    fn test_serde_error_maps_to_invalid_payload() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err().into();
        assert!(matches!(err, Error::InvalidPayload(_)));
    }
}
