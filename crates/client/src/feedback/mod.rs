//! AI feedback client.
//!
//! Every request is admission-controlled by a shared [`RateLimiter`] before
//! any network I/O happens. A local denial and a backend 429 both surface as
//! [`FeedbackError::RateLimited`]; backoff is the caller's call.

pub mod dispatch;
pub mod error;

pub use dispatch::{FeedbackDispatcher, ParagraphFeedback};
pub use error::FeedbackError;

use inkwell_core::RateLimiter;
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "inkwell/0.1";

/// Backoff hint when the backend sends 429 without Retry-After.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// AI feedback client configuration.
#[derive(Debug, Clone)]
pub struct FeedbackConfig {
    /// Feedback endpoint.
    pub url: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Request timeout (default: 30s).
    pub timeout: Duration,
    /// User-agent string (default: inkwell/0.x).
    pub user_agent: String,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self { url: String::new(), api_key: None, timeout: DEFAULT_TIMEOUT, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

#[derive(Debug, Serialize)]
struct FeedbackRequest<'a> {
    paragraph: &'a str,
}

/// Feedback returned for one paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Client for the AI feedback endpoint.
#[derive(Debug, Clone)]
pub struct FeedbackClient {
    http: reqwest::Client,
    url: Url,
    config: FeedbackConfig,
    limiter: Arc<RateLimiter>,
}

impl FeedbackClient {
    pub fn new(config: FeedbackConfig, limiter: Arc<RateLimiter>) -> Result<Self, FeedbackError> {
        let url = Url::parse(config.url.trim()).map_err(|e| FeedbackError::InvalidUrl(format!("{}: {e}", config.url)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { http, url, config, limiter })
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Request feedback on a paragraph on behalf of `key` (user or feature).
    pub async fn request_feedback(&self, key: &str, paragraph: &str) -> Result<Feedback, FeedbackError> {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            return Err(FeedbackError::EmptyParagraph);
        }

        if let Err(retry_after) = self.limiter.check(key).await {
            tracing::debug!(key, retry_after_ms = retry_after.as_millis() as u64, "feedback request throttled");
            return Err(FeedbackError::RateLimited { key: key.to_string(), retry_after });
        }

        let start = Instant::now();
        let mut request = self
            .http
            .post(self.url.clone())
            .header(header::ACCEPT, "application/json")
            .json(&FeedbackRequest { paragraph });
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("feedback API response status: {}", status);

        if status == 401 || status == 403 {
            return Err(FeedbackError::AuthError);
        }

        if status == 429 {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RETRY_AFTER);
            return Err(FeedbackError::RateLimited { key: key.to_string(), retry_after });
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(FeedbackError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        let feedback: Feedback = serde_json::from_slice(&bytes).map_err(|e| FeedbackError::Parse(e.to_string()))?;

        tracing::debug!("feedback received in {:?}", start.elapsed());
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::RateLimitConfig;
    use mockito::Matcher;

    pub(crate) fn client(url: &str, max_requests: usize) -> FeedbackClient {
        let limiter = Arc::new(RateLimiter::new(RateLimitConfig { max_requests, window_ms: 60_000 }));
        FeedbackClient::new(
            FeedbackConfig { url: url.to_string(), api_key: Some("secret".into()), ..Default::default() },
            limiter,
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_url() {
        let limiter = Arc::new(RateLimiter::new(RateLimitConfig::default()));
        let result = FeedbackClient::new(FeedbackConfig::default(), limiter);
        assert!(matches!(result, Err(FeedbackError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_request_feedback() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/feedback")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::Json(serde_json::json!({ "paragraph": "My first paragraph." })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"feedback":"Clear topic sentence.","suggestions":["Add an example."]}"#)
            .create_async()
            .await;

        let client = client(&format!("{}/feedback", server.url()), 5);
        let feedback = client
            .request_feedback("user-1", "  My first paragraph.\n")
            .await
            .unwrap();
        mock.assert_async().await;

        assert_eq!(feedback.feedback, "Clear topic sentence.");
        assert_eq!(feedback.suggestions, vec!["Add an example."]);
    }

    #[tokio::test]
    async fn test_local_limit_skips_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/feedback")
            .with_status(200)
            .with_body(r#"{"feedback":"ok"}"#)
            .expect(2)
            .create_async()
            .await;

        let client = client(&format!("{}/feedback", server.url()), 1);
        client.request_feedback("user-1", "First.").await.unwrap();

        let denied = client.request_feedback("user-1", "Second.").await;
        match denied {
            Err(FeedbackError::RateLimited { key, retry_after }) => {
                assert_eq!(key, "user-1");
                assert!(retry_after > Duration::from_secs(59));
                assert!(retry_after <= Duration::from_millis(60_001));
            }
            other => panic!("expected rate limit, got {other:?}"),
        }

        // another user has its own window
        client.request_feedback("user-2", "Third.").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_backend_429_uses_retry_after() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/feedback")
            .with_status(429)
            .with_header("retry-after", "7")
            .create_async()
            .await;

        let client = client(&format!("{}/feedback", server.url()), 5);
        let result = client.request_feedback("user-1", "Paragraph.").await;
        assert!(matches!(
            result,
            Err(FeedbackError::RateLimited { retry_after, .. }) if retry_after == Duration::from_secs(7)
        ));
    }

    #[tokio::test]
    async fn test_empty_paragraph_not_sent() {
        let client = client("http://127.0.0.1:9/feedback", 5);
        let result = client.request_feedback("user-1", " \n ").await;
        assert!(matches!(result, Err(FeedbackError::EmptyParagraph)));
        assert_eq!(client.limiter().remaining("user-1").await, 5);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mut server = mockito::Server::new_async().await;
        server.mock("POST", "/auth").with_status(403).create_async().await;
        server.mock("POST", "/broken").with_status(502).create_async().await;
        server
            .mock("POST", "/garbled")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let auth = client(&format!("{}/auth", server.url()), 5);
        assert!(matches!(auth.request_feedback("u", "Text.").await, Err(FeedbackError::AuthError)));

        let broken = client(&format!("{}/broken", server.url()), 5);
        assert!(matches!(broken.request_feedback("u", "Text.").await, Err(FeedbackError::HttpError { status: 502 })));

        let garbled = client(&format!("{}/garbled", server.url()), 5);
        assert!(matches!(garbled.request_feedback("u", "Text.").await, Err(FeedbackError::Parse(_))));
    }
}
