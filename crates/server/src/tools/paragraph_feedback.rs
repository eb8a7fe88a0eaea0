//! paragraph_feedback tool implementation.
//!
//! Requests AI feedback for one paragraph. Admission is controlled per
//! `user_id` by the shared rate limiter; a denial is returned as a
//! RATE_LIMITED error carrying the retry delay.

use inkwell_client::FeedbackClient;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for the paragraph_feedback tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParagraphFeedbackParams {
    /// Rate limiting key.
    pub user_id: String,
    /// Paragraph text to review.
    pub paragraph: String,
}

/// Output structure for the paragraph_feedback tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParagraphFeedbackOutput {
    pub feedback: String,
    pub suggestions: Vec<String>,
    /// Requests this user may still make in the current window.
    pub remaining: usize,
}

/// Implementation of the paragraph_feedback tool.
pub async fn paragraph_feedback_impl(
    client: &FeedbackClient, params: ParagraphFeedbackParams,
) -> Result<CallToolResult, McpError> {
    let user_id = params.user_id.trim();
    if user_id.is_empty() {
        return Err(inkwell_core::Error::InvalidInput("user_id cannot be empty".into()).into());
    }

    let feedback = client
        .request_feedback(user_id, &params.paragraph)
        .await
        .map_err(inkwell_core::Error::from)?;

    let output = ParagraphFeedbackOutput {
        feedback: feedback.feedback,
        suggestions: feedback.suggestions,
        remaining: client.limiter().remaining(user_id).await,
    };
    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_client::FeedbackConfig;
    use inkwell_core::{RateLimitConfig, RateLimiter};
    use std::sync::Arc;

    // Nothing listens on the discard port; these tests never reach the network.
    fn client(max_requests: usize) -> FeedbackClient {
        let limiter = Arc::new(RateLimiter::new(RateLimitConfig { max_requests, window_ms: 60_000 }));
        FeedbackClient::new(FeedbackConfig { url: "http://127.0.0.1:9/feedback".into(), ..Default::default() }, limiter)
            .unwrap()
    }

    fn params(user_id: &str, paragraph: &str) -> ParagraphFeedbackParams {
        ParagraphFeedbackParams { user_id: user_id.into(), paragraph: paragraph.into() }
    }

    #[tokio::test]
    async fn test_rate_limited_user() {
        let client = client(1);
        assert!(!client.limiter().is_limited("user-1").await);

        let err = paragraph_feedback_impl(&client, params("user-1", "A paragraph."))
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32005);
        assert!(err.message.contains("RATE_LIMITED"));
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let client = client(5);

        let err = paragraph_feedback_impl(&client, params("", "A paragraph.")).await.unwrap_err();
        assert_eq!(err.code.0, -32602);

        let err = paragraph_feedback_impl(&client, params("user-1", "\n\n")).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
        assert_eq!(client.limiter().remaining("user-1").await, 5);
    }
}
