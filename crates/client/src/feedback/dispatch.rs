//! Bridges the debounce scheduler to the feedback client.

use std::sync::Arc;

use async_trait::async_trait;
use inkwell_core::FeedbackHandler;
use serde::Serialize;
use tokio::sync::mpsc;

use super::{Feedback, FeedbackClient};

/// Feedback delivered for one settled paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphFeedback {
    pub paragraph: String,
    pub feedback: Feedback,
}

/// [`FeedbackHandler`] that requests feedback under one limiter key and
/// forwards successful results to a channel.
///
/// Failures are logged and dropped; the scheduler never sees them.
pub struct FeedbackDispatcher {
    client: Arc<FeedbackClient>,
    key: String,
    results: mpsc::UnboundedSender<ParagraphFeedback>,
}

impl FeedbackDispatcher {
    pub fn new(
        client: Arc<FeedbackClient>, key: impl Into<String>,
    ) -> (Self, mpsc::UnboundedReceiver<ParagraphFeedback>) {
        let (results, rx) = mpsc::unbounded_channel();
        (Self { client, key: key.into(), results }, rx)
    }
}

#[async_trait]
impl FeedbackHandler for FeedbackDispatcher {
    async fn generate_feedback(&self, paragraph: String) {
        match self.client.request_feedback(&self.key, &paragraph).await {
            Ok(feedback) => {
                if self.results.send(ParagraphFeedback { paragraph, feedback }).is_err() {
                    tracing::debug!(key = %self.key, "feedback receiver dropped");
                }
            }
            Err(e) => tracing::warn!(key = %self.key, "paragraph feedback failed: {}", e),
        }
    }
}
