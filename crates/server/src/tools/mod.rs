//! MCP tool implementations.
//!
//! This module contains all tools exposed by the inkwell server.

pub mod cache_purge;
pub mod challenge_list;
pub mod exercise_content;
pub mod format_get;
pub mod paragraph_feedback;
pub mod text_stats;

pub use cache_purge::{CachePurgeOutput, CachePurgeParams, CacheStore};
pub use challenge_list::{ChallengeListOutput, ChallengeListParams};
pub use exercise_content::{ExerciseContentOutput, ExerciseContentParams};
pub use format_get::{FormatGetOutput, FormatGetParams};
pub use paragraph_feedback::{ParagraphFeedbackOutput, ParagraphFeedbackParams};
pub use text_stats::TextStatsParams;

use inkwell_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Wrap a tool output as pretty-printed JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidPayload(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
pub(crate) fn result_json<T: serde::de::DeserializeOwned>(result: &CallToolResult) -> T {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    let text = content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
