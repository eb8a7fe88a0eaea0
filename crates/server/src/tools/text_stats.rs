//! text_stats tool implementation.
//!
//! Pure computation over the submitted text; no I/O.

use inkwell_core::TextStats;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for the text_stats tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextStatsParams {
    /// The text being written. May be empty.
    pub text: String,
}

/// Implementation of the text_stats tool.
pub async fn text_stats_impl(params: TextStatsParams) -> Result<CallToolResult, McpError> {
    json_result(&TextStats::of(&params.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::result_json;

    #[tokio::test]
    async fn test_text_stats() {
        let params = TextStatsParams { text: "Hello world\n\nSecond para".into() };
        let result = text_stats_impl(params).await.unwrap();
        let stats: TextStats = result_json(&result);
        assert_eq!(stats, TextStats { word_count: 4, paragraph_count: 2, char_count: 24 });
    }

    #[tokio::test]
    async fn test_text_stats_blank() {
        let result = text_stats_impl(TextStatsParams { text: "   ".into() }).await.unwrap();
        let stats: TextStats = result_json(&result);
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.paragraph_count, 0);
        assert_eq!(stats.char_count, 3);
    }
}
