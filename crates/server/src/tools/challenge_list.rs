//! challenge_list tool implementation.
//!
//! Lists the writing challenges of a difficulty level, cache first.

use inkwell_client::ContentRepository;
use inkwell_core::Challenge;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for the challenge_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChallengeListParams {
    /// Difficulty level, e.g. "B1". Case-insensitive.
    pub level: String,

    /// Keep only challenges whose title contains this text (case-insensitive).
    #[serde(default)]
    pub search: Option<String>,

    /// Skip the cache and refetch the level from the content store.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Output structure for the challenge_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChallengeListOutput {
    pub level: String,
    /// Whether the challenges were served from the local cache.
    pub cache_hit: bool,
    pub count: usize,
    pub challenges: Vec<Challenge>,
}

/// Implementation of the challenge_list tool.
pub async fn challenge_list_impl(
    repository: &ContentRepository, params: ChallengeListParams,
) -> Result<CallToolResult, McpError> {
    let lookup = repository
        .challenges(&params.level, params.search.as_deref(), params.force_refresh)
        .await?;

    let output = ChallengeListOutput {
        level: params.level.trim().to_uppercase(),
        cache_hit: lookup.cache_hit,
        count: lookup.value.len(),
        challenges: lookup.value,
    };
    json_result(&output)
}
