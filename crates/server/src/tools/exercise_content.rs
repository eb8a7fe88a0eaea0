//! exercise_content tool implementation.
//!
//! Returns the generated content for one exercise of one type, cache first.

use inkwell_client::ContentRepository;
use inkwell_core::{Error, ExerciseContent};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for the exercise_content tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExerciseContentParams {
    pub exercise_id: String,

    /// Exercise type, e.g. "gap_fill". Case-insensitive.
    pub exercise_type: String,

    /// Skip the cache and refetch from the content store.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Output structure for the exercise_content tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExerciseContentOutput {
    /// Whether the content was served from the local cache.
    pub cache_hit: bool,
    pub exercise: ExerciseContent,
}

/// Implementation of the exercise_content tool.
pub async fn exercise_content_impl(
    repository: &ContentRepository, params: ExerciseContentParams,
) -> Result<CallToolResult, McpError> {
    let exercise_id = params.exercise_id.trim();
    let exercise_type = params.exercise_type.trim();
    if exercise_id.is_empty() || exercise_type.is_empty() {
        return Err(Error::InvalidInput("exercise_id and exercise_type are required".into()).into());
    }

    let lookup = repository
        .exercise_content(exercise_id, exercise_type, params.force_refresh)
        .await?;

    json_result(&ExerciseContentOutput { cache_hit: lookup.cache_hit, exercise: lookup.value })
}
