//! format_get tool implementation.
//!
//! Returns the metadata for one writing format, cache first.

use inkwell_client::ContentRepository;
use inkwell_core::{Error, Format};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for the format_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FormatGetParams {
    /// Format id, e.g. "essay".
    pub id: String,

    /// Skip the cache and refetch from the content store.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Output structure for the format_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FormatGetOutput {
    /// Whether the format was served from the local cache.
    pub cache_hit: bool,
    pub format: Format,
}

/// Implementation of the format_get tool.
pub async fn format_get_impl(repository: &ContentRepository, params: FormatGetParams) -> Result<CallToolResult, McpError> {
    let id = params.id.trim();
    if id.is_empty() {
        return Err(Error::InvalidInput("id cannot be empty".into()).into());
    }

    let lookup = repository.format(id, params.force_refresh).await?;
    json_result(&FormatGetOutput { cache_hit: lookup.cache_hit, format: lookup.value })
}
