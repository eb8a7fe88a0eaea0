//! cache_purge tool implementation.
//!
//! Explicit invalidation for the content caches. Entries are never expired
//! implicitly, so this is the only way to drop them.

use inkwell_core::{CacheDb, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Which cache store to clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CacheStore {
    Challenges,
    Exercises,
    Formats,
    All,
}

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Store to clear.
    pub store: CacheStore,

    /// Only clear challenges of this difficulty level. Valid with store=challenges.
    #[serde(default)]
    pub level: Option<String>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &CacheDb, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let level = params.level.as_deref().map(str::trim).filter(|l| !l.is_empty());
    if level.is_some() && params.store != CacheStore::Challenges {
        return Err(Error::InvalidInput("level is only valid with store=challenges".to_string()).into());
    }

    let deleted = match params.store {
        CacheStore::Challenges => cache.clear_challenge_cache(level).await?,
        CacheStore::Exercises => cache.clear_exercise_cache(None).await?,
        CacheStore::Formats => cache.clear_format_cache().await?,
        CacheStore::All => cache.clear_all().await?,
    };

    tracing::info!(store = ?params.store, level = ?level, deleted, "cache purged");
    json_result(&CachePurgeOutput { deleted })
}
