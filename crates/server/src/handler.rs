//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::state::AppState;
use crate::tools::{
    CachePurgeParams, ChallengeListParams, ExerciseContentParams, FormatGetParams, ParagraphFeedbackParams,
    TextStatsParams, cache_purge::purge_impl, challenge_list::challenge_list_impl,
    exercise_content::exercise_content_impl, format_get::format_get_impl,
    paragraph_feedback::paragraph_feedback_impl, text_stats::text_stats_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for inkwell.
#[derive(Clone)]
pub struct InkwellServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl InkwellServer {
    /// Create a new server handler over shared state.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state, tool_router: Self::tool_router() }
    }

    #[tool(description = "Count words, paragraphs, and characters in a piece of writing.")]
    async fn text_stats(&self, params: Parameters<TextStatsParams>) -> Result<CallToolResult, McpError> {
        text_stats_impl(params.0).await
    }

    #[tool(
        description = "List writing challenges for a difficulty level (e.g. B1). Served from the local cache when possible; set force_refresh to refetch."
    )]
    async fn challenge_list(&self, params: Parameters<ChallengeListParams>) -> Result<CallToolResult, McpError> {
        challenge_list_impl(self.state.repository()?, params.0).await
    }

    #[tool(
        description = "Get the content of one exercise by exercise_id and exercise_type. Served from the local cache when possible; set force_refresh to refetch."
    )]
    async fn exercise_content(&self, params: Parameters<ExerciseContentParams>) -> Result<CallToolResult, McpError> {
        exercise_content_impl(self.state.repository()?, params.0).await
    }

    #[tool(
        description = "Get the metadata of one writing format by id. Served from the local cache when possible; set force_refresh to refetch."
    )]
    async fn format_get(&self, params: Parameters<FormatGetParams>) -> Result<CallToolResult, McpError> {
        format_get_impl(self.state.repository()?, params.0).await
    }

    #[tool(
        description = "Clear cached content. store is one of challenges, exercises, formats, all; level narrows a challenges purge."
    )]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.state.cache, params.0).await
    }

    #[tool(
        description = "Get AI feedback on one paragraph. Requests are rate limited per user_id; a denial returns RATE_LIMITED with the retry delay."
    )]
    async fn paragraph_feedback(
        &self, params: Parameters<ParagraphFeedbackParams>,
    ) -> Result<CallToolResult, McpError> {
        paragraph_feedback_impl(self.state.feedback()?, params.0).await
    }
}

impl ServerHandler for InkwellServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "inkwell".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
