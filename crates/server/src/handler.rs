//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::cache::clear_impl;
use crate::tools::icon_copy::{IconCopyParams, copy_impl};
use crate::tools::icon_search::{IconSearchParams, search_impl};

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
use svgl_client::IconSearch;

/// The main MCP server handler for svgl.
#[derive(Clone)]
pub struct McpSvglServer {
    tool_router: ToolRouter<Self>,
    search: Arc<IconSearch>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpSvglServer {
    /// Create a new server handler around a shared search pipeline.
    pub fn new(search: Arc<IconSearch>) -> Self {
        Self { tool_router: Self::tool_router(), search }
    }

    /// Search SVGL icons.
    ///
    /// Each icon yields a light and a dark entry. Rapid successive calls are
    /// coalesced: a call superseded by a newer one returns no entries.
    #[tool(
        description = "Search SVGL brand icons. Returns a light and a dark entry per icon with local SVG paths; a blank query returns a prompt entry."
    )]
    async fn icon_search(&self, params: Parameters<IconSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.search, params.0).await
    }

    #[tool(description = "Get the raw SVG markup of an icon returned by icon_search, for copying to the clipboard.")]
    async fn icon_copy(&self, params: Parameters<IconCopyParams>) -> Result<CallToolResult, McpError> {
        copy_impl(&self.search, params.0).await
    }

    #[tool(description = "Clear cached search results and delete all stored icon files. Returns the number of files deleted.")]
    async fn cache_clear(&self) -> Result<CallToolResult, McpError> {
        clear_impl(&self.search).await
    }
}

impl ServerHandler for McpSvglServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "svgl-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some("Search SVGL brand icons with icon_search, then fetch markup with icon_copy.".into()),
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
