//! MCP server handler.
//!
//! A thin session layer over the dispatcher: `tools/list` returns the
//! registry surface, `tools/call` runs one invocation. All petstore
//! knowledge lives in `unrelated-petstore-tools`; this module only maps
//! between MCP request/response types and the dispatcher's typed errors.

use rmcp::model::{
    CallToolRequestParam, CallToolResult, ListToolsResult, PaginatedRequestParam,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData, ServerHandler};
use serde_json::{Value, json};
use unrelated_petstore_tools::dispatch::Dispatcher;
use unrelated_petstore_tools::error::PetstoreToolsError;

#[derive(Clone)]
pub struct PetstoreServer {
    dispatcher: Dispatcher,
}

impl PetstoreServer {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl ServerHandler for PetstoreServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Swagger Petstore exposed as MCP tools. Each tool maps to one REST \
                 operation (pets, store orders, users); responses are the API's JSON \
                 bodies, unmodified."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: self.dispatcher.list_tools(),
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = request
            .arguments
            .map_or_else(|| json!({}), Value::Object);

        tracing::debug!(tool = %request.name, "tools/call");
        self.dispatcher
            .call_tool(&request.name, &arguments)
            .await
            .map_err(to_mcp_error)
    }
}

/// Map dispatcher errors onto JSON-RPC error shapes.
///
/// Caller mistakes (unknown tool, missing argument) become invalid-params;
/// everything else is an internal error. Remote failures keep the upstream
/// status and payload as structured data so clients can still tell a 404
/// from a 400.
fn to_mcp_error(err: PetstoreToolsError) -> ErrorData {
    match &err {
        PetstoreToolsError::UnknownTool(_) | PetstoreToolsError::Validation { .. } => {
            ErrorData::invalid_params(err.to_string(), None)
        }
        PetstoreToolsError::Remote { status, body } => ErrorData::internal_error(
            format!("API returned {status}"),
            Some(json!({"status": status, "body": body})),
        ),
        _ => ErrorData::internal_error(err.to_string(), None),
    }
}
