//! MCP server exposing the tool catalog.
//!
//! Every catalog entry becomes an MCP tool whose input schema is built from
//! the tool's parameters. Tools block on HTTP, so each call runs on the
//! blocking thread pool.

use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::registry::{Catalog, Toolbox};
use crate::tools::input_schema;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool as McpTool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{Error as McpError, ServerHandler};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Instructions for the MCP server, shown to agents using this server.
const INSTRUCTIONS: &str = "ClickUp tools. Start with `clickup_get_hierarchy` to find space, \
folder, and list IDs, then use the task tools with those IDs. Task IDs may be native IDs or \
custom IDs such as `DEV-42`. Dates are ISO 8601, e.g. `2026-03-15` or \
`2026-03-15T14:30:00`. Most tools fall back to the configured workspace when `workspaceId` is \
omitted. Failures are returned as text starting with `Error`.";

/// MCP server for the ClickUp tools.
#[derive(Clone)]
pub struct ClickUpServer {
    toolbox: Arc<Toolbox>,
}

impl ClickUpServer {
    /// Create a server with every catalog tool bound to `client`.
    #[must_use]
    pub fn new(client: Arc<ClickUpClient>) -> Self {
        Self::with_toolbox(Arc::new(Catalog::new().bind(client)))
    }

    /// Create a server over an existing toolbox.
    #[must_use]
    pub const fn with_toolbox(toolbox: Arc<Toolbox>) -> Self {
        Self { toolbox }
    }

    /// The shared toolbox.
    #[must_use]
    pub fn toolbox(&self) -> Arc<Toolbox> {
        Arc::clone(&self.toolbox)
    }

    /// MCP descriptions of every tool.
    #[must_use]
    pub fn tools(&self) -> Vec<McpTool> {
        self.toolbox
            .iter()
            .map(|(descriptor, tool)| {
                let schema = match input_schema(tool.params()) {
                    Value::Object(schema) => schema,
                    _ => JsonObject::new(),
                };
                McpTool::new(descriptor.name, tool.description(), Arc::new(schema))
            })
            .collect()
    }

    /// Run a tool synchronously.
    ///
    /// # Errors
    ///
    /// Returns `invalid_params` if no tool has this name. Tool failures are
    /// ordinary text results.
    pub fn call(&self, name: &str, arguments: Option<JsonObject>) -> Result<String, McpError> {
        if self.toolbox.get(name).is_none() {
            tracing::warn!(tool = name, "unknown tool requested");
            return Err(McpError::invalid_params(format!("Unknown tool '{name}'."), None));
        }
        let args = arguments.map(ToolArgs::from).unwrap_or_default();
        Ok(self.toolbox.call(name, &args))
    }
}

impl ServerHandler for ClickUpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "clickup-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult { next_cursor: None, tools: self.tools() }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        let server = self.clone();
        async move {
            let output = tokio::task::spawn_blocking(move || {
                server.call(&request.name, request.arguments)
            })
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))??;
            Ok(CallToolResult::success(vec![Content::text(output)]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Credentials;
    use crate::testing::MockTransport;
    use serde_json::json;

    fn server() -> (ClickUpServer, Arc<MockTransport>) {
        let mock = Arc::new(MockTransport::new());
        let client = ClickUpClient::with_transport(
            Credentials::new("pk_test", Some("999")),
            Arc::clone(&mock) as Arc<dyn crate::traits::Transport>,
        );
        (ClickUpServer::new(Arc::new(client)), mock)
    }

    #[test]
    fn test_server_info() {
        let (server, _) = server();
        let info = server.get_info();
        assert_eq!(info.server_info.name, "clickup-mcp");
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_instructions_describe_accepted_dates() {
        assert!(!INSTRUCTIONS.contains("milliseconds"));
        assert!(crate::ids::to_epoch_millis("2026-03-15T14:30:00").is_ok());
    }

    #[test]
    fn test_tools_carry_schemas() {
        let (server, _) = server();
        let tools = server.tools();
        assert_eq!(tools.len(), 17);

        let get_task = tools.iter().find(|t| t.name == "clickup_get_task").unwrap();
        assert_eq!(get_task.input_schema["type"], "object");
        assert_eq!(get_task.input_schema["required"], json!(["taskId"]));
    }

    #[test]
    fn test_call_runs_tool() {
        let (server, mock) = server();
        mock.respond(json!({"teams": [{"id": "999", "name": "Acme", "members": []}]}));

        let args = json!({"action": "list"});
        let out = server.call("clickup_members", args.as_object().cloned()).unwrap();
        assert!(!out.starts_with("Error"));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_call_without_arguments() {
        let (server, mock) = server();
        let out = server.call("clickup_get_task", None).unwrap();
        assert_eq!(out, "Error: taskId is required.");
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_unknown_tool_is_invalid_params() {
        let (server, _) = server();
        assert!(server.call("clickup_nope", None).is_err());
    }

    #[test]
    fn test_handler_failure_is_text() {
        let (server, mock) = server();
        mock.fail(404, "Task not found");
        let args = json!({"taskId": "abc"});
        let out = server.call("clickup_get_task", args.as_object().cloned()).unwrap();
        assert_eq!(out, "Error getting task: ClickUp API error (404): Task not found");
    }
}
