use std::io::IsTerminal;
use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{QuitReason, RequestContext},
};
use tokio::io::{stdin, stdout};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::tools::ToolRegistry;

pub const SERVER_NAME: &str = "echo-server";

#[derive(Debug, Clone)]
pub struct EchoServer {
    registry: Arc<ToolRegistry>,
}

impl EchoServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(ToolRegistry::new(config.argument_policy))
    }
}

impl ServerHandler for EchoServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Echo server: call the `echo` tool with a `message` to get it back prefixed with \"Echo: \"."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(
            self.registry.list_tools().to_vec(),
        ))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool = %request.name, "tool call");
        self.registry
            .call_tool(&request.name, request.arguments)
            .map_err(|err| {
                warn!(tool = %request.name, error = %err, "tool call failed");
                McpError::from(err)
            })
    }
}

/// Serves MCP on the process's stdin/stdout until the client hangs up.
pub async fn serve_stdio(config: ServerConfig) -> anyhow::Result<QuitReason> {
    if std::io::stdin().is_terminal() {
        warn_interactive_terminal();
    }

    info!(policy = ?config.argument_policy, "echo server starting");

    let server = EchoServer::from_config(&config)
        .serve((stdin(), stdout()))
        .await?;
    let reason = server.waiting().await?;

    info!(reason = ?reason, "echo server stopped");
    Ok(reason)
}

fn warn_interactive_terminal() {
    let rule = "=".repeat(70);
    warn!("{rule}");
    warn!("this MCP server expects JSON-RPC messages over stdin");
    warn!("typing plain text will cause validation errors");
    warn!("use a proper MCP client, e.g. `echo-mcp-client`");
    warn!("{rule}");
}
