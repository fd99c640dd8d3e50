use std::time::Duration;

use rmcp::{ErrorData as McpError, ServiceError};
use serde_json::{Value, json};
use thiserror::Error;

/// Request-scoped failures raised while dispatching a tool call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },
    #[error("invalid argument `{field}`: {reason}")]
    MalformedArgument { field: &'static str, reason: String },
}

impl ToolError {
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedArgument {
            field,
            reason: reason.into(),
        }
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let message = err.to_string();
        match err {
            ToolError::UnknownTool { name } => {
                McpError::invalid_params(message, Some(json!({ "tool": name })))
            }
            ToolError::MalformedArgument { field, reason } => McpError::invalid_params(
                message,
                Some(json!({ "field": field, "reason": reason })),
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to spawn server process: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("handshake with server failed: {0}")]
    Handshake(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("server does not know tool `{name}`")]
    UnknownTool { name: String },
    #[error("server rejected request: {}", .0.message)]
    Rejected(McpError),
    #[error("transport fault: {0}")]
    Transport(#[source] ServiceError),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
    #[error("server returned no text content")]
    EmptyReply,
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session shutdown failed: {0}")]
    Shutdown(#[source] tokio::task::JoinError),
    #[error("unexpected reply: expected {expected:?}, got {actual:?}")]
    UnexpectedReply { expected: String, actual: String },
}

impl From<ServiceError> for ClientError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::McpError(data) => {
                let unknown = data
                    .data
                    .as_ref()
                    .and_then(|data| data.get("tool"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                match unknown {
                    Some(name) => Self::UnknownTool { name },
                    None => Self::Rejected(data),
                }
            }
            other => Self::Transport(other),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be one of true, false, 1, 0")]
    InvalidBool { var: &'static str },
    #[error("ECHO_MCP_REQUEST_TIMEOUT_SECS must be a positive integer")]
    InvalidTimeout,
}
