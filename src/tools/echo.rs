use rmcp::model::{CallToolResult, Content, JsonObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ToolError;

use super::ArgumentPolicy;

pub const ECHO_TOOL: &str = "echo";
pub const ECHO_DESCRIPTION: &str = "Echoes back the input text you provide";
pub const ECHO_PREFIX: &str = "Echo: ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EchoRequest {
    #[schemars(description = "The message to echo back")]
    pub message: String,
}

impl EchoRequest {
    /// Reads `message` out of raw call arguments. An absent or null message
    /// becomes the empty string unless the policy is strict; a message of
    /// any other JSON type is always rejected.
    pub fn from_arguments(
        arguments: Option<JsonObject>,
        policy: ArgumentPolicy,
    ) -> Result<Self, ToolError> {
        let mut arguments = arguments.unwrap_or_default();
        match arguments.remove("message") {
            Some(Value::String(message)) => Ok(Self { message }),
            None | Some(Value::Null) if policy == ArgumentPolicy::Lenient => Ok(Self {
                message: String::new(),
            }),
            None | Some(Value::Null) => Err(ToolError::malformed(
                "message",
                "required string field is missing",
            )),
            Some(other) => Err(ToolError::malformed(
                "message",
                format!("expected a string, got {}", json_type(&other)),
            )),
        }
    }
}

pub fn handle_echo(req: EchoRequest) -> CallToolResult {
    CallToolResult::success(vec![Content::text(format!(
        "{ECHO_PREFIX}{}",
        req.message
    ))])
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
