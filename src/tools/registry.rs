use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;

use crate::errors::ToolError;

use super::{
    ArgumentPolicy,
    echo::{ECHO_DESCRIPTION, ECHO_TOOL, EchoRequest, handle_echo},
};

/// The fixed set of tools a server exposes, built once at startup.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
    policy: ArgumentPolicy,
}

impl ToolRegistry {
    pub fn new(policy: ArgumentPolicy) -> Self {
        Self {
            tools: vec![Tool::new(
                ECHO_TOOL,
                ECHO_DESCRIPTION,
                input_schema::<EchoRequest>(),
            )],
            policy,
        }
    }

    pub fn list_tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ToolError> {
        match name {
            ECHO_TOOL => {
                let req = EchoRequest::from_arguments(arguments, self.policy)?;
                Ok(handle_echo(req))
            }
            _ => Err(ToolError::unknown_tool(name)),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(ArgumentPolicy::default())
    }
}

fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    Arc::new(schema.as_object().cloned().unwrap_or_default())
}
