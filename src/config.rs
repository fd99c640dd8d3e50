use std::{env, path::PathBuf, time::Duration};

use crate::errors::ConfigError;
use crate::tools::ArgumentPolicy;

pub const STRICT_ARGS_VAR: &str = "ECHO_MCP_STRICT_ARGS";
pub const SERVER_BIN_VAR: &str = "ECHO_MCP_SERVER_BIN";
pub const REQUEST_TIMEOUT_VAR: &str = "ECHO_MCP_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_SERVER_BIN: &str = "echo-mcp-server";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    pub argument_policy: ArgumentPolicy,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let strict = lookup(STRICT_ARGS_VAR)
            .map(|value| parse_bool(STRICT_ARGS_VAR, &value))
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            argument_policy: if strict {
                ArgumentPolicy::Strict
            } else {
                ArgumentPolicy::Lenient
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_command: PathBuf,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let server_command = lookup(SERVER_BIN_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_server_command);
        let request_timeout = lookup(REQUEST_TIMEOUT_VAR)
            .map(|value| parse_timeout(&value))
            .transpose()?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Ok(Self {
            server_command,
            request_timeout,
        })
    }

    pub fn with_server_command(mut self, command: impl Into<PathBuf>) -> Self {
        self.server_command = command.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// The server binary installed next to the running executable, or a bare
/// name resolved through `PATH` when that location is unknown.
pub fn default_server_command() -> PathBuf {
    let file_name = format!("{DEFAULT_SERVER_BIN}{}", env::consts::EXE_SUFFIX);
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&file_name)))
        .filter(|candidate| candidate.is_file())
        .unwrap_or_else(|| PathBuf::from(file_name))
}

pub fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or(ConfigError::InvalidTimeout)
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var }),
    }
}
