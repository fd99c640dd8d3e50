//! Client side of the echo protocol: a handshaken session with a server and
//! the two flows the `echo-mcp-client` binary drives through it.

use std::future::Future;
use std::time::Duration;

use rmcp::{
    RoleClient, ServiceExt,
    model::{
        CallToolRequestParam, CallToolResult, ClientInfo, Implementation, JsonObject, ServerInfo,
        Tool,
    },
    service::RunningService,
    transport::{IntoTransport, TokioChildProcess},
};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::tools::{ECHO_PREFIX, ECHO_TOOL};

pub const DEFAULT_TEST_MESSAGES: [&str; 4] = [
    "Hello, MCP Server!",
    "echo",
    "fdfdfdfdf",
    "This is a properly formatted JSON-RPC request!",
];

pub const CLIENT_NAME: &str = "echo-mcp-client";

const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

/// A ready connection to one server. Only obtainable after a completed
/// handshake, and consumed by [`Session::close`].
pub struct Session {
    service: RunningService<RoleClient, ClientInfo>,
    request_timeout: Duration,
}

impl Session {
    /// Spawns the configured server as a child process and performs the
    /// handshake over its stdio.
    pub async fn spawn(config: &ClientConfig) -> Result<Self, ClientError> {
        let command = Command::new(&config.server_command);
        debug!(command = %config.server_command.display(), "spawning server");

        let transport = TokioChildProcess::new(command).map_err(ClientError::Spawn)?;
        Self::connect(transport, config.request_timeout).await
    }

    /// Performs the handshake over an already established transport.
    pub async fn connect<T, E, A>(
        transport: T,
        request_timeout: Duration,
    ) -> Result<Self, ClientError>
    where
        T: IntoTransport<RoleClient, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let service = client_info()
            .serve(transport)
            .await
            .map_err(|err| ClientError::Handshake(Box::new(err)))?;

        let session = Self {
            service,
            request_timeout,
        };
        if let Some(peer) = session.server_info() {
            info!(
                server = %peer.server_info.name,
                version = %peer.server_info.version,
                protocol = ?peer.protocol_version,
                "connected to server"
            );
        }
        Ok(session)
    }

    /// What the server announced during the handshake.
    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.service.peer_info()
    }

    pub async fn list_tools(&self) -> Result<Vec<Tool>, ClientError> {
        let result = self.bounded(self.service.list_tools(None)).await?;
        Ok(result.tools)
    }

    pub async fn call_tool(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ClientError> {
        let request: CallToolRequestParam = serde_json::from_value(json!({
            "name": name,
            "arguments": arguments,
        }))?;
        self.bounded(self.service.call_tool(request)).await
    }

    /// Calls the echo tool and returns the text of its first content item.
    pub async fn echo(&self, message: &str) -> Result<String, ClientError> {
        let mut arguments = JsonObject::new();
        arguments.insert("message".to_string(), Value::String(message.to_string()));

        let result = self.call_tool(ECHO_TOOL, arguments).await?;
        first_text(&result).ok_or(ClientError::EmptyReply)
    }

    pub async fn close(self) -> Result<(), ClientError> {
        let reason = self
            .service
            .cancel()
            .await
            .map_err(ClientError::Shutdown)?;
        debug!(reason = ?reason, "session closed");
        Ok(())
    }

    async fn bounded<F, R>(&self, request: F) -> Result<R, ClientError>
    where
        F: Future<Output = Result<R, rmcp::ServiceError>>,
    {
        match tokio::time::timeout(self.request_timeout, request).await {
            Ok(result) => result.map_err(ClientError::from),
            Err(_) => Err(ClientError::Timeout(self.request_timeout)),
        }
    }
}

fn client_info() -> ClientInfo {
    ClientInfo {
        client_info: Implementation {
            name: CLIENT_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Implementation::from_build_env()
        },
        ..Default::default()
    }
}

fn first_text(result: &CallToolResult) -> Option<String> {
    result
        .content
        .iter()
        .find_map(|content| content.as_text().map(|text| text.text.clone()))
}

/// Lists the tools, then echoes each message in order and checks every reply.
/// Returns the received texts in send order.
pub async fn run_test_sequence(
    session: &Session,
    messages: &[&str],
) -> Result<Vec<String>, ClientError> {
    let tools = session.list_tools().await?;
    let names: Vec<&str> = tools.iter().map(|tool| &*tool.name).collect();
    eprintln!("✓ Available tools: {names:?}");

    let mut received = Vec::with_capacity(messages.len());
    for message in messages {
        eprintln!("\n→ Sending: '{message}'");
        let reply = session.echo(message).await?;
        eprintln!("← Received: {reply}");

        let expected = format!("{ECHO_PREFIX}{message}");
        if reply != expected {
            return Err(ClientError::UnexpectedReply {
                expected,
                actual: reply,
            });
        }
        received.push(reply);
    }

    Ok(received)
}

/// Reads lines from `input` and echoes each through the session until a quit
/// word, end of input, or Ctrl+C. Returns how many messages were exchanged.
pub async fn run_interactive<R, W>(
    session: &Session,
    input: R,
    mut output: W,
) -> Result<usize, ClientError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut exchanged = 0;

    loop {
        write_out(&mut output, "You: ").await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nExiting...");
                break;
            }
        };
        let Some(message) = line else {
            break;
        };
        if QUIT_WORDS.contains(&message.to_lowercase().as_str()) {
            break;
        }

        let reply = session.echo(&message).await?;
        write_out(&mut output, &format!("Server: {reply}\n")).await?;
        exchanged += 1;
    }

    Ok(exchanged)
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), ClientError> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rmcp::ServiceError;

    use super::*;
    use crate::{server::EchoServer, tools::ToolRegistry};

    async fn in_process_session(request_timeout: Duration) -> Session {
        let (server_io, client_io) = tokio::io::duplex(4096);
        tokio::spawn(async move {
            if let Ok(server) = EchoServer::new(ToolRegistry::default())
                .serve(server_io)
                .await
            {
                let _ = server.waiting().await;
            }
        });
        Session::connect(client_io, request_timeout)
            .await
            .expect("handshake should succeed")
    }

    #[tokio::test]
    async fn stalled_request_times_out() {
        let session = in_process_session(Duration::from_millis(50)).await;

        let err = session
            .bounded(std::future::pending::<Result<(), ServiceError>>())
            .await
            .expect_err("pending request must time out");
        assert!(matches!(err, ClientError::Timeout(timeout) if timeout == Duration::from_millis(50)));

        session.close().await.expect("close");
    }

    #[tokio::test]
    async fn test_sequence_returns_replies_in_order() {
        let session = in_process_session(Duration::from_secs(5)).await;

        let received = run_test_sequence(&session, &["b", "a", ""])
            .await
            .expect("sequence should pass");
        assert_eq!(received, vec!["Echo: b", "Echo: a", "Echo: "]);

        session.close().await.expect("close");
    }
}
