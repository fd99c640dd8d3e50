use std::process::Command;
use std::time::Duration;

use echo_mcp::{
    Session,
    client::{DEFAULT_TEST_MESSAGES, run_test_sequence},
    config::ClientConfig,
    errors::ClientError,
};

const SERVER_BIN: &str = env!("CARGO_BIN_EXE_echo-mcp-server");
const CLIENT_BIN: &str = env!("CARGO_BIN_EXE_echo-mcp-client");

fn client_config() -> ClientConfig {
    ClientConfig::from_lookup(|_| None)
        .expect("default config")
        .with_server_command(SERVER_BIN)
        .with_request_timeout(Duration::from_secs(10))
}

#[tokio::test]
async fn session_drives_spawned_server() {
    let session = Session::spawn(&client_config())
        .await
        .expect("spawn and handshake");

    let tools = session.list_tools().await.expect("list tools");
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "echo");

    let received = run_test_sequence(&session, &DEFAULT_TEST_MESSAGES)
        .await
        .expect("sequence should pass");
    assert_eq!(received.len(), DEFAULT_TEST_MESSAGES.len());

    session.close().await.expect("close");
}

#[tokio::test]
async fn missing_server_binary_is_a_spawn_error() {
    let config = client_config().with_server_command("/nonexistent/echo-mcp-server");

    let err = Session::spawn(&config)
        .await
        .err()
        .expect("spawning a missing binary must fail");
    assert!(matches!(err, ClientError::Spawn(_)));
}

#[test]
fn client_binary_runs_test_sequence_and_exits_cleanly() {
    let output = Command::new(CLIENT_BIN)
        .env("ECHO_MCP_SERVER_BIN", SERVER_BIN)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run client binary");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "client failed: {stderr}");
    assert!(stderr.contains("✓ Connected to server"));
    assert!(stderr.contains("← Received: Echo: Hello, MCP Server!"));
    assert!(stderr.contains("← Received: Echo: This is a properly formatted JSON-RPC request!"));
    assert!(stderr.contains("✓ All tests completed successfully!"));
}

#[test]
fn client_binary_interactive_mode_reads_until_end_of_input() {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new(CLIENT_BIN)
        .arg("--interactive")
        .arg("--server")
        .arg(SERVER_BIN)
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn client binary");

    child
        .stdin
        .take()
        .expect("client stdin")
        .write_all(b"ping\n")
        .expect("write input");

    let output = child.wait_with_output().expect("wait for client");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "client failed: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Server: Echo: ping"));
}

#[test]
fn server_flag_overrides_environment() {
    let output = Command::new(CLIENT_BIN)
        .arg("--server")
        .arg(SERVER_BIN)
        .env("ECHO_MCP_SERVER_BIN", "/nonexistent/echo-mcp-server")
        .env("RUST_LOG", "warn")
        .output()
        .expect("run client binary");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "client failed: {stderr}");
    assert!(stderr.contains("✓ All tests completed successfully!"));
}

#[test]
fn server_from_environment_is_used_without_flag() {
    let output = Command::new(CLIENT_BIN)
        .env("ECHO_MCP_SERVER_BIN", "/nonexistent/echo-mcp-server")
        .env("RUST_LOG", "warn")
        .output()
        .expect("run client binary");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("✗ Error: failed to spawn server process"));
}
