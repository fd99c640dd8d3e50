use std::path::PathBuf;

use clap::Parser;
use echo_mcp::{
    Session,
    client::{DEFAULT_TEST_MESSAGES, run_interactive, run_test_sequence},
    config::{ClientConfig, parse_timeout},
    logging,
};
use tokio::io::{BufReader, stdin, stdout};

const RULE: &str = "--------------------------------------------------";

/// Drives an echo MCP server spawned as a child process.
#[derive(Parser)]
#[command(name = "echo-mcp-client")]
#[command(version)]
struct Cli {
    /// Read messages from the console instead of running the test sequence
    #[arg(long)]
    interactive: bool,

    /// Server executable to spawn, overriding ECHO_MCP_SERVER_BIN
    #[arg(long)]
    server: Option<PathBuf>,

    /// Per-request timeout in seconds, overriding ECHO_MCP_REQUEST_TIMEOUT_SECS
    #[arg(long, value_parser = parse_timeout)]
    timeout_secs: Option<std::time::Duration>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging();

    let mut config = ClientConfig::from_env()?;
    if let Some(server) = cli.server {
        config = config.with_server_command(server);
    }
    if let Some(timeout) = cli.timeout_secs {
        config = config.with_request_timeout(timeout);
    }

    let outcome = if cli.interactive {
        interactive(&config).await
    } else {
        test_sequence(&config).await
    };

    if let Err(err) = &outcome {
        eprintln!("✗ Error: {err}");
    }
    outcome
}

async fn test_sequence(config: &ClientConfig) -> anyhow::Result<()> {
    eprintln!("Starting MCP Echo Server test client...");
    eprintln!("{RULE}");

    let session = Session::spawn(config).await?;
    eprintln!("✓ Connected to server");

    run_test_sequence(&session, &DEFAULT_TEST_MESSAGES).await?;
    session.close().await?;

    eprintln!("\n{RULE}");
    eprintln!("✓ All tests completed successfully!");
    Ok(())
}

async fn interactive(config: &ClientConfig) -> anyhow::Result<()> {
    eprintln!("Starting interactive MCP Echo Server session...");
    eprintln!("Type your messages (Ctrl+C or 'quit' to exit)");
    eprintln!("{RULE}");

    let session = Session::spawn(config).await?;
    eprintln!("✓ Connected to server\n");

    run_interactive(&session, BufReader::new(stdin()), stdout()).await?;
    session.close().await?;
    Ok(())
}
