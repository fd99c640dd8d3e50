use echo_mcp::{config::ServerConfig, logging, server::serve_stdio};
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = ServerConfig::from_env()?;
    if let Err(err) = serve_stdio(config).await {
        error!(error = %err, "server error");
        return Err(err);
    }
    Ok(())
}
