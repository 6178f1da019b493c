use anyhow::Result;
use tracing::info;

use geoatlas_mcp::ServerState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging - MUST redirect to stderr to avoid stdout protocol corruption
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("geoatlas_mcp=info".parse()?),
        )
        .init();

    let state = ServerState::new().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    state
        .initialize()
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    for resource in state.resources() {
        info!(uri = resource.uri, "registered resource");
    }
    info!("MCP server ready");

    Ok(())
}
