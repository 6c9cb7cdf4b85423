//! BAMM MCP Server
//!
//! A Model Context Protocol server for Frax BAMM pools.

use rmcp::ServiceExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bamm_mcp::{BammServer, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    // stdout carries the MCP transport, so logs go to stderr
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::info!("Starting BAMM MCP Server");

    let server = BammServer::new(config)?;

    let transport = rmcp::transport::stdio();
    let running = server.serve(transport).await?;

    running.waiting().await?;

    Ok(())
}
