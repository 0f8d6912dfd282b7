//! Local News MCP Server
//!
//! Local news search via a remote search API, with clustered story
//! deduplication.
//!
//! # Configuration
//! Set `LOCAL_NEWS_API_KEY` env var or configure in `~/.local-news-mcp.toml`

use rmcp::{transport::stdio, ServiceExt};

use local_news_mcp::{Config, LocalNewsMcpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    local_news_mcp::logging::init()?;

    tracing::info!("Starting Local News MCP Server");

    let config = Config::load()?;
    tracing::info!("API base URL: {}", config.api.base_url);

    let server = LocalNewsMcpServer::new(config);
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
