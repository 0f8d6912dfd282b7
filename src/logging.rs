//! Tracing setup
//!
//! Logs go to stderr because stdout carries the MCP protocol. Filtering is
//! environment-based via `RUST_LOG`; set `LOG_FORMAT=json` for structured
//! output suitable for log aggregation.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("local_news_mcp=info".parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|value| value.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}
