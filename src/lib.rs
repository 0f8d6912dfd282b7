//! Local News MCP Library
//!
//! MCP server exposing a local-news search API as tools, resources, and
//! prompt templates. The interesting part is the clustered search path:
//! pages of a clustered response are fetched sequentially, merged with
//! URL-based deduplication, and reduced to one representative article per
//! story, ranked by a blended quality score.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use local_news_mcp::{Config, LocalNewsMcpServer};
//!
//! let server = LocalNewsMcpServer::new(Config::load()?);
//! // Serve via stdio or drive the handlers directly
//! ```

pub mod client;
pub mod clustering;
pub mod config;
pub mod format;
pub mod guides;
pub mod handlers;
pub mod logging;
pub mod params;
pub mod prompts;
pub mod server;
pub mod types;

// Re-export the main entry points
pub use config::Config;
pub use server::LocalNewsMcpServer;
