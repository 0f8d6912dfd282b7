//! Configuration loading for local-news-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variable LOCAL_NEWS_CONFIG_PATH
//! 2. ~/.local-news-mcp.toml
//! 3. Default values
//!
//! `LOCAL_NEWS_API_KEY` and `LOCAL_NEWS_API_BASE` override the file.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote API endpoint and credential
    #[serde(default)]
    pub api: ApiConfig,
    /// Defaults applied when a tool call leaves a knob unset
    #[serde(default)]
    pub search: SearchConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Static API token. Usually supplied via LOCAL_NEWS_API_KEY instead.
    #[serde(default)]
    pub token: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Search defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Articles per page for plain searches and headlines
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Default date-range start for searches
    #[serde(default = "default_from")]
    pub from_: String,
    /// Default lookback window for headlines
    #[serde(default = "default_when")]
    pub when: String,
    /// Articles per page for clustered fetches. Larger pages keep more of
    /// a story's cluster membership on one page.
    #[serde(default = "default_cluster_page_size")]
    pub cluster_page_size: u32,
    /// Page cap for clustered pagination
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Cap on cluster representatives returned by intelligent_search
    #[serde(default = "default_max_clusters")]
    pub max_clusters: usize,
}

// Default value functions
fn default_base_url() -> String {
    "https://local-news.newscatcherapi.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    10
}

fn default_from() -> String {
    "7 days ago".to_string()
}

fn default_when() -> String {
    "7d".to_string()
}

fn default_cluster_page_size() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    3
}

fn default_max_clusters() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            from_: default_from(),
            when: default_when(),
            cluster_page_size: default_cluster_page_size(),
            max_pages: default_max_pages(),
            max_clusters: default_max_clusters(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_path();

        let mut config = if let Some(path) = config_path {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                let content = std::fs::read_to_string(&path)?;
                Self::from_toml(&content)?
            } else {
                tracing::info!("Config file not found, using defaults");
                Self::default()
            }
        } else {
            tracing::info!("No config path specified, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a TOML document into a config
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Environment variables take priority over the config file
    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("LOCAL_NEWS_API_KEY") {
            if !token.is_empty() {
                self.api.token = Some(token);
            }
        }
        if let Ok(base_url) = std::env::var("LOCAL_NEWS_API_BASE") {
            if !base_url.is_empty() {
                self.api.base_url = base_url;
            }
        }
    }

    /// Find the configuration file path
    fn find_config_path() -> Option<PathBuf> {
        // 1. Check environment variable
        if let Ok(path) = std::env::var("LOCAL_NEWS_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        // 2. Check ~/.local-news-mcp.toml
        if let Ok(home) = std::env::var("HOME") {
            let path = PathBuf::from(home).join(".local-news-mcp.toml");
            return Some(path);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.token.is_none());
        assert_eq!(config.search.page_size, 10);
        assert_eq!(config.search.max_pages, 3);
        assert_eq!(config.search.max_clusters, 10);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config = Config::from_toml(
            r#"
            [api]
            token = "secret"

            [search]
            max_pages = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.api.base_url, "https://local-news.newscatcherapi.com");
        assert_eq!(config.search.max_pages, 5);
        assert_eq!(config.search.cluster_page_size, 100);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(Config::from_toml("api = ").is_err());
    }
}
