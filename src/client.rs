//! Remote news API client
//!
//! The boundary contract is deliberately narrow: a call yields a parsed
//! response or a [`FetchFailure`]. Failure kinds stay distinguishable for
//! logging and tests, but callers treat every failure uniformly as
//! "no data". No retries are performed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::types::{ArticleResponse, ClusteredResponse, HeadlinesPayload, SearchPayload};

/// Ad-hoc and clustered search endpoint.
pub const SEARCH_ENDPOINT: &str = "/api/search";
/// Latest-headlines endpoint.
pub const HEADLINES_ENDPOINT: &str = "/api/latest_headlines";

/// Why a request produced no data.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("API credential is not configured (set LOCAL_NEWS_API_KEY)")]
    MissingCredential,

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API returned status {0}")]
    Status(StatusCode),

    #[error("malformed response body: {0}")]
    Malformed(String),
}

/// Seam between the tool handlers and the remote search API.
///
/// The aggregator and handlers depend on this trait so tests can script
/// responses without a network.
#[async_trait]
pub trait NewsApi: Send + Sync {
    /// Search with cluster grouping enabled in the payload.
    async fn clustered_search(
        &self,
        payload: &SearchPayload,
    ) -> Result<ClusteredResponse, FetchFailure>;

    /// Standard article search.
    async fn search(&self, payload: &SearchPayload) -> Result<ArticleResponse, FetchFailure>;

    /// Latest headlines for a set of locations.
    async fn latest_headlines(
        &self,
        payload: &HeadlinesPayload,
    ) -> Result<ArticleResponse, FetchFailure>;
}

/// HTTP implementation of [`NewsApi`].
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    timeout_secs: u64,
}

impl NewsApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("local-news-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    /// POST a JSON payload and parse the response, logging any failure.
    async fn post<T, P>(&self, endpoint: &str, payload: &P) -> Result<T, FetchFailure>
    where
        T: serde::de::DeserializeOwned,
        P: serde::Serialize + Sync,
    {
        let result = self.post_inner(endpoint, payload).await;
        if let Err(reason) = &result {
            tracing::warn!(endpoint, %reason, "news API request failed");
        }
        result
    }

    async fn post_inner<T, P>(&self, endpoint: &str, payload: &P) -> Result<T, FetchFailure>
    where
        T: serde::de::DeserializeOwned,
        P: serde::Serialize + Sync,
    {
        // The credential check runs before any network traffic.
        let token = self
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(FetchFailure::MissingCredential)?;

        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http
            .post(&url)
            .header("x-api-token", token)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchFailure::Timeout(self.timeout_secs)
                } else {
                    FetchFailure::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, body = %body, "error response body");
            return Err(FetchFailure::Status(status));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchFailure::Malformed(e.to_string()))
    }
}

#[async_trait]
impl NewsApi for NewsApiClient {
    async fn clustered_search(
        &self,
        payload: &SearchPayload,
    ) -> Result<ClusteredResponse, FetchFailure> {
        self.post(SEARCH_ENDPOINT, payload).await
    }

    async fn search(&self, payload: &SearchPayload) -> Result<ArticleResponse, FetchFailure> {
        self.post(SEARCH_ENDPOINT, payload).await
    }

    async fn latest_headlines(
        &self,
        payload: &HeadlinesPayload,
    ) -> Result<ArticleResponse, FetchFailure> {
        self.post(HEADLINES_ENDPOINT, payload).await
    }
}
