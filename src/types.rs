//! Data model for the local-news search API
//!
//! Request payloads are serialize-only; response shapes are deserialized
//! leniently because the remote API omits fields freely.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Request Payloads
// ============================================================================

/// Outbound body for the search endpoint.
///
/// One payload is built per page fetch; only `page` varies across pages of
/// the same logical search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPayload {
    /// Boolean query text, forwarded verbatim to the remote API.
    pub q: String,
    /// Locations in "City, State" or "State" format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Location-provenance filter (e.g. "dedicated_source").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_methods: Option<Vec<String>>,
    /// Start date, relative ("7 days ago") or absolute ("2024-01-01").
    /// The API accepts at most a 30-day lookback.
    pub from_: String,
    pub page_size: u32,
    pub clustering: bool,
    pub page: u32,
}

impl SearchPayload {
    /// Copy of this payload pointed at a different page.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// Outbound body for the latest-headlines endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlinesPayload {
    /// Lookback window, e.g. "24h" or "7d". Maximum 30d.
    pub when: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub page_size: u32,
}

// ============================================================================
// Response Shapes
// ============================================================================

/// One news item as returned by the remote API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    /// Source domain, e.g. "sfchronicle.com".
    #[serde(default)]
    pub domain_url: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub nlp: Option<NlpAnnotations>,
    /// Canonical URL; the dedup key during cluster merging.
    #[serde(default)]
    pub link: String,
    /// Relevance score, higher is better.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub locations: Vec<ArticleLocation>,
}

impl Article {
    /// Relevance score with the missing-score default of 0.
    pub fn relevance(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

/// NLP-derived metadata attached to an article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NlpAnnotations {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub theme: Vec<String>,
}

/// Sentiment scores in [-1, 1] for title and body text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sentiment {
    #[serde(default)]
    pub title: f64,
    #[serde(default)]
    pub content: f64,
}

/// A location mention with the detection method(s) that attributed it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleLocation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub detection_methods: Vec<String>,
}

/// Articles the remote API judged to cover the same story.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// One page of a clustered search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusteredResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_hits: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Cluster id (opaque, assigned by the API) to cluster membership.
    /// Absent in the wire format when clustering found nothing.
    #[serde(default)]
    pub clusters: HashMap<String, Cluster>,
}

/// A standard (non-clustered) search or headlines response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_hits: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub articles: Vec<Article>,
}

// ============================================================================
// Aggregation Results
// ============================================================================

/// Bookkeeping for a multi-page clustered fetch.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationInfo {
    pub pages_fetched: u32,
    pub total_articles_processed: usize,
    pub unique_clusters: usize,
}

/// Accumulated outcome of fetching 1..N clustered pages.
///
/// The metadata fields reflect what page 1 reported; `clusters` holds the
/// merged membership. Owned by a single search call, never shared.
#[derive(Debug, Clone)]
pub struct AggregatedResult {
    pub status: Option<String>,
    pub total_hits: u64,
    pub total_pages: u32,
    pub page_size: Option<u32>,
    pub clusters: HashMap<String, Cluster>,
    pub clusters_count: usize,
    pub pagination: PaginationInfo,
}

/// The single article chosen to stand in for a cluster.
#[derive(Debug, Clone)]
pub struct ClusterRepresentative {
    pub cluster_id: String,
    pub article: Article,
    /// 1-based position in the final quality ordering.
    pub rank: usize,
    pub cluster_size: usize,
    pub quality_score: f64,
}
