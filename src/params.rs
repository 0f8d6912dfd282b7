//! Tool parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchNewsParams {
    /// The search query
    #[schemars(
        description = "Search query. Supports boolean operators (AND, OR, NOT), \
                       escaped \"exact phrases\", wildcards (elect*) and parentheses; \
                       plain words are joined with AND. See knowledge://query-syntax"
    )]
    pub q: String,
    /// Location filters
    #[schemars(
        description = "Locations in \"City, State\" or \"State\" format, e.g. \
                       [\"San Francisco, California\", \"Texas\"]"
    )]
    pub locations: Option<Vec<String>>,
    /// Date-range start
    #[schemars(
        description = "Start date, e.g. \"7 days ago\" or \"2024-01-01\". Limited to \
                       30 days back (default: 7 days ago)"
    )]
    pub from_: Option<String>,
    /// Theme filter
    #[schemars(
        description = "Filter by theme (Business, Economics, Entertainment, Finance, \
                       Health, Politics, Science, Sports, Tech, Crime, Lifestyle, \
                       Travel, General)"
    )]
    pub theme: Option<String>,
    /// Result count
    #[schemars(description = "Number of articles to return, 1-1000 (default: 10)")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetLatestHeadlinesParams {
    /// Location filters
    #[schemars(
        description = "Locations in \"City, State\" or \"State\" format, e.g. \
                       [\"New York City, New York\"]"
    )]
    pub locations: Option<Vec<String>>,
    /// Lookback window
    #[schemars(
        description = "Time period, e.g. \"24h\" or \"7d\". Maximum 30d (default: 7d)"
    )]
    pub when: Option<String>,
    /// Theme filter
    #[schemars(
        description = "Filter by theme (Business, Economics, Entertainment, Finance, \
                       Health, Politics, Science, Sports, Tech, Crime, Lifestyle, \
                       Travel, General)"
    )]
    pub theme: Option<String>,
    /// Result count
    #[schemars(description = "Number of articles to return, 1-1000 (default: 10)")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct IntelligentSearchParams {
    /// The query to execute
    #[schemars(
        description = "Pre-structured boolean query to execute, typically produced by \
                       the enhance-query prompt"
    )]
    pub enhanced_query: String,
    /// Original user input, for transparency
    #[schemars(description = "The user's original input, echoed back in the results header")]
    pub original_query: Option<String>,
    /// Location filters
    #[schemars(
        description = "Locations in \"City, State\" or \"State\" format, e.g. \
                       [\"San Francisco, California\", \"Seattle, Washington\"]"
    )]
    pub locations: Option<Vec<String>>,
    /// Theme filter
    #[schemars(
        description = "Filter by theme (Business, Economics, Entertainment, Finance, \
                       Health, Politics, Science, Sports, Tech, Crime, Lifestyle, \
                       Travel, General)"
    )]
    pub theme: Option<String>,
    /// Date-range start
    #[schemars(
        description = "Start date, e.g. \"7 days ago\" or \"2024-01-01\". Limited to \
                       30 days back (default: 7 days ago)"
    )]
    pub from_: Option<String>,
    /// Articles per page
    #[schemars(
        description = "Articles requested per page, 1-1000 (default: 10, or 100 when \
                       clustering is active)"
    )]
    pub page_size: Option<u32>,
    /// Clustering override
    #[schemars(
        description = "Group near-identical stories into clusters. When omitted, a \
                       heuristic decides based on the query and page size"
    )]
    pub clustering: Option<bool>,
    /// Representative cap
    #[schemars(description = "Maximum cluster representatives to return (default: 10)")]
    pub max_clusters: Option<usize>,
    /// Pagination cap
    #[schemars(description = "Maximum result pages to fetch when clustering (default: 3)")]
    pub max_pages: Option<u32>,
    /// Location-provenance filter
    #[schemars(
        description = "Restrict location detection methods, e.g. \
                       [\"dedicated_source\", \"ai_extracted\"]"
    )]
    pub detection_methods: Option<Vec<String>>,
}
