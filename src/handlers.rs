//! Tool handlers
//!
//! Every handler returns a single formatted text block. Remote failures and
//! empty result sets never become MCP protocol errors; they render as text
//! the agent can read and act on.

use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;

use crate::client::NewsApi;
use crate::clustering::{
    extract_cluster_representatives, fetch_all_clustered_pages, should_use_clustering,
};
use crate::config::Config;
use crate::format::{
    format_clustered_results, format_error_message, format_headlines,
    format_search_results_enhanced, format_search_results_simple, EnhancementInfo,
};
use crate::params::{GetLatestHeadlinesParams, IntelligentSearchParams, SearchNewsParams};
use crate::types::{HeadlinesPayload, SearchPayload};

const NO_RESULTS_SUGGESTIONS: &[&str] = &[
    "Broaden the query with OR terms or wildcards",
    "Widen the date range (from_)",
    "Remove or widen the location filter",
];

fn text_block(text: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text.into())]))
}

pub async fn search_news(
    api: &dyn NewsApi,
    config: &Config,
    params: SearchNewsParams,
) -> Result<CallToolResult, McpError> {
    let payload = SearchPayload {
        q: params.q,
        locations: params.locations,
        theme: params.theme,
        detection_methods: None,
        from_: params.from_.unwrap_or_else(|| config.search.from_.clone()),
        page_size: params.page_size.unwrap_or(config.search.page_size),
        clustering: false,
        page: 1,
    };
    tracing::info!(q = %payload.q, page_size = payload.page_size, "searching news");

    // A failed request and a well-formed empty result read the same here;
    // the client already logged the failure reason.
    match api.search(&payload).await {
        Ok(response) if !response.articles.is_empty() => {
            text_block(format_search_results_simple(&response, &payload.q))
        }
        _ => text_block(format!("No articles found matching '{}'", payload.q)),
    }
}

pub async fn get_latest_headlines(
    api: &dyn NewsApi,
    config: &Config,
    params: GetLatestHeadlinesParams,
) -> Result<CallToolResult, McpError> {
    let locations = params.locations.unwrap_or_default();
    let payload = HeadlinesPayload {
        when: params.when.unwrap_or_else(|| config.search.when.clone()),
        locations: if locations.is_empty() {
            None
        } else {
            Some(locations.clone())
        },
        theme: params.theme,
        page_size: params.page_size.unwrap_or(config.search.page_size),
    };
    tracing::info!(when = %payload.when, "fetching latest headlines");

    let scope = if locations.is_empty() {
        "the requested locations".to_string()
    } else {
        locations.join(", ")
    };

    match api.latest_headlines(&payload).await {
        Ok(response) if !response.articles.is_empty() => {
            text_block(format_headlines(&response, &locations))
        }
        _ => text_block(format!("No headlines found for {}", scope)),
    }
}

pub async fn intelligent_search(
    api: &dyn NewsApi,
    config: &Config,
    params: IntelligentSearchParams,
) -> Result<CallToolResult, McpError> {
    // The heuristic sees the caller-requested page size, not the larger
    // page size used internally for clustered fetches.
    let use_clustering = params.clustering.unwrap_or_else(|| {
        should_use_clustering(
            &params.enhanced_query,
            params.page_size.unwrap_or(config.search.page_size),
        )
    });

    let enhancement = EnhancementInfo {
        original: params.original_query,
        enhanced: params.enhanced_query.clone(),
        detection_methods: params.detection_methods.clone(),
    };

    let payload = SearchPayload {
        q: params.enhanced_query,
        locations: params.locations,
        theme: params.theme,
        detection_methods: params.detection_methods,
        from_: params.from_.unwrap_or_else(|| config.search.from_.clone()),
        page_size: params.page_size.unwrap_or(if use_clustering {
            config.search.cluster_page_size
        } else {
            config.search.page_size
        }),
        clustering: use_clustering,
        page: 1,
    };

    if use_clustering {
        let max_pages = params.max_pages.unwrap_or(config.search.max_pages);
        let max_clusters = params.max_clusters.unwrap_or(config.search.max_clusters);
        tracing::info!(q = %payload.q, max_pages, max_clusters, "running clustered search");

        let Some(aggregated) = fetch_all_clustered_pages(api, &payload, max_pages).await else {
            return text_block(format_error_message(
                "No Results Found",
                &format!("No articles matched '{}'", payload.q),
                NO_RESULTS_SUGGESTIONS,
            ));
        };

        let representatives = extract_cluster_representatives(&aggregated, max_clusters);
        if representatives.is_empty() {
            return text_block(format_error_message(
                "Result Processing Failed",
                "The clustered response contained no usable articles",
                &["Retry with clustering disabled (clustering=false)"],
            ));
        }

        text_block(format_clustered_results(
            &aggregated,
            &representatives,
            &payload,
            Some(&enhancement),
        ))
    } else {
        tracing::info!(q = %payload.q, "running enhanced search");

        match api.search(&payload).await {
            Ok(response) if !response.articles.is_empty() => text_block(
                format_search_results_enhanced(&response, &payload, Some(&enhancement)),
            ),
            _ => text_block(format_error_message(
                "No Results Found",
                &format!("No articles matched '{}'", payload.q),
                NO_RESULTS_SUGGESTIONS,
            )),
        }
    }
}
