//! Rendering of search results into display text
//!
//! Tools return a single formatted text block rather than structured data,
//! so everything the agent sees is produced here.

use crate::clustering::analyze_clusters;
use crate::types::{AggregatedResult, Article, ArticleResponse, ClusterRepresentative, SearchPayload};

const BANNER_WIDTH: usize = 78;

/// Enhancement transparency data echoed back to the caller.
#[derive(Debug, Clone, Default)]
pub struct EnhancementInfo {
    pub original: Option<String>,
    pub enhanced: String,
    pub detection_methods: Option<Vec<String>>,
}

fn banner(title: &str) -> String {
    format!(
        "╔{line}╗\n║{title:^width$}║\n╚{line}╝\n",
        line = "═".repeat(BANNER_WIDTH),
        title = title,
        width = BANNER_WIDTH,
    )
}

fn rule() -> String {
    "─".repeat(80)
}

/// NLP summary when present, otherwise the plain description.
fn article_summary(article: &Article) -> &str {
    article
        .nlp
        .as_ref()
        .and_then(|nlp| nlp.summary.as_deref())
        .filter(|summary| !summary.is_empty())
        .or(article
            .description
            .as_deref()
            .filter(|description| !description.is_empty()))
        .unwrap_or("No description available")
}

fn display_link(article: &Article) -> &str {
    if article.link.is_empty() {
        "No link"
    } else {
        &article.link
    }
}

fn sentiment_label(score: f64) -> &'static str {
    if score > 0.1 {
        "positive"
    } else if score < -0.1 {
        "negative"
    } else {
        "neutral"
    }
}

// ============================================================================
// Article Blocks
// ============================================================================

/// Compact article block used by search_news and get_latest_headlines.
pub fn format_article_simple(article: &Article) -> String {
    let mut block = String::new();
    block.push_str(&format!(
        "Title: {}\n",
        article.title.as_deref().unwrap_or("No title")
    ));
    block.push_str(&format!(
        "Source: {}\n",
        article.domain_url.as_deref().unwrap_or("Unknown source")
    ));
    block.push_str(&format!(
        "Published: {}\n",
        article.published_date.as_deref().unwrap_or("Unknown date")
    ));

    let names: Vec<&str> = article
        .locations
        .iter()
        .map(|location| location.name.as_deref().unwrap_or("Unknown"))
        .collect();
    if !names.is_empty() {
        block.push_str(&format!("Locations: {}\n", names.join("; ")));
    }

    block.push_str(&format!("Summary: {}\n", article_summary(article)));
    block.push_str(&format!("URL: {}", display_link(article)));
    block
}

/// Article block with detection methods, sentiment, and theme metadata.
pub fn format_article_enhanced(article: &Article) -> String {
    let mut block = String::new();
    block.push_str(&format!(
        "Title: {}\n",
        article.title.as_deref().unwrap_or("No title")
    ));
    block.push_str(&format!(
        "Source: {}\n",
        article.domain_url.as_deref().unwrap_or("Unknown source")
    ));
    block.push_str(&format!(
        "Published: {}\n",
        article.published_date.as_deref().unwrap_or("Unknown date")
    ));

    if !article.locations.is_empty() {
        let details: Vec<String> = article
            .locations
            .iter()
            .map(|location| {
                let name = location.name.as_deref().unwrap_or("Unknown");
                if location.detection_methods.is_empty() {
                    name.to_string()
                } else {
                    format!("{} ({})", name, location.detection_methods.join(", "))
                }
            })
            .collect();
        block.push_str(&format!("Locations: {}\n", details.join("; ")));
    }

    if let Some(sentiment) = article.nlp.as_ref().and_then(|nlp| nlp.sentiment.as_ref()) {
        block.push_str(&format!(
            "Sentiment: {} title, {} content\n",
            sentiment_label(sentiment.title),
            sentiment_label(sentiment.content)
        ));
    }

    if let Some(themes) = article
        .nlp
        .as_ref()
        .map(|nlp| &nlp.theme)
        .filter(|themes| !themes.is_empty())
    {
        block.push_str(&format!("Themes: {}\n", themes.join(", ")));
    }

    block.push_str(&format!("Summary: {}\n", article_summary(article)));
    block.push_str(&format!("URL: {}", display_link(article)));
    block
}

// ============================================================================
// Result Listings
// ============================================================================

/// Plain listing used by the search_news tool.
pub fn format_search_results_simple(response: &ArticleResponse, query: &str) -> String {
    let blocks: Vec<String> = response.articles.iter().map(format_article_simple).collect();
    format!(
        "Found {} articles matching '{}'. Showing top {}:\n\n{}",
        response.total_hits,
        query,
        response.articles.len(),
        blocks.join("\n---\n")
    )
}

/// Plain listing used by the get_latest_headlines tool.
pub fn format_headlines(response: &ArticleResponse, locations: &[String]) -> String {
    let scope = if locations.is_empty() {
        String::new()
    } else {
        format!(" for {}", locations.join(", "))
    };
    let blocks: Vec<String> = response.articles.iter().map(format_article_simple).collect();
    format!(
        "Latest headlines{} (found {}, showing {}):\n\n{}",
        scope,
        response.total_hits,
        response.articles.len(),
        blocks.join("\n---\n")
    )
}

fn enhancement_section(info: &EnhancementInfo) -> String {
    let mut section = banner("QUERY ENHANCEMENT");
    if let Some(original) = &info.original {
        section.push_str(&format!("Original Input: {}\n", original));
    }
    section.push_str(&format!("Enhanced Query: {}\n", info.enhanced));
    if let Some(methods) = &info.detection_methods {
        section.push_str(&format!("Detection Methods: {}\n", methods.join(", ")));
    }
    section.push('\n');
    section
}

fn search_echo(payload: &SearchPayload) -> String {
    let mut echo = format!("Query: {}\n", payload.q);
    if let Some(locations) = &payload.locations {
        echo.push_str(&format!("Locations: {}\n", locations.join(", ")));
    }
    if let Some(theme) = &payload.theme {
        echo.push_str(&format!("Theme Filter: {}\n", theme));
    }
    echo.push_str(&format!("Time Range: {}\n", payload.from_));
    echo
}

/// Full listing with banners and metadata, used by the non-clustered path
/// of intelligent_search.
pub fn format_search_results_enhanced(
    response: &ArticleResponse,
    payload: &SearchPayload,
    enhancement: Option<&EnhancementInfo>,
) -> String {
    let mut out = String::new();
    if let Some(info) = enhancement {
        out.push_str(&enhancement_section(info));
    }

    out.push_str(&banner("SEARCH RESULTS"));
    out.push_str(&format!("Found: {} total articles\n", response.total_hits));
    out.push_str(&format!(
        "Showing: {} articles (page {} of {})\n",
        response.articles.len(),
        response.page.unwrap_or(1),
        response.total_pages.max(1)
    ));
    out.push_str(&search_echo(payload));
    out.push('\n');

    out.push_str(&banner("ARTICLES"));
    out.push('\n');
    let total = response.articles.len();
    let blocks: Vec<String> = response
        .articles
        .iter()
        .enumerate()
        .map(|(index, article)| {
            format!(
                "[{}/{}] {}\n{}",
                index + 1,
                total,
                rule(),
                format_article_enhanced(article)
            )
        })
        .collect();
    out.push_str(&blocks.join("\n\n"));

    out.push_str(&format!("\n\n{}\n", rule()));
    out.push_str(
        "Tips: Use the 'enhance-query' prompt for better results | \
         Check location detection methods for confidence\n",
    );
    out
}

/// Clustered listing showing one representative article per story.
pub fn format_clustered_results(
    aggregated: &AggregatedResult,
    representatives: &[ClusterRepresentative],
    payload: &SearchPayload,
    enhancement: Option<&EnhancementInfo>,
) -> String {
    let mut out = String::new();
    if let Some(info) = enhancement {
        out.push_str(&enhancement_section(info));
    }

    out.push_str(&banner("CLUSTERED RESULTS"));
    out.push_str(&format!(
        "Found: {} total articles across {} clusters\n",
        aggregated.total_hits, aggregated.clusters_count
    ));
    out.push_str(&format!(
        "Showing: Top article from {} clusters (diverse stories)\n",
        representatives.len()
    ));
    out.push_str(&format!(
        "Pages fetched: {} ({} articles processed)\n",
        aggregated.pagination.pages_fetched, aggregated.pagination.total_articles_processed
    ));

    let analysis = analyze_clusters(aggregated);
    out.push_str(&format!(
        "Cluster sizes: {:.1} average (largest {}, smallest {})\n",
        analysis.average_cluster_size, analysis.largest_cluster, analysis.smallest_cluster
    ));
    if !analysis.top_themes.is_empty() {
        let themes: Vec<String> = analysis
            .top_themes
            .iter()
            .map(|(theme, count)| format!("{} ({})", theme, count))
            .collect();
        out.push_str(&format!("Top themes: {}\n", themes.join(", ")));
    }

    out.push_str(&search_echo(payload));
    out.push('\n');

    out.push_str(&banner("CLUSTER REPRESENTATIVES"));
    out.push('\n');
    let total = representatives.len();
    let blocks: Vec<String> = representatives
        .iter()
        .map(|representative| {
            format!(
                "[Cluster {}/{}] ID: {} | Size: {} articles | Quality: {:.3}\n{}\n{}",
                representative.rank,
                total,
                representative.cluster_id,
                representative.cluster_size,
                representative.quality_score,
                rule(),
                format_article_enhanced(&representative.article)
            )
        })
        .collect();
    out.push_str(&blocks.join("\n\n"));

    out.push_str(&format!("\n\n{}\n", rule()));
    out.push_str(
        "Clustering enabled: each result represents a different story/event\n\
         Tips: Use the 'enhance-query' prompt for better results | \
         Clustering reduces duplicate coverage\n",
    );
    out
}

/// Error block shown in place of results. Always plain text; tool calls
/// never surface these as protocol errors.
pub fn format_error_message(error_type: &str, details: &str, suggestions: &[&str]) -> String {
    let mut out = banner("ERROR");
    out.push_str(&format!("Error Type: {}\n", error_type));
    out.push_str(&format!("Details: {}\n\n", details));

    if !suggestions.is_empty() {
        out.push_str("Suggestions:\n");
        for suggestion in suggestions {
            out.push_str(&format!("  - {}\n", suggestion));
        }
        out.push('\n');
    }

    out.push_str("See the 'guide://workflow' resource for usage help\n");
    out.push_str(&rule());
    out
}
