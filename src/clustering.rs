//! Cluster aggregation, representative selection, and the clustering
//! default heuristic
//!
//! Clustered search responses split a story's articles across pages, so
//! naive concatenation duplicates articles and inflates apparent cluster
//! sizes. Merging here dedups by article URL within each cluster, and the
//! page loop stops as soon as the API reports it is out of pages or
//! returns an empty page.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::client::NewsApi;
use crate::types::{
    AggregatedResult, Article, Cluster, ClusterRepresentative, PaginationInfo, SearchPayload,
};

/// Weight of the top article's relevance in the cluster quality score.
const QUALITY_RELEVANCE_WEIGHT: f64 = 0.7;
/// Weight of corroboration breadth (log of cluster size).
const QUALITY_BREADTH_WEIGHT: f64 = 0.3;

/// Topics that tend to produce heavy duplicate coverage.
const BROAD_EVENT_TERMS: &[&str] = &[
    "layoffs",
    "merger",
    "acquisition",
    "funding",
    "investment",
    "policy",
    "regulation",
    "crisis",
    "shortage",
    "disruption",
    "fire",
    "flood",
    "earthquake",
    "storm",
    "accident",
    "breakthrough",
    "launch",
    "partnership",
    "deal",
];

/// Boolean operators are not meaningful search terms.
const OPERATOR_TOKENS: &[&str] = &["and", "or", "not", "near"];

// ============================================================================
// Pagination/Clustering Aggregator
// ============================================================================

/// Fetch up to `max_pages` of a clustered search and merge the cluster maps.
///
/// Pages are fetched strictly sequentially: the stop conditions depend on
/// what page 1 reported. Returns `None` when nothing could be fetched
/// (the first page failed or carried no clusters); callers present that
/// uniformly as "no results".
pub async fn fetch_all_clustered_pages(
    api: &dyn NewsApi,
    base_payload: &SearchPayload,
    max_pages: u32,
) -> Option<AggregatedResult> {
    if max_pages == 0 {
        return None;
    }

    // Page 1 carries the result-level metadata.
    let first = match api.clustered_search(&base_payload.with_page(1)).await {
        Ok(response) => response,
        Err(reason) => {
            tracing::warn!(page = 1, %reason, "stopping pagination: page fetch failed");
            return None;
        }
    };
    if first.clusters.is_empty() {
        tracing::debug!("first page returned no clusters");
        return None;
    }

    let reported_pages = first.total_pages;
    let first_articles = article_count(&first.clusters);
    let unique_clusters = first.clusters.len();
    let mut aggregated = AggregatedResult {
        status: first.status,
        total_hits: first.total_hits,
        total_pages: first.total_pages,
        page_size: first.page_size,
        clusters: first.clusters,
        clusters_count: unique_clusters,
        pagination: PaginationInfo {
            pages_fetched: 1,
            total_articles_processed: first_articles,
            unique_clusters,
        },
    };

    // Common case: everything fit on one page. No second request is made.
    if reported_pages <= 1 {
        return Some(aggregated);
    }

    for page in 2..=max_pages {
        let payload = base_payload.with_page(page);
        let response = match api.clustered_search(&payload).await {
            Ok(response) => response,
            Err(reason) => {
                tracing::warn!(page, %reason, "stopping pagination: page fetch failed");
                break;
            }
        };

        let page_articles = article_count(&response.clusters);
        tracing::debug!(page, page_articles, "processed clustered page");

        aggregated.pagination.pages_fetched += 1;
        aggregated.pagination.total_articles_processed += page_articles;

        if response.clusters.is_empty() {
            tracing::debug!(page, "stopping pagination: page returned no clusters");
            break;
        }

        merge_clusters(&mut aggregated.clusters, response.clusters);
        aggregated.clusters_count = aggregated.clusters.len();
        aggregated.pagination.unique_clusters = aggregated.clusters.len();

        // The API may report fewer pages than the requested cap.
        if page >= reported_pages {
            break;
        }
    }

    Some(aggregated)
}

fn article_count(clusters: &HashMap<String, Cluster>) -> usize {
    clusters
        .values()
        .map(|cluster| cluster.articles.len())
        .sum()
}

/// Merge `incoming` into `accumulator`, deduplicating by article URL
/// within each cluster. Unknown cluster ids are inserted wholesale.
fn merge_clusters(accumulator: &mut HashMap<String, Cluster>, incoming: HashMap<String, Cluster>) {
    for (cluster_id, cluster) in incoming {
        match accumulator.entry(cluster_id) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                let mut seen: HashSet<String> = existing
                    .articles
                    .iter()
                    .map(|article| article.link.clone())
                    .collect();
                for article in cluster.articles {
                    if seen.insert(article.link.clone()) {
                        existing.articles.push(article);
                    }
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(cluster);
            }
        }
    }
}

// ============================================================================
// Representative Selector
// ============================================================================

/// Rank clusters by quality and pick one representative article from each.
///
/// Quality blends the top article's relevance with corroboration breadth;
/// the logarithm keeps very large clusters from winning on size alone.
pub fn extract_cluster_representatives(
    aggregated: &AggregatedResult,
    max_representatives: usize,
) -> Vec<ClusterRepresentative> {
    let mut representatives: Vec<ClusterRepresentative> = aggregated
        .clusters
        .iter()
        .filter_map(|(cluster_id, cluster)| {
            let top = top_article(cluster)?;
            let cluster_size = cluster.articles.len();
            let quality_score = QUALITY_RELEVANCE_WEIGHT * top.relevance()
                + QUALITY_BREADTH_WEIGHT * (cluster_size as f64 + 1.0).ln();
            Some(ClusterRepresentative {
                cluster_id: cluster_id.clone(),
                article: top.clone(),
                rank: 0,
                cluster_size,
                quality_score,
            })
        })
        .collect();

    representatives.sort_by(|a, b| {
        b.quality_score
            .partial_cmp(&a.quality_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cluster_id.cmp(&b.cluster_id))
    });
    representatives.truncate(max_representatives);
    for (index, representative) in representatives.iter_mut().enumerate() {
        representative.rank = index + 1;
    }

    representatives
}

/// Highest-scoring article in the cluster. The first one encountered wins
/// ties, preserving the cluster's stored order.
fn top_article(cluster: &Cluster) -> Option<&Article> {
    let mut best: Option<&Article> = None;
    for article in &cluster.articles {
        match best {
            Some(current) if article.relevance() <= current.relevance() => {}
            _ => best = Some(article),
        }
    }
    best
}

// ============================================================================
// Cluster Analysis
// ============================================================================

/// Derived statistics over a merged cluster map.
#[derive(Debug, Clone)]
pub struct ClusterAnalysis {
    pub total_articles: usize,
    pub cluster_count: usize,
    pub average_cluster_size: f64,
    pub largest_cluster: usize,
    pub smallest_cluster: usize,
    /// Themes of each cluster's top article, most common first.
    pub top_themes: Vec<(String, usize)>,
    /// Locations of each cluster's top article, most common first.
    pub top_locations: Vec<(String, usize)>,
}

/// Summarize cluster composition: the size distribution plus the themes and
/// locations carried by each cluster's top article.
pub fn analyze_clusters(aggregated: &AggregatedResult) -> ClusterAnalysis {
    let mut theme_counts: HashMap<String, usize> = HashMap::new();
    let mut location_counts: HashMap<String, usize> = HashMap::new();
    let mut total_articles = 0;
    let mut largest = 0usize;
    let mut smallest = usize::MAX;

    for cluster in aggregated.clusters.values() {
        let size = cluster.articles.len();
        total_articles += size;
        largest = largest.max(size);
        smallest = smallest.min(size);

        let Some(top) = top_article(cluster) else {
            continue;
        };
        if let Some(nlp) = &top.nlp {
            for theme in &nlp.theme {
                *theme_counts.entry(theme.clone()).or_default() += 1;
            }
        }
        for location in &top.locations {
            if let Some(name) = &location.name {
                *location_counts.entry(name.clone()).or_default() += 1;
            }
        }
    }

    let cluster_count = aggregated.clusters.len();
    ClusterAnalysis {
        total_articles,
        cluster_count,
        average_cluster_size: if cluster_count == 0 {
            0.0
        } else {
            total_articles as f64 / cluster_count as f64
        },
        largest_cluster: largest,
        smallest_cluster: if cluster_count == 0 { 0 } else { smallest },
        top_themes: top_counts(theme_counts),
        top_locations: top_counts(location_counts),
    }
}

/// Most common entries first, capped at five. Ties break on the name so
/// repeated calls report the same ordering.
fn top_counts(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(5);
    entries
}

// ============================================================================
// Clustering Heuristic
// ============================================================================

/// Guess whether clustering should be enabled when the caller did not say.
///
/// Advisory only; an explicit `clustering` flag always wins. Large result
/// sets, broad-event topics, and short queries all tend to return many
/// near-duplicate hits.
pub fn should_use_clustering(query: &str, page_size: u32) -> bool {
    if page_size >= 50 {
        return true;
    }

    let query_lower = query.to_lowercase();
    if BROAD_EVENT_TERMS
        .iter()
        .any(|term| query_lower.contains(term))
    {
        return true;
    }

    let meaningful_terms = query
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|token| !token.is_empty())
        .filter(|token| {
            let token = token.to_ascii_lowercase();
            !OPERATOR_TOKENS.contains(&token.as_str())
        })
        .count();

    meaningful_terms <= 3
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::client::{FetchFailure, NewsApi};
    use crate::types::{ArticleResponse, ClusteredResponse, HeadlinesPayload};

    /// Serves a scripted sequence of clustered pages and counts calls.
    struct ScriptedApi {
        pages: Mutex<Vec<Result<ClusteredResponse, FetchFailure>>>,
        calls: AtomicU32,
    }

    impl ScriptedApi {
        fn new(pages: Vec<Result<ClusteredResponse, FetchFailure>>) -> Self {
            Self {
                pages: Mutex::new(pages),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NewsApi for ScriptedApi {
        async fn clustered_search(
            &self,
            _payload: &SearchPayload,
        ) -> Result<ClusteredResponse, FetchFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut pages = self.pages.lock().unwrap();
            assert!(
                !pages.is_empty(),
                "clustered_search called after the scripted pages ran out"
            );
            pages.remove(0)
        }

        async fn search(&self, _payload: &SearchPayload) -> Result<ArticleResponse, FetchFailure> {
            unreachable!("not scripted")
        }

        async fn latest_headlines(
            &self,
            _payload: &HeadlinesPayload,
        ) -> Result<ArticleResponse, FetchFailure> {
            unreachable!("not scripted")
        }
    }

    fn article(link: &str, score: f64) -> Article {
        Article {
            title: Some(format!("Article at {link}")),
            link: link.to_string(),
            score: Some(score),
            ..Article::default()
        }
    }

    fn page(total_pages: u32, clusters: Vec<(&str, Vec<Article>)>) -> ClusteredResponse {
        let total_hits = clusters
            .iter()
            .map(|(_, articles)| articles.len() as u64)
            .sum();
        ClusteredResponse {
            status: Some("ok".to_string()),
            total_hits,
            total_pages,
            page_size: Some(100),
            clusters: clusters
                .into_iter()
                .map(|(id, articles)| (id.to_string(), Cluster { articles }))
                .collect(),
        }
    }

    fn base_payload() -> SearchPayload {
        SearchPayload {
            q: "tech layoffs".to_string(),
            locations: None,
            theme: None,
            detection_methods: None,
            from_: "7 days ago".to_string(),
            page_size: 1000,
            clustering: true,
            page: 1,
        }
    }

    fn aggregated(clusters: Vec<(&str, Vec<Article>)>) -> AggregatedResult {
        let total_articles: usize = clusters.iter().map(|(_, articles)| articles.len()).sum();
        let clusters: HashMap<String, Cluster> = clusters
            .into_iter()
            .map(|(id, articles)| (id.to_string(), Cluster { articles }))
            .collect();
        AggregatedResult {
            status: Some("ok".to_string()),
            total_hits: total_articles as u64,
            total_pages: 1,
            page_size: Some(100),
            clusters_count: clusters.len(),
            pagination: PaginationInfo {
                pages_fetched: 1,
                total_articles_processed: total_articles,
                unique_clusters: clusters.len(),
            },
            clusters,
        }
    }

    // ------------------------------------------------------------------
    // Aggregator
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn single_page_short_circuits_without_second_call() {
        let api = ScriptedApi::new(vec![Ok(page(
            1,
            vec![
                ("c1", vec![article("u1", 0.9)]),
                ("c2", vec![article("u2", 0.5)]),
            ],
        ))]);

        let result = fetch_all_clustered_pages(&api, &base_payload(), 5)
            .await
            .unwrap();

        assert_eq!(api.calls(), 1);
        assert_eq!(result.clusters_count, 2);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.pagination.pages_fetched, 1);
        assert_eq!(result.pagination.total_articles_processed, 2);
    }

    #[tokio::test]
    async fn merges_pages_and_dedups_by_url() {
        // Page 2 repeats u1 inside the same cluster and adds u2; page 3 is
        // the empty page that ends the results.
        let api = ScriptedApi::new(vec![
            Ok(page(3, vec![("c1", vec![article("u1", 0.9)])])),
            Ok(page(
                3,
                vec![("c1", vec![article("u1", 0.9), article("u2", 0.4)])],
            )),
            Ok(page(3, vec![])),
        ]);

        let result = fetch_all_clustered_pages(&api, &base_payload(), 5)
            .await
            .unwrap();

        assert_eq!(api.calls(), 3);
        assert_eq!(result.pagination.pages_fetched, 3);
        let links: Vec<&str> = result.clusters["c1"]
            .articles
            .iter()
            .map(|a| a.link.as_str())
            .collect();
        assert_eq!(links, vec!["u1", "u2"]);
    }

    #[tokio::test]
    async fn merge_is_idempotent() {
        let content = || {
            vec![(
                "c1",
                vec![article("u1", 0.9), article("u2", 0.4)],
            )]
        };
        let api = ScriptedApi::new(vec![Ok(page(2, content())), Ok(page(2, content()))]);

        let result = fetch_all_clustered_pages(&api, &base_payload(), 5)
            .await
            .unwrap();

        assert_eq!(result.clusters["c1"].articles.len(), 2);
    }

    #[tokio::test]
    async fn stops_at_reported_total_pages() {
        let api = ScriptedApi::new(vec![
            Ok(page(2, vec![("c1", vec![article("u1", 0.9)])])),
            Ok(page(2, vec![("c2", vec![article("u2", 0.8)])])),
        ]);

        let result = fetch_all_clustered_pages(&api, &base_payload(), 5)
            .await
            .unwrap();

        assert_eq!(api.calls(), 2);
        assert_eq!(result.clusters_count, 2);
        assert_eq!(result.pagination.unique_clusters, 2);
    }

    #[tokio::test]
    async fn returns_none_when_first_page_fails() {
        let api = ScriptedApi::new(vec![Err(FetchFailure::Transport("connection reset".into()))]);

        assert!(fetch_all_clustered_pages(&api, &base_payload(), 3)
            .await
            .is_none());
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn returns_none_when_first_page_has_no_clusters() {
        let api = ScriptedApi::new(vec![Ok(page(4, vec![]))]);

        assert!(fetch_all_clustered_pages(&api, &base_payload(), 3)
            .await
            .is_none());
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn keeps_partial_aggregate_when_a_later_page_fails() {
        let api = ScriptedApi::new(vec![
            Ok(page(3, vec![("c1", vec![article("u1", 0.9)])])),
            Err(FetchFailure::Timeout(30)),
        ]);

        let result = fetch_all_clustered_pages(&api, &base_payload(), 5)
            .await
            .unwrap();

        assert_eq!(api.calls(), 2);
        assert_eq!(result.pagination.pages_fetched, 1);
        assert_eq!(result.clusters_count, 1);
    }

    #[tokio::test]
    async fn no_cluster_contains_duplicate_urls() {
        let api = ScriptedApi::new(vec![
            Ok(page(
                3,
                vec![
                    ("c1", vec![article("u1", 0.9), article("u2", 0.8)]),
                    ("c2", vec![article("u3", 0.7)]),
                ],
            )),
            Ok(page(
                3,
                vec![
                    ("c1", vec![article("u2", 0.8), article("u4", 0.6)]),
                    ("c3", vec![article("u3", 0.7)]),
                ],
            )),
            Ok(page(3, vec![])),
        ]);

        let result = fetch_all_clustered_pages(&api, &base_payload(), 5)
            .await
            .unwrap();

        for cluster in result.clusters.values() {
            let unique: HashSet<&str> = cluster
                .articles
                .iter()
                .map(|a| a.link.as_str())
                .collect();
            assert_eq!(unique.len(), cluster.articles.len());
        }
        // Cross-cluster duplicates (u3 in c2 and c3) are accepted as-is.
        assert_eq!(result.clusters_count, 3);
    }

    // ------------------------------------------------------------------
    // Representative Selector
    // ------------------------------------------------------------------

    #[test]
    fn caps_representatives_at_requested_count() {
        let agg = aggregated(vec![
            ("c1", vec![article("u1", 0.9)]),
            ("c2", vec![article("u2", 0.8)]),
            ("c3", vec![article("u3", 0.7)]),
            ("c4", vec![article("u4", 0.6)]),
            ("c5", vec![article("u5", 0.5)]),
        ]);

        assert_eq!(extract_cluster_representatives(&agg, 3).len(), 3);
        // Fewer clusters than the cap returns exactly the cluster count.
        assert_eq!(extract_cluster_representatives(&agg, 10).len(), 5);
    }

    #[test]
    fn orders_by_quality_descending_with_ranks() {
        let agg = aggregated(vec![
            ("c1", vec![article("u1", 0.2)]),
            ("c2", vec![article("u2", 0.9)]),
            ("c3", vec![article("u3", 0.5)]),
        ]);

        let representatives = extract_cluster_representatives(&agg, 10);

        for pair in representatives.windows(2) {
            assert!(pair[0].quality_score >= pair[1].quality_score);
        }
        let ranks: Vec<usize> = representatives.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(representatives[0].cluster_id, "c2");
    }

    #[test]
    fn breadth_can_outrank_peak_relevance() {
        let big: Vec<Article> = (0..10)
            .map(|i| article(&format!("big-{i}"), 0.5))
            .collect();
        let agg = aggregated(vec![("small", vec![article("u1", 0.9)]), ("big", big)]);

        let representatives = extract_cluster_representatives(&agg, 10);

        // 0.7*0.5 + 0.3*ln(11) = 1.069 beats 0.7*0.9 + 0.3*ln(2) = 0.838.
        assert_eq!(representatives[0].cluster_id, "big");
        assert!((representatives[0].quality_score - 1.0694).abs() < 1e-3);
        assert!((representatives[1].quality_score - 0.8379).abs() < 1e-3);
    }

    #[test]
    fn first_article_wins_score_ties() {
        let agg = aggregated(vec![(
            "c1",
            vec![article("first", 0.7), article("second", 0.7)],
        )]);

        let representatives = extract_cluster_representatives(&agg, 1);

        assert_eq!(representatives[0].article.link, "first");
    }

    #[test]
    fn missing_scores_default_to_zero() {
        let unscored = Article {
            link: "u1".to_string(),
            ..Article::default()
        };
        let agg = aggregated(vec![("c1", vec![unscored])]);

        let representatives = extract_cluster_representatives(&agg, 1);

        let expected = 0.3 * 2.0_f64.ln();
        assert!((representatives[0].quality_score - expected).abs() < 1e-9);
    }

    #[test]
    fn skips_empty_clusters() {
        let agg = aggregated(vec![("empty", vec![]), ("c1", vec![article("u1", 0.4)])]);

        let representatives = extract_cluster_representatives(&agg, 10);

        assert_eq!(representatives.len(), 1);
        assert_eq!(representatives[0].cluster_id, "c1");
        assert_eq!(representatives[0].cluster_size, 1);
    }

    // ------------------------------------------------------------------
    // Cluster Analysis
    // ------------------------------------------------------------------

    #[test]
    fn analysis_summarizes_size_distribution() {
        let agg = aggregated(vec![
            ("c1", vec![article("u1", 0.9), article("u2", 0.8)]),
            ("c2", vec![article("u3", 0.7)]),
            (
                "c3",
                vec![article("u4", 0.6), article("u5", 0.5), article("u6", 0.4)],
            ),
        ]);

        let analysis = analyze_clusters(&agg);

        assert_eq!(analysis.total_articles, 6);
        assert_eq!(analysis.cluster_count, 3);
        assert!((analysis.average_cluster_size - 2.0).abs() < 1e-9);
        assert_eq!(analysis.largest_cluster, 3);
        assert_eq!(analysis.smallest_cluster, 1);
    }

    #[test]
    fn analysis_counts_top_article_themes_and_locations() {
        let tagged = |link: &str, score: f64, theme: &str, place: &str| Article {
            nlp: Some(crate::types::NlpAnnotations {
                theme: vec![theme.to_string()],
                ..Default::default()
            }),
            locations: vec![crate::types::ArticleLocation {
                name: Some(place.to_string()),
                detection_methods: vec![],
            }],
            ..article(link, score)
        };

        let agg = aggregated(vec![
            // Only the top article (u1) contributes its tags.
            (
                "c1",
                vec![
                    tagged("u1", 0.9, "Tech", "San Francisco, California"),
                    tagged("u2", 0.5, "Sports", "Austin, Texas"),
                ],
            ),
            ("c2", vec![tagged("u3", 0.8, "Tech", "Seattle, Washington")]),
            (
                "c3",
                vec![tagged("u4", 0.7, "Business", "San Francisco, California")],
            ),
        ]);

        let analysis = analyze_clusters(&agg);

        assert_eq!(
            analysis.top_themes,
            vec![("Tech".to_string(), 2), ("Business".to_string(), 1)]
        );
        assert_eq!(analysis.top_locations[0].0, "San Francisco, California");
        assert_eq!(analysis.top_locations[0].1, 2);
    }

    // ------------------------------------------------------------------
    // Clustering Heuristic
    // ------------------------------------------------------------------

    #[test]
    fn large_pages_always_cluster() {
        let query = "municipal water infrastructure bond measure vote";
        assert!(!should_use_clustering(query, 49));
        assert!(should_use_clustering(query, 50));
    }

    #[test]
    fn broad_event_terms_cluster() {
        assert!(should_use_clustering(
            "hospital merger antitrust regulatory review proceedings",
            10
        ));
    }

    #[test]
    fn short_queries_cluster() {
        assert!(should_use_clustering("school board elections", 10));
    }

    #[test]
    fn operator_tokens_do_not_count_as_terms() {
        // housing, zoning, rentals: three meaningful terms once the
        // operators are stripped.
        assert!(should_use_clustering("housing AND zoning NOT rentals", 10));
    }

    #[test]
    fn specific_multi_term_queries_do_not_cluster() {
        assert!(!should_use_clustering(
            "downtown transit corridor environmental review hearing",
            10
        ));
    }
}
