//! Static reference documents
//!
//! Served as MCP resources and embedded in the query-enhancement prompt.
//! The text is immutable data wired in at server construction rather than
//! ambient global state.

pub const QUERY_SYNTAX_URI: &str = "knowledge://query-syntax";
pub const WORKFLOW_URI: &str = "guide://workflow";

/// Guide text handed to the resource handlers and prompt builders.
#[derive(Debug, Clone, Copy)]
pub struct Guides {
    pub query_syntax: &'static str,
    pub workflow: &'static str,
}

impl Default for Guides {
    fn default() -> Self {
        Self {
            query_syntax: QUERY_SYNTAX_GUIDE,
            workflow: WORKFLOW_GUIDE,
        }
    }
}

const QUERY_SYNTAX_GUIDE: &str = r#"# Query Syntax Guide

The search tools forward the `q` parameter verbatim to the news API, which
supports an advanced boolean syntax:

## Operators
- `AND` - both terms must match. This is the default between plain words:
  `artificial intelligence` is the same as `artificial AND intelligence`.
- `OR` - either term matches: `layoffs OR downsizing`.
- `NOT` - exclude a term: `Tesla NOT SpaceX`.
- `NEAR` - terms must appear close together.

## Phrases and Wildcards
- Exact phrases use escaped double quotes: `\"supply chain\"`.
- `*` matches any suffix: `elect*` finds election, electoral, electorate.

## Grouping
- Parentheses group subexpressions: `(Apple OR Google) AND smartphone`.
- Put the most important terms first and avoid deeply nested logic.

## Examples
- `technology AND (layoffs OR \"job cuts\" OR downsizing) NOT sports`
- `\"real estate\" AND (market OR prices OR development)`
- `startup AND (funding OR investment) AND technolog*`

## Other Parameters
- `locations`: "City, State" or "State" strings, e.g.
  `["San Francisco, California", "Texas"]`.
- `theme`: one of Business, Economics, Entertainment, Finance, Health,
  Politics, Science, Sports, Tech, Crime, Lifestyle, Travel, General.
- `from_`: relative ("7 days ago") or absolute ("2024-01-01") start date,
  at most 30 days back.
- `page_size`: 1-1000 articles per page.
"#;

const WORKFLOW_GUIDE: &str = r#"# Workflow Guide

## Simple, direct lookups
1. Call `search_news` with your query.
2. Add `locations` if you have them, and a `theme` for broad filtering.
Good for known entities and quick checks.

## Enhanced relevance (recommended)
1. Run the `enhance-query` prompt with the user's input.
2. Review the enhanced boolean query it proposes.
3. Call `intelligent_search` with `enhanced_query` (and pass the user's
   input as `original_query` for transparency).
4. Iterate if results need refinement.
Clustering is decided automatically for broad or large searches; override
it with the `clustering` flag. `max_clusters` caps how many distinct
stories are shown and `max_pages` caps pagination.

## Complex research
1. Run the `analyze-search-intent` prompt to understand scope and urgency.
2. Run `enhance-query` with a domain hint.
3. Execute several `intelligent_search` calls with variations in time
   range and locations.
4. Use `get_latest_headlines` for breaking developments in a region.

## Reading clustered results
Each entry is one story: the highest-relevance article stands in for the
whole cluster, and the cluster size tells you how many sources covered it.
A high quality score means strong relevance, broad corroboration, or both.
"#;
