//! MCP Server implementation for local news search
//!
//! This module defines the main MCP server that exposes the search tools,
//! the static guide resources, and the prompt templates. Handler
//! implementations are in the handlers module.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, GetPromptRequestParam, GetPromptResult, ListPromptsResult,
        ListResourcesResult, PaginatedRequestParam, Prompt, PromptArgument, RawResource,
        ReadResourceRequestParam, ReadResourceResult, ResourceContents, ServerCapabilities,
        ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer,
};

use crate::client::{NewsApi, NewsApiClient};
use crate::config::Config;
use crate::guides::{Guides, QUERY_SYNTAX_URI, WORKFLOW_URI};
use crate::handlers;
use crate::params::{GetLatestHeadlinesParams, IntelligentSearchParams, SearchNewsParams};
use crate::prompts;

/// The Local News MCP Server
#[derive(Clone)]
pub struct LocalNewsMcpServer {
    api: Arc<dyn NewsApi>,
    config: Config,
    guides: Guides,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router - Each tool delegates to its handler
// ============================================================================

#[tool_router]
impl LocalNewsMcpServer {
    pub fn new(config: Config) -> Self {
        if config.api.token.as_deref().map_or(true, str::is_empty) {
            tracing::warn!("No API credential configured; every search will return no data");
        }
        let api: Arc<dyn NewsApi> = Arc::new(NewsApiClient::new(&config.api));
        Self::with_api(api, config)
    }

    /// Wire an explicit API implementation (tests use a scripted one).
    pub fn with_api(api: Arc<dyn NewsApi>, config: Config) -> Self {
        Self {
            api,
            config,
            guides: Guides::default(),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Search local news articles with a boolean query, optional locations, \
                       theme and date range. Returns a formatted text summary."
    )]
    async fn search_news(
        &self,
        Parameters(params): Parameters<SearchNewsParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::search_news(self.api.as_ref(), &self.config, params).await
    }

    #[tool(
        description = "Get the latest news headlines for specific locations. Returns a \
                       formatted text summary."
    )]
    async fn get_latest_headlines(
        &self,
        Parameters(params): Parameters<GetLatestHeadlinesParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_latest_headlines(self.api.as_ref(), &self.config, params).await
    }

    #[tool(
        description = "Enhanced search that paginates clustered results, deduplicates \
                       near-identical stories, and shows one representative article per \
                       story, ranked by a blended quality score. Knobs: max_clusters, \
                       max_pages, page_size, clustering, detection_methods."
    )]
    async fn intelligent_search(
        &self,
        Parameters(params): Parameters<IntelligentSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::intelligent_search(self.api.as_ref(), &self.config, params).await
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for LocalNewsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Local News MCP Server - search local news with boolean queries, fetch \
                 the latest headlines, and run clustered 'intelligent' searches that \
                 deduplicate near-identical stories. See the knowledge://query-syntax \
                 and guide://workflow resources, and use the enhance-query prompt to \
                 build better queries."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let mut query_syntax = RawResource::new(QUERY_SYNTAX_URI, "query-syntax");
        query_syntax.description =
            Some("Boolean query syntax reference for the search tools".into());
        query_syntax.mime_type = Some("text/markdown".into());

        let mut workflow = RawResource::new(WORKFLOW_URI, "workflow");
        workflow.description = Some("Recommended tool and prompt workflow".into());
        workflow.mime_type = Some("text/markdown".into());

        Ok(ListResourcesResult {
            meta: None,
            resources: vec![query_syntax.no_annotation(), workflow.no_annotation()],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = match request.uri.as_str() {
            QUERY_SYNTAX_URI => self.guides.query_syntax,
            WORKFLOW_URI => self.guides.workflow,
            other => {
                return Err(McpError::resource_not_found(
                    format!("Unknown resource: {}", other),
                    None,
                ))
            }
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult {
            meta: None,
            prompts: vec![
                Prompt::new(
                    prompts::ENHANCE_QUERY,
                    Some(
                        "Transform simple user input into a sophisticated boolean \
                         news search query",
                    ),
                    Some(vec![
                        prompt_argument("user_input", "The search input to enhance", true),
                        prompt_argument(
                            "domain_context",
                            "Optional domain hint (business, tech, healthcare, ...)",
                            false,
                        ),
                        prompt_argument("location_focus", "Optional location focus hint", false),
                    ]),
                ),
                Prompt::new(
                    prompts::ANALYZE_SEARCH_INTENT,
                    Some("Analyze a search input for domain, entities, intent, and scope"),
                    Some(vec![prompt_argument(
                        "user_input",
                        "The search input to analyze",
                        true,
                    )]),
                ),
            ],
            next_cursor: None,
        })
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        let arguments: serde_json::Map<String, serde_json::Value> =
            request.arguments.unwrap_or_default();
        let arg = |key: &str| arguments.get(key).and_then(|value| value.as_str());

        match request.name.as_str() {
            prompts::ENHANCE_QUERY => {
                let user_input = arg("user_input")
                    .ok_or_else(|| McpError::invalid_params("user_input is required", None))?;
                Ok(GetPromptResult {
                    description: Some("Query enhancement instructions".into()),
                    messages: prompts::enhancement_messages(
                        user_input,
                        arg("domain_context"),
                        arg("location_focus"),
                        self.guides.query_syntax,
                    ),
                })
            }
            prompts::ANALYZE_SEARCH_INTENT => {
                let user_input = arg("user_input")
                    .ok_or_else(|| McpError::invalid_params("user_input is required", None))?;
                Ok(GetPromptResult {
                    description: Some("Search intent analysis instructions".into()),
                    messages: prompts::intent_analysis_messages(user_input),
                })
            }
            other => Err(McpError::invalid_params(
                format!("Unknown prompt: {}", other),
                None,
            )),
        }
    }
}

fn prompt_argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        required: Some(required),
    }
}
