//! Prompt templates exposed to the agent host
//!
//! Pure text producers: simple string inputs plus the static guide text in,
//! MCP prompt messages out. The MCP protocol has no system role, so the
//! instruction block is emitted as the first user message.

use rmcp::model::{PromptMessage, PromptMessageRole};

pub const ENHANCE_QUERY: &str = "enhance-query";
pub const ANALYZE_SEARCH_INTENT: &str = "analyze-search-intent";

/// Messages asking an LLM to turn simple input into a boolean search query.
pub fn enhancement_messages(
    user_input: &str,
    domain_context: Option<&str>,
    location_focus: Option<&str>,
    query_syntax_guide: &str,
) -> Vec<PromptMessage> {
    let instructions = format!(
        "You are an expert news search query optimizer specializing in local news \
         discovery. Transform simple user input into a precise boolean search query.\n\n\
         QUERY SYNTAX REFERENCE:\n{query_syntax_guide}\n\
         ENHANCEMENT PRINCIPLES:\n\
         1. Expand the primary domain with relevant terminology.\n\
         2. Capture concept variations with OR groups, e.g. \
         layoffs OR \"job cuts\" OR downsizing.\n\
         3. Add industry context with AND groups.\n\
         4. Exclude noise with NOT, e.g. NOT (sports OR celebrity).\n\
         5. Target specific concepts with escaped exact phrases.\n\
         6. Use wildcards for term variations, e.g. regulat*.\n\
         7. Suggest \"City, State\" locations when the topic implies them.\n\n\
         OUTPUT REQUIREMENTS - provide a structured response with:\n\
         - Enhanced Query: [boolean query, quotes escaped for JSON]\n\
         - Suggested Locations: [\"City, State\" entries if relevant]\n\
         - Suggested Theme: [Business|Tech|Politics|Health|Finance|Crime|...]\n\
         - Detection Methods: [recommended detection methods]\n\
         - Rationale: [brief explanation of the enhancements]"
    );

    let task = format!(
        "Transform this search input into an advanced local news query:\n\n\
         USER INPUT: \"{user_input}\"\n\
         DOMAIN CONTEXT: {domain}\n\
         LOCATION FOCUS: {location}\n\n\
         Consider what synonyms belong in the query, what noise should be \
         excluded, which locations are most relevant, and what time \
         sensitivity is implied. Provide your enhancement in the structured \
         output format.",
        domain = domain_context.unwrap_or("Auto-detect from input"),
        location = location_focus.unwrap_or("Auto-detect or suggest relevant locations"),
    );

    vec![
        PromptMessage::new_text(PromptMessageRole::User, instructions),
        PromptMessage::new_text(PromptMessageRole::User, task),
    ]
}

/// Messages asking an LLM to classify a search input before querying.
pub fn intent_analysis_messages(user_input: &str) -> Vec<PromptMessage> {
    let instructions = "You are a search intent analysis expert for news discovery. \
         Analyze the user's input and report:\n\
         - Primary Domain: [Technology, Business, Politics, Health, ...]\n\
         - Key Entities: [companies, people, places, events]\n\
         - Intent Type: [information / monitoring / analysis / crisis / research]\n\
         - Time Sensitivity: [breaking / recent / trending / historical]\n\
         - Geographic Focus: [hyperlocal / local / regional / national / international]\n\
         - Information Depth: [headlines / summary / detailed / comprehensive]\n\
         - Search Complexity: [simple / moderate / complex]\n\
         - Recommended Approach: [which tools and prompts to use next]"
        .to_string();

    let task = format!(
        "Analyze this search input comprehensively:\n\n\
         INPUT: \"{user_input}\"\n\n\
         Consider what the user is really trying to discover, what related \
         aspects they may be missing, and how urgent the query is. The \
         analysis will inform query enhancement and search strategy."
    );

    vec![
        PromptMessage::new_text(PromptMessageRole::User, instructions),
        PromptMessage::new_text(PromptMessageRole::User, task),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhancement_embeds_guide_and_input() {
        let messages = enhancement_messages(
            "tech layoffs",
            Some("business"),
            None,
            "SYNTAX GUIDE BODY",
        );
        assert_eq!(messages.len(), 2);

        let rendered = serde_json::to_string(&messages).unwrap();
        assert!(rendered.contains("SYNTAX GUIDE BODY"));
        assert!(rendered.contains("tech layoffs"));
        assert!(rendered.contains("DOMAIN CONTEXT: business"));
        assert!(rendered.contains("Auto-detect or suggest relevant locations"));
    }

    #[test]
    fn intent_analysis_embeds_input() {
        let messages = intent_analysis_messages("housing market");
        let rendered = serde_json::to_string(&messages).unwrap();
        assert!(rendered.contains("housing market"));
        assert!(rendered.contains("Primary Domain"));
    }
}
