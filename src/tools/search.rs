//! Search tool implementation
//!
//! Implements the `search(query)` MCP tool

use super::util::{parse_args, respond};
use super::ToolContext;
use crate::cli::SearchArgs;
use crate::error::{validate_query, AppError};
use crate::mcp::{McpResponse, ToolResult};
use crate::page::SearchPage;
use crate::search::HighlightStyle;
use serde_json::Value;
use tracing::debug;

/// Handle search tool
pub fn handle_search(id: Option<Value>, args: Value, tools: &ToolContext) -> McpResponse {
    respond(id, parse_args(args).and_then(|args| execute_search(args, tools)))
}

/// Shared implementation for search (used by MCP and CLI)
pub fn execute_search(search_args: SearchArgs, tools: &ToolContext) -> Result<ToolResult, AppError> {
    validate_query(&search_args.query)?;
    debug!("Search request, query: '{}'", search_args.query);

    let mut page = SearchPage::with_corpus(tools.corpus.clone(), tools.highlighter());
    page.set_query(search_args.query);
    let view = page.view();

    let text = match tools.style {
        HighlightStyle::Markdown => view.render_markdown(),
        HighlightStyle::Html => view.render_html(),
    };

    Ok(ToolResult::with_metadata(text, serde_json::to_value(&view)?))
}
