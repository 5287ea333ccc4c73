//! Document tool implementation
//!
//! Implements the `document(id, highlight?)` MCP tool

use super::util::{parse_args, respond};
use super::ToolContext;
use crate::cli::DocArgs;
use crate::docs::{find_document, render_document};
use crate::error::{validate_query, AppError};
use crate::mcp::{McpResponse, ToolResult};
use crate::search::HighlightStyle;
use serde_json::Value;
use tracing::debug;

/// Handle document tool
pub fn handle_document(id: Option<Value>, args: Value, tools: &ToolContext) -> McpResponse {
    respond(id, parse_args(args).and_then(|args| execute_document(args, tools)))
}

/// Shared implementation for document (used by MCP and CLI)
pub fn execute_document(doc_args: DocArgs, tools: &ToolContext) -> Result<ToolResult, AppError> {
    if let Some(term) = &doc_args.highlight {
        validate_query(term)?;
    }

    let doc = find_document(&tools.corpus, &doc_args.id)?;
    let rendered = render_document(doc, doc_args.highlight.as_deref(), &tools.highlighter());
    debug!(
        "Rendered document '{}' with {} highlighted matches",
        rendered.id, rendered.match_count
    );

    let text = match tools.style {
        HighlightStyle::Markdown => rendered.to_markdown(),
        HighlightStyle::Html => rendered.to_html(),
    };

    let metadata = serde_json::json!({
        "id": rendered.id,
        "title": rendered.title,
        "url": rendered.url,
        "matchCount": rendered.match_count,
        "firstMatch": rendered.first_match,
    });

    Ok(ToolResult::with_metadata(text, metadata))
}
