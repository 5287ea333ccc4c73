//! Context tool implementation
//!
//! Implements the `context(question, top?, budget?)` MCP tool

use super::util::{parse_args, respond};
use super::ToolContext;
use crate::cli::ContextArgs;
use crate::context::{ContextOptions, ContextRetriever};
use crate::error::{validate_query, AppError};
use crate::mcp::{McpResponse, ToolResult};
use serde_json::Value;
use tracing::info;

/// Handle context tool
pub fn handle_context(id: Option<Value>, args: Value, tools: &ToolContext) -> McpResponse {
    respond(id, parse_args(args).and_then(|args| execute_context(args, tools)))
}

/// Shared implementation for context retrieval (used by MCP and CLI)
pub fn execute_context(context_args: ContextArgs, tools: &ToolContext) -> Result<ToolResult, AppError> {
    validate_query(&context_args.question)?;

    let defaults = ContextOptions::default();
    let options = ContextOptions {
        top_k: context_args.top.unwrap_or(defaults.top_k),
        char_budget: context_args.budget.unwrap_or(defaults.char_budget),
    };

    let mut retriever = ContextRetriever::new(options);
    let context = retriever.retrieve(&tools.corpus, &context_args.question);
    info!(
        "Retrieved {} sections ({} chars) for question",
        context.sections.len(),
        context.total_chars()
    );

    let text = if context.is_empty() {
        format!(
            "No relevant documentation sections found for \"{}\".",
            context.question
        )
    } else {
        context.render_text()
    };

    Ok(ToolResult::with_metadata(text, serde_json::to_value(&context)?))
}
