//! Utility functions for tools

use crate::error::AppError;
use crate::mcp::{McpResponse, ToolResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialize MCP tool arguments into the CLI argument struct
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, AppError> {
    serde_json::from_value(args).map_err(|e| AppError::InvalidInput(format!("Invalid arguments: {}", e)))
}

/// Wrap a tool outcome into a JSON-RPC response
pub fn respond(id: Option<Value>, result: Result<ToolResult, AppError>) -> McpResponse {
    match result.and_then(|content| serde_json::to_value(content).map_err(AppError::from)) {
        Ok(value) => McpResponse::success(id, value),
        Err(e) => McpResponse::error(id, e.error_code(), &e.message()),
    }
}
