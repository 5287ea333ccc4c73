//! Error types and handling for the documentation search service

use serde::Serialize;
use thiserror::Error;

/// Application error types shared by the CLI, MCP and HTTP surfaces
#[derive(Debug, Error, Serialize)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Corpus load failed: {0}")]
    CorpusLoad(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the error code for MCP responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::NotFound(_) => "not_found",
            AppError::CorpusLoad(_) => "corpus_load_failed",
            AppError::Network(_) => "network_error",
            AppError::Timeout(_) => "timeout",
            AppError::Io(_) => "io_error",
            AppError::Parse(_) => "parse_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Process exit code used by CLI mode
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidInput(_) | AppError::Parse(_) => 1,
            AppError::CorpusLoad(_) | AppError::Network(_) => 2,
            AppError::NotFound(_) => 3,
            AppError::Timeout(_) => 4,
            AppError::Io(_) | AppError::Internal(_) => 5,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_status() {
            AppError::Network(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

/// Reject queries that cannot be meaningfully handled by any surface
pub fn validate_query(query: &str) -> Result<(), AppError> {
    if query.chars().count() > 500 {
        return Err(AppError::InvalidInput(
            "Query too long, maximum 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Document ids are short slugs: lowercase ascii, digits, '-' and '_'
pub fn validate_doc_id(id: &str) -> Result<(), AppError> {
    if id.is_empty() {
        return Err(AppError::InvalidInput("Document id cannot be empty".to_string()));
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(AppError::InvalidInput(format!("Invalid document id: {}", id)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AppError::NotFound("doc 'x'".to_string());
        assert_eq!(error.to_string(), "Not found: doc 'x'");

        let error = AppError::CorpusLoad("data/a.md returned 404".to_string());
        assert_eq!(error.to_string(), "Corpus load failed: data/a.md returned 404");
    }

    #[test]
    fn test_error_codes_and_exit_codes() {
        assert_eq!(AppError::InvalidInput(String::new()).error_code(), "invalid_input");
        assert_eq!(AppError::CorpusLoad(String::new()).error_code(), "corpus_load_failed");
        assert_eq!(AppError::InvalidInput(String::new()).exit_code(), 1);
        assert_eq!(AppError::Network(String::new()).exit_code(), 2);
        assert_eq!(AppError::NotFound(String::new()).exit_code(), 3);
        assert_eq!(AppError::Timeout(String::new()).exit_code(), 4);
        assert_eq!(AppError::Internal(String::new()).exit_code(), 5);
    }

    #[test]
    fn test_from_conversions() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(AppError::from(io), AppError::Io(_)));

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(AppError::from(json), AppError::Parse(_)));
    }

    #[test]
    fn test_validate_query() {
        assert!(validate_query("").is_ok());
        assert!(validate_query("confuserex").is_ok());
        assert!(validate_query(&"x".repeat(501)).is_err());
        // limit counts chars, not UTF-8 bytes
        assert!(validate_query(&"構造".repeat(250)).is_ok());
        assert!(validate_query(&"構".repeat(501)).is_err());
    }

    #[test]
    fn test_validate_doc_id() {
        assert!(validate_doc_id("structure").is_ok());
        assert!(validate_doc_id("editing-release_2").is_ok());
        assert!(validate_doc_id("").is_err());
        assert!(validate_doc_id("../etc").is_err());
        assert!(validate_doc_id("Structure").is_err());
    }
}
