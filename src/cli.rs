//! CLI mode implementation
//!
//! Provides the command-line interface and the shared corpus configuration

use crate::corpus::{CorpusLoader, CorpusManifest, CorpusSource};
use crate::error::AppError;
use crate::search::HighlightStyle;
use clap::{Parser, Subcommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// SimpleBIM documentation search
///
/// Runs as an MCP server on stdio when no subcommand is given.
#[derive(Parser, Debug)]
#[command(name = "simplebim-search")]
#[command(about = "Search, highlight and retrieve context from the SimpleBIM documentation", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Corpus location: a directory or an http(s) base URL
    #[arg(long, global = true, env = "SIMPLEBIM_CORPUS")]
    pub corpus: Option<String>,

    /// JSON manifest listing the documents (defaults to the two guides)
    #[arg(long, global = true, env = "SIMPLEBIM_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Highlight markup for CLI and MCP output
    #[arg(long, global = true, value_enum, default_value_t = HighlightStyle::Markdown)]
    pub format: HighlightStyle,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank documents for a query and print highlighted snippets
    Search(SearchArgs),
    /// Print a document, highlighting a term
    Doc(DocArgs),
    /// Retrieve chatbot context sections for a question
    Context(ContextArgs),
    /// Read queries from stdin, re-rendering results for each line
    Interactive,
    /// Serve the search and document pages over HTTP
    Serve(ServeArgs),
}

/// Search tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SearchArgs {
    /// Search keyword (case-insensitive, matched literally)
    #[arg(short = 'q', long)]
    #[schemars(description = "Search keyword (case-insensitive, matched literally)")]
    pub query: String,
}

/// Document tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct DocArgs {
    /// Document id, e.g. structure or editing
    #[arg(short = 'i', long)]
    #[schemars(description = "Document id, e.g. structure or editing")]
    pub id: String,

    /// Term to highlight in the document
    #[arg(long)]
    #[schemars(description = "Term to highlight in the document")]
    pub highlight: Option<String>,
}

/// Context tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct ContextArgs {
    /// Question to retrieve documentation context for
    #[arg(short = 'q', long)]
    #[schemars(description = "Question to retrieve documentation context for")]
    pub question: String,

    /// Maximum number of sections (default 3)
    #[arg(long)]
    #[schemars(description = "Maximum number of sections (default 3)")]
    pub top: Option<usize>,

    /// Maximum total characters of context (default 4000)
    #[arg(long)]
    #[schemars(description = "Maximum total characters of context (default 4000)")]
    pub budget: Option<usize>,
}

/// HTTP portal arguments
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "SIMPLEBIM_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,
}

impl Cli {
    /// Build the corpus loader from --corpus/--manifest and their env fallbacks
    pub fn corpus_loader(&self) -> Result<CorpusLoader, AppError> {
        let source = match &self.corpus {
            Some(value) => CorpusSource::parse(value)?,
            None => CorpusSource::default_location(),
        };

        let manifest = match &self.manifest {
            Some(path) => CorpusManifest::from_file(path)?,
            None => CorpusManifest::default(),
        };

        CorpusLoader::new(source, manifest)
    }

    /// Log level from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_command() {
        let cli = Cli::try_parse_from([
            "simplebim-search",
            "search",
            "-q",
            "ConfuserEx",
            "--corpus",
            "./public",
        ])
        .unwrap();

        match &cli.command {
            Some(Commands::Search(args)) => assert_eq!(args.query, "ConfuserEx"),
            other => panic!("expected search command, got {:?}", other),
        }
        assert_eq!(cli.corpus.as_deref(), Some("./public"));
        assert_eq!(cli.format, HighlightStyle::Markdown);
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn test_parse_doc_and_context_commands() {
        let cli = Cli::try_parse_from([
            "simplebim-search",
            "--format",
            "html",
            "doc",
            "--id",
            "editing",
            "--highlight",
            "release",
        ])
        .unwrap();
        assert_eq!(cli.format, HighlightStyle::Html);
        match cli.command {
            Some(Commands::Doc(args)) => {
                assert_eq!(args.id, "editing");
                assert_eq!(args.highlight.as_deref(), Some("release"));
            }
            other => panic!("expected doc command, got {:?}", other),
        }

        let cli = Cli::try_parse_from([
            "simplebim-search",
            "-v",
            "context",
            "-q",
            "how to release",
            "--top",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.log_level(), "debug");
        match cli.command {
            Some(Commands::Context(args)) => {
                assert_eq!(args.top, Some(2));
                assert_eq!(args.budget, None);
            }
            other => panic!("expected context command, got {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_means_mcp_mode() {
        let cli = Cli::try_parse_from(["simplebim-search", "--quiet"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level(), "error");
    }

    #[test]
    fn test_serve_bind_parses() {
        let cli = Cli::try_parse_from(["simplebim-search", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Some(Commands::Serve(args)) => assert_eq!(args.bind.port(), 9000),
            other => panic!("expected serve command, got {:?}", other),
        }
    }

    #[test]
    fn test_search_args_from_json() {
        let args: SearchArgs = serde_json::from_value(serde_json::json!({ "query": "build" })).unwrap();
        assert_eq!(args.query, "build");

        let args: ContextArgs =
            serde_json::from_value(serde_json::json!({ "question": "why", "budget": 100 })).unwrap();
        assert_eq!(args.budget, Some(100));
        assert_eq!(args.top, None);
    }

    #[test]
    fn test_corpus_loader_from_flags() {
        let cli = Cli::try_parse_from([
            "simplebim-search",
            "--corpus",
            "https://portal.example.com",
            "interactive",
        ])
        .unwrap();
        let loader = cli.corpus_loader().unwrap();
        assert!(matches!(loader.source(), CorpusSource::Remote(_)));
    }
}
