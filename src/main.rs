//! simplebim-search MCP Server & CLI (Rust)
//!
//! Dual-mode application:
//! - MCP Server Mode (default): Model Context Protocol server using stdio
//! - CLI Mode: search, document, context, interactive and HTTP portal commands
//!
//! Implements three tools:
//! - `search(query)` - Rank the guides and return highlighted snippets
//! - `document(id, highlight)` - Return one guide with a term highlighted
//! - `context(question)` - Retrieve the sections most relevant to a question

mod cli;
mod context;
mod corpus;
mod docs;
mod error;
mod http;
mod mcp;
mod page;
mod portal;
mod search;
mod tools;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use corpus::Corpus;
use error::AppError;
use page::SearchPage;
use search::Highlighter;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader as AsyncBufReader};
use tools::ToolContext;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.command.is_some() {
        run_cli_mode(cli).await
    } else {
        run_mcp_mode(cli).await
    }
}

/// Run in CLI mode
async fn run_cli_mode(cli: Cli) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level())
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    match execute_cli(cli).await {
        Ok(Some(output)) => {
            println!("{}", output);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Execute a subcommand, returning the text to print
async fn execute_cli(mut cli: Cli) -> Result<Option<String>, AppError> {
    let style = cli.format;

    match cli.command.take() {
        Some(Commands::Search(args)) => {
            let tools = ToolContext::new(load_corpus(&cli).await?, style);
            Ok(Some(tools::search::execute_search(args, &tools)?.first_text().to_string()))
        }
        Some(Commands::Doc(args)) => {
            let tools = ToolContext::new(load_corpus(&cli).await?, style);
            Ok(Some(tools::document::execute_document(args, &tools)?.first_text().to_string()))
        }
        Some(Commands::Context(args)) => {
            let tools = ToolContext::new(load_corpus(&cli).await?, style);
            Ok(Some(tools::context::execute_context(args, &tools)?.first_text().to_string()))
        }
        Some(Commands::Interactive) => {
            run_interactive(&cli).await?;
            Ok(None)
        }
        Some(Commands::Serve(args)) => {
            let corpus = load_corpus(&cli).await?;
            portal::serve(corpus, args.bind).await?;
            Ok(None)
        }
        None => Err(AppError::InvalidInput(
            "No command specified. Use --help for usage information.".to_string(),
        )),
    }
}

/// Load the whole corpus once; any missing asset fails the load
async fn load_corpus(cli: &Cli) -> Result<Arc<Corpus>, AppError> {
    let loader = cli.corpus_loader()?;
    info!("Loading corpus from {}", loader.source());
    Ok(Arc::new(loader.load().await?))
}

/// Re-render the search page for every line read from stdin
async fn run_interactive(cli: &Cli) -> Result<(), AppError> {
    let loader = cli.corpus_loader()?;
    let mut page = SearchPage::new(Highlighter::new(cli.format));

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(page.view().render_markdown().as_bytes())
        .await?;
    stdout.flush().await?;

    page.load(&loader).await;

    let mut lines = AsyncBufReader::new(tokio::io::stdin()).lines();
    loop {
        let view = page.view();
        let rendered = match cli.format {
            search::HighlightStyle::Markdown => view.render_markdown(),
            search::HighlightStyle::Html => format!("{}\n", view.render_html()),
        };
        stdout.write_all(rendered.as_bytes()).await?;
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        match lines.next_line().await? {
            Some(line) => page.set_query(line),
            None => break,
        }
    }

    Ok(())
}

/// Run in MCP server mode
async fn run_mcp_mode(cli: Cli) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    info!("Starting simplebim-search MCP Server");

    let corpus = match load_corpus(&cli).await {
        Ok(corpus) => corpus,
        Err(e) => {
            error!("Cannot start MCP server: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    mcp::handle_stdio(ToolContext::new(corpus, cli.format)).await?;

    Ok(())
}
