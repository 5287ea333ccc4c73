//! Search page controller
//!
//! Holds the corpus load state and the current query, re-runs the ranker on
//! every query change and produces exactly one view state at a time.

use crate::corpus::{Corpus, CorpusLoader};
use crate::error::AppError;
use crate::search::highlight::{escape_html, Highlighter};
use crate::search::ranking::rank_documents;
use crate::search::snippet::extract_snippet;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

pub const FAILED_MESSAGE: &str = "Failed to load the documentation. Please try again later.";
pub const ENTER_KEYWORD_PROMPT: &str = "Enter a keyword to search the documentation.";
pub const NO_RESULTS_PROMPT: &str = "No results found.";

/// Corpus lifecycle. `Ready` never re-fetches and `Failed` is terminal.
#[derive(Debug, Clone)]
pub enum LoadState {
    Idle,
    Loading,
    Ready(Arc<Corpus>),
    /// Carries the cause for diagnostics; users only see [`FAILED_MESSAGE`]
    Failed(String),
}

/// One rendered search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub id: String,
    pub title: String,
    /// Document page with the raw query in the `highlight` parameter
    pub link: String,
    pub count: usize,
    pub snippet: String,
}

/// What the page shows. Exactly one of these at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchView {
    Loading,
    Failed { message: String },
    EnterKeyword,
    NoResults { query: String },
    Results { query: String, results: Vec<ResultEntry> },
}

pub struct SearchPage {
    state: LoadState,
    query: String,
    highlighter: Highlighter,
}

impl SearchPage {
    pub fn new(highlighter: Highlighter) -> Self {
        Self {
            state: LoadState::Idle,
            query: String::new(),
            highlighter,
        }
    }

    /// Page over a corpus that was loaded at startup
    pub fn with_corpus(corpus: Arc<Corpus>, highlighter: Highlighter) -> Self {
        Self {
            state: LoadState::Ready(corpus),
            query: String::new(),
            highlighter,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Load the corpus once. Calls outside `Idle` are ignored.
    pub async fn load(&mut self, loader: &CorpusLoader) {
        if !self.begin_loading() {
            debug!("Corpus load already started, ignoring");
            return;
        }
        let result = loader.load().await;
        self.finish_loading(result);
    }

    /// Move `Idle -> Loading`. Returns false if a load was already started.
    pub fn begin_loading(&mut self) -> bool {
        if !matches!(self.state, LoadState::Idle) {
            return false;
        }
        self.state = LoadState::Loading;
        true
    }

    /// Settle a pending load. Results arriving in any other state are dropped.
    pub fn finish_loading(&mut self, result: Result<Corpus, AppError>) {
        if !matches!(self.state, LoadState::Loading) {
            debug!("Discarding corpus load result, page is not loading");
            return;
        }

        self.state = match result {
            Ok(corpus) => LoadState::Ready(Arc::new(corpus)),
            Err(e) => {
                error!("Corpus load failed: {}", e);
                LoadState::Failed(e.to_string())
            }
        };
    }

    pub fn view(&self) -> SearchView {
        let corpus = match &self.state {
            LoadState::Idle | LoadState::Loading => return SearchView::Loading,
            LoadState::Failed(_) => {
                return SearchView::Failed {
                    message: FAILED_MESSAGE.to_string(),
                }
            }
            LoadState::Ready(corpus) => corpus,
        };

        if self.query.trim().is_empty() {
            return SearchView::EnterKeyword;
        }

        let hits = rank_documents(corpus.documents(), &self.query);
        if hits.is_empty() {
            return SearchView::NoResults {
                query: self.query.clone(),
            };
        }

        let results = hits
            .iter()
            .map(|hit| {
                debug!(
                    "Hit '{}': count={} first_match={:?}",
                    hit.doc.id, hit.count, hit.first_match_offset
                );
                ResultEntry {
                    id: hit.doc.id.clone(),
                    title: hit.doc.title.clone(),
                    link: result_link(&hit.doc.url, &self.query),
                    count: hit.count,
                    snippet: extract_snippet(&hit.doc.body, &self.query, &self.highlighter),
                }
            })
            .collect();

        SearchView::Results {
            query: self.query.clone(),
            results,
        }
    }
}

/// Link to a document page carrying the raw query as `highlight`
pub fn result_link(url: &str, raw_query: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}highlight={}",
        url,
        separator,
        urlencoding::encode(raw_query)
    )
}

impl SearchView {
    /// Markdown rendering; snippets are emitted as produced by the page's highlighter
    pub fn render_markdown(&self) -> String {
        match self {
            SearchView::Loading => "Loading documentation...\n".to_string(),
            SearchView::Failed { message } => format!("{}\n", message),
            SearchView::EnterKeyword => format!("{}\n", ENTER_KEYWORD_PROMPT),
            SearchView::NoResults { query } => {
                format!("{} (query: \"{}\")\n", NO_RESULTS_PROMPT, query)
            }
            SearchView::Results { query, results } => {
                let mut md = format!(
                    "# Search Results · {} for \"{}\"\n\n",
                    results.len(),
                    query
                );
                for entry in results {
                    md.push_str(&format!("## [{}]({})\n\n", entry.title, entry.link));
                    for line in entry.snippet.lines() {
                        md.push_str(&format!("> {}\n", line));
                    }
                    md.push('\n');
                    md.push_str(&format!("{} matches\n\n---\n\n", entry.count));
                }
                md
            }
        }
    }

    /// HTML fragment; snippets are expected to come from an HTML highlighter
    pub fn render_html(&self) -> String {
        match self {
            SearchView::Loading => r#"<div class="spinner">Loading...</div>"#.to_string(),
            SearchView::Failed { message } => {
                format!(r#"<p class="error">{}</p>"#, escape_html(message))
            }
            SearchView::EnterKeyword => {
                format!(r#"<p class="prompt">{}</p>"#, ENTER_KEYWORD_PROMPT)
            }
            SearchView::NoResults { .. } => {
                format!(r#"<p class="no-results">{}</p>"#, NO_RESULTS_PROMPT)
            }
            SearchView::Results { results, .. } => {
                let mut html = String::from(r#"<ul class="results">"#);
                for entry in results {
                    html.push_str(&format!(
                        r#"<li><a href="{}">{}</a><p class="snippet">{}</p></li>"#,
                        escape_html(&entry.link),
                        escape_html(&entry.title),
                        entry.snippet
                    ));
                }
                html.push_str("</ul>");
                html
            }
        }
    }
}
