//! MCP tools implementation

pub mod context;
pub mod document;
pub mod search;
pub mod util;

use crate::corpus::Corpus;
use crate::search::{HighlightStyle, Highlighter};
use std::sync::Arc;

/// State shared by every tool call: the corpus loaded at startup and the
/// markup used for highlights
#[derive(Clone)]
pub struct ToolContext {
    pub corpus: Arc<Corpus>,
    pub style: HighlightStyle,
}

impl ToolContext {
    pub fn new(corpus: Arc<Corpus>, style: HighlightStyle) -> Self {
        Self { corpus, style }
    }

    pub fn highlighter(&self) -> Highlighter {
        Highlighter::new(self.style)
    }
}
