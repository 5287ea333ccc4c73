//! Document pages
//!
//! Renders a single document, highlighting the term passed through the
//! `highlight` parameter of a search result link.

use crate::corpus::{Corpus, Document};
use crate::error::{validate_doc_id, AppError};
use crate::search::highlight::{escape_html, Highlighter, TermPattern};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Body with highlight markers applied
    pub body: String,
    /// Char offset of the first highlighted occurrence in the raw body
    pub first_match: Option<usize>,
    pub match_count: usize,
}

/// Look up a document by id
pub fn find_document<'a>(corpus: &'a Corpus, id: &str) -> Result<&'a Document, AppError> {
    validate_doc_id(id)?;
    corpus
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Document '{}' does not exist", id)))
}

/// Render a document. A blank or absent highlight leaves the body unmarked.
pub fn render_document(
    doc: &Document,
    highlight: Option<&str>,
    highlighter: &Highlighter,
) -> RenderedDocument {
    let pattern = highlight
        .filter(|term| !term.trim().is_empty())
        .and_then(TermPattern::new);

    let (body, first_match, match_count) = match &pattern {
        Some(p) => (
            highlighter.apply(&doc.body, p),
            p.find(&doc.body).map(|byte| doc.body[..byte].chars().count()),
            p.ranges(&doc.body).count(),
        ),
        None => (highlighter.plain(&doc.body), None, 0),
    };

    RenderedDocument {
        id: doc.id.clone(),
        title: doc.title.clone(),
        url: doc.url.clone(),
        body,
        first_match,
        match_count,
    }
}

impl RenderedDocument {
    pub fn to_markdown(&self) -> String {
        let mut md = format!("# {}\n\n", self.title);
        if self.match_count > 0 {
            md.push_str(&format!("_{} highlighted matches_\n\n", self.match_count));
        }
        md.push_str(&self.body);
        if !self.body.ends_with('\n') {
            md.push('\n');
        }
        md
    }

    /// HTML fragment; the body must come from an HTML highlighter
    pub fn to_html(&self) -> String {
        format!(
            r#"<article id="{}"><h1>{}</h1><pre class="doc-body">{}</pre></article>"#,
            escape_html(&self.id),
            escape_html(&self.title),
            self.body
        )
    }
}
