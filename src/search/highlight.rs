//! Case-insensitive literal term highlighting
//!
//! The term is matched literally: regex metacharacters are escaped, so `C++` or
//! `a.b` only match themselves. Matched text keeps its source casing inside the
//! markers.

use clap::ValueEnum;
use regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Output markup for highlighted matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    /// `<mark>term</mark>`, surrounding text HTML-escaped
    #[default]
    Html,
    /// `**term**`
    Markdown,
}

/// Compiled case-insensitive literal pattern for one search term
#[derive(Debug, Clone)]
pub struct TermPattern {
    regex: Regex,
}

impl TermPattern {
    /// Returns None for an empty term
    pub fn new(term: &str) -> Option<Self> {
        if term.is_empty() {
            return None;
        }

        match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(Self { regex }),
            Err(e) => {
                debug!("Cannot compile highlight pattern for {:?}: {}", term, e);
                None
            }
        }
    }

    /// Byte offset of the first match
    pub fn find(&self, text: &str) -> Option<usize> {
        self.regex.find(text).map(|m| m.start())
    }

    /// Non-overlapping match ranges, left to right
    pub fn ranges<'t>(&'t self, text: &'t str) -> impl Iterator<Item = (usize, usize)> + 't {
        self.regex.find_iter(text).map(|m| (m.start(), m.end()))
    }
}

/// Wraps matches of a term in style-specific markers
#[derive(Debug, Clone, Copy, Default)]
pub struct Highlighter {
    style: HighlightStyle,
}

impl Highlighter {
    pub fn new(style: HighlightStyle) -> Self {
        Self { style }
    }

    /// Highlight with an already compiled pattern
    pub fn apply(&self, text: &str, pattern: &TermPattern) -> String {
        let (open, close) = self.markers();
        let mut out = String::with_capacity(text.len() + 16);
        let mut last = 0usize;

        for (start, end) in pattern.ranges(text) {
            out.push_str(&self.plain(&text[last..start]));
            out.push_str(open);
            out.push_str(&self.plain(&text[start..end]));
            out.push_str(close);
            last = end;
        }
        out.push_str(&self.plain(&text[last..]));

        out
    }

    /// Render text without highlights (escaped for HTML)
    pub fn plain(&self, text: &str) -> String {
        match self.style {
            HighlightStyle::Html => escape_html(text),
            HighlightStyle::Markdown => text.to_string(),
        }
    }

    fn markers(&self) -> (&'static str, &'static str) {
        match self.style {
            HighlightStyle::Html => ("<mark>", "</mark>"),
            HighlightStyle::Markdown => ("**", "**"),
        }
    }
}

/// Minimal HTML escaping for text nodes and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
