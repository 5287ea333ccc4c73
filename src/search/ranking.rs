//! Document ranking
//!
//! Scores every document by the number of case-insensitive literal occurrences
//! of the needle in its body. Occurrences are found by a forward scan that
//! resumes one char after each match start, so overlapping matches count
//! (`"aa"` occurs 3 times in `"aaaa"`). A title containing the needle adds a
//! flat [`TITLE_BONUS`].

use crate::corpus::Document;
use serde::Serialize;

/// Maximum number of hits returned for a query
pub const MAX_HITS: usize = 10;
/// Flat score added when the title contains the needle
pub const TITLE_BONUS: usize = 10;

/// A document that matched a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit<'a> {
    pub doc: &'a Document,
    /// Body occurrences plus the title bonus; always at least 1
    pub count: usize,
    /// Char offset of the first body occurrence in the lower-cased body.
    /// None when only the title matched.
    pub first_match_offset: Option<usize>,
}

/// Trimmed, lower-cased query. Empty when the query is blank.
pub fn normalize_needle(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Rank documents against a query, most relevant first, at most [`MAX_HITS`]
pub fn rank_documents<'a>(documents: &'a [Document], query: &str) -> Vec<SearchHit<'a>> {
    let needle = normalize_needle(query);
    if needle.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit<'a>> = documents
        .iter()
        .filter_map(|doc| score_document(doc, &needle))
        .collect();

    // sort_by is stable: equal counts keep corpus order
    hits.sort_by(|a, b| b.count.cmp(&a.count));
    hits.truncate(MAX_HITS);

    hits
}

/// Score a single document against an already normalized needle
fn score_document<'a>(doc: &'a Document, needle: &str) -> Option<SearchHit<'a>> {
    let body_lower = doc.body.to_lowercase();
    let (mut count, first_byte) = count_occurrences(&body_lower, needle);

    if doc.title.to_lowercase().contains(needle) {
        count += TITLE_BONUS;
    }

    if count == 0 {
        return None;
    }

    Some(SearchHit {
        doc,
        count,
        first_match_offset: first_byte.map(|byte| body_lower[..byte].chars().count()),
    })
}

/// Count occurrences of `needle` in `haystack`, resuming one char after each
/// match start. Returns the count and the byte offset of the first match.
pub fn count_occurrences(haystack: &str, needle: &str) -> (usize, Option<usize>) {
    if needle.is_empty() {
        return (0, None);
    }

    let mut count = 0usize;
    let mut first = None;
    let mut from = 0usize;

    while let Some(pos) = haystack[from..].find(needle) {
        let abs = from + pos;
        if first.is_none() {
            first = Some(abs);
        }
        count += 1;

        let step = haystack[abs..].chars().next().map_or(1, char::len_utf8);
        from = abs + step;
    }

    (count, first)
}
