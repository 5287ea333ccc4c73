//! Snippet extraction
//!
//! Produces a bounded excerpt of a document body anchored on the first match of
//! the raw search term. All offsets and lengths are counted in chars.
//!
//! The window has two independent bounds measured from the match start: up to
//! [`LEADING_CONTEXT`] chars before it and up to [`TRAILING_SPAN`] chars from it.
//! Only the leading edge is moved to a word boundary.

use super::highlight::{Highlighter, TermPattern};

/// Length of the preview returned when there is no search term
pub const PREVIEW_CHARS: usize = 200;
/// Context kept before the first match
pub const LEADING_CONTEXT: usize = 80;
/// Span kept from the first match start onwards
pub const TRAILING_SPAN: usize = 200;
/// How far past the window start a space may be to snap to it
pub const WORD_BOUNDARY_LOOKAHEAD: usize = 20;
pub const ELLIPSIS: &str = "...";

/// Excerpt of `text` around the first occurrence of `search_term`, with every
/// occurrence inside the excerpt highlighted
pub fn extract_snippet(text: &str, search_term: &str, highlighter: &Highlighter) -> String {
    let total = text.chars().count();

    if search_term.trim().is_empty() {
        let preview_end = byte_offset(text, PREVIEW_CHARS);
        let mut out = highlighter.plain(&text[..preview_end]);
        if total > PREVIEW_CHARS {
            out.push_str(ELLIPSIS);
        }
        return out;
    }

    let pattern = TermPattern::new(search_term);

    // A term that does not occur anchors the window at the start of the text.
    let first_index = pattern
        .as_ref()
        .and_then(|p| p.find(text))
        .map(|byte| text[..byte].chars().count())
        .unwrap_or(0);

    let (start, end) = snippet_window(text, first_index, total);

    let slice = &text[byte_offset(text, start)..byte_offset(text, end)];
    let body = match &pattern {
        Some(p) => highlighter.apply(slice, p),
        None => highlighter.plain(slice),
    };

    let mut out = String::with_capacity(body.len() + 2 * ELLIPSIS.len());
    if start > 0 {
        out.push_str(ELLIPSIS);
    }
    out.push_str(&body);
    if end < total {
        out.push_str(ELLIPSIS);
    }
    out
}

/// Char range `[start, end)` of the excerpt for a match starting at `first_index`
pub fn snippet_window(text: &str, first_index: usize, total: usize) -> (usize, usize) {
    let mut start = first_index.saturating_sub(LEADING_CONTEXT);
    let end = (first_index + TRAILING_SPAN).min(total);

    if start > 0 {
        let next_space = text
            .chars()
            .skip(start)
            .take(WORD_BOUNDARY_LOOKAHEAD)
            .position(|c| c == ' ');
        if let Some(distance) = next_space {
            start += distance + 1;
        }
    }

    (start, end)
}

/// Byte offset of the char at `char_index`, clamped to the end of the text
fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::highlight::HighlightStyle;

    fn md() -> Highlighter {
        Highlighter::new(HighlightStyle::Markdown)
    }

    #[test]
    fn test_short_body_without_term_is_unchanged() {
        let body = "a".repeat(50);
        assert_eq!(extract_snippet(&body, "", &md()), body);
        assert_eq!(extract_snippet(&body, "   ", &md()), body);
    }

    #[test]
    fn test_long_body_without_term_is_truncated() {
        let body = "b".repeat(250);
        let snippet = extract_snippet(&body, "", &md());
        assert_eq!(snippet, format!("{}...", "b".repeat(200)));
    }

    #[test]
    fn test_exactly_preview_length_has_no_ellipsis() {
        let body = "c".repeat(200);
        assert_eq!(extract_snippet(&body, "", &md()), body);
    }

    #[test]
    fn test_match_near_start_has_no_leading_ellipsis() {
        let text = "Install the plugin. Then configure it.";
        let snippet = extract_snippet(text, "plugin", &md());
        assert_eq!(snippet, "Install the **plugin**. Then configure it.");
    }

    #[test]
    fn test_escaped_term_matches_only_literal() {
        let snippet = extract_snippet("xa.bx axbx", "a.b", &md());
        assert_eq!(snippet, "x**a.b**x axbx");
    }

    #[test]
    fn test_window_bounds_and_ellipses() {
        // 100 chars without spaces, the term, then 300 filler chars
        let text = format!("{}TARGET{}", "x".repeat(100), "y".repeat(300));
        let snippet = extract_snippet(&text, "target", &md());

        // start = 20, no space to snap to; end = 300
        let expected = format!("...{}**TARGET**{}...", "x".repeat(80), "y".repeat(194));
        assert_eq!(snippet, expected);
    }

    #[test]
    fn test_leading_edge_snaps_to_word_boundary() {
        // start lands at 20, a space sits at 25 (5 chars later)
        let text = format!("{} {}needle tail", "a".repeat(25), "b".repeat(74));
        let (start, end) = snippet_window(&text, 100, text.chars().count());
        assert_eq!(start, 26);
        assert_eq!(end, text.chars().count());

        let snippet = extract_snippet(&text, "needle", &md());
        assert_eq!(snippet, format!("...{}**needle** tail", "b".repeat(74)));
    }

    #[test]
    fn test_space_too_far_does_not_move_start() {
        // start lands at 20, first space at 45
        let text = format!("{} {}needle", "a".repeat(45), "b".repeat(54));
        let (start, _) = snippet_window(&text, 100, text.chars().count());
        assert_eq!(start, 20);
    }

    #[test]
    fn test_space_at_window_start_is_skipped_over() {
        let text = format!("{} {}needle", "a".repeat(20), "b".repeat(79));
        let (start, _) = snippet_window(&text, 100, text.chars().count());
        assert_eq!(start, 21);
    }

    #[test]
    fn test_trailing_edge_is_not_adjusted() {
        let text = format!("needle {}", "word ".repeat(100));
        let snippet = extract_snippet(&text, "needle", &md());
        let body: String = text.chars().take(200).collect();
        assert_eq!(snippet, format!("{}...", body.replacen("needle", "**needle**", 1)));
    }

    #[test]
    fn test_missing_term_falls_back_to_leading_excerpt() {
        let text = "z".repeat(300);
        let snippet = extract_snippet(&text, "absent", &md());
        assert_eq!(snippet, format!("{}...", "z".repeat(200)));
    }

    #[test]
    fn test_all_occurrences_in_window_highlighted() {
        let snippet = extract_snippet("Build, build, BUILD", "build", &md());
        assert_eq!(snippet, "**Build**, **build**, **BUILD**");
    }

    #[test]
    fn test_multibyte_text_slices_on_char_boundaries() {
        let text = format!("{}ümlaut Größe", "é".repeat(120));
        let snippet = extract_snippet(&text, "größe", &md());
        assert!(snippet.starts_with("..."));
        assert!(snippet.ends_with("**Größe**"));
    }

    #[test]
    fn test_html_style_escapes_snippet() {
        let html = Highlighter::new(HighlightStyle::Html);
        assert_eq!(
            extract_snippet("use <T> generics", "generics", &html),
            "use &lt;T&gt; <mark>generics</mark>"
        );
    }
}
