//! Fuzzy Matching Engine using nucleo-matcher
//!
//! Used by chat context retrieval to score section headings against question
//! terms. Exact (case-insensitive) substring matches are classified by where
//! they sit relative to word boundaries.

use nucleo_matcher::{chars, Config, Matcher, Utf32String};
use unicode_normalization::UnicodeNormalization;

/// Match result with score and classification
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    /// Raw nucleo score
    pub score: u32,
    pub match_type: MatchType,
}

/// Classification of where the match occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    /// Substring match that is a whole word
    FullWord,
    /// Substring match at the beginning of a word
    WordStart,
    /// Substring match ending a word
    WordEnd,
    /// Substring match inside a word
    WordMiddle,
    /// Needle chars found in order but not contiguously
    Scattered,
}

/// Fuzzy matcher holding nucleo's scratch buffers
pub struct FuzzyMatcher {
    matcher: Matcher,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyMatcher {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
        }
    }

    /// Fuzzy match `needle` against `haystack`, case-insensitively
    pub fn fuzzy_match(&mut self, haystack: &str, needle: &str) -> Option<FuzzyMatch> {
        let needle = normalize_for_matching(needle);
        if needle.trim().is_empty() {
            return None;
        }
        let haystack = normalize_for_matching(haystack);

        // nucleo folds accents in the haystack only; the needle must match that
        let haystack_utf32 = Utf32String::from(haystack.as_str());
        let needle_folded: String = needle.chars().map(chars::normalize).collect();
        let needle_utf32 = Utf32String::from(needle_folded.as_str());

        let score = self
            .matcher
            .fuzzy_match(haystack_utf32.slice(..), needle_utf32.slice(..))?;

        Some(FuzzyMatch {
            score: score as u32,
            match_type: classify_match_type(&haystack, &needle),
        })
    }
}

/// NFC-compose and lower-case
fn normalize_for_matching(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

/// Classify the first contiguous occurrence of an already lower-cased needle
fn classify_match_type(haystack: &str, needle: &str) -> MatchType {
    let Some(start) = haystack.find(needle) else {
        return MatchType::Scattered;
    };
    let end = start + needle.len();

    let starts_word = haystack[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_alphanumeric());
    let ends_word = haystack[end..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_alphanumeric());

    match (starts_word, ends_word) {
        (true, true) => MatchType::FullWord,
        (true, false) => MatchType::WordStart,
        (false, true) => MatchType::WordEnd,
        (false, false) => MatchType::WordMiddle,
    }
}
