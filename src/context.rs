//! Chat context retrieval
//!
//! Splits documents into heading-delimited sections, scores them against a
//! question and packs the best ones into a bounded context window for an
//! external chatbot.

use crate::corpus::{Corpus, Document};
use crate::search::fuzzy::{FuzzyMatcher, MatchType};
use crate::search::parser::parse_question;
use crate::search::ranking::count_occurrences;
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_CHAR_BUDGET: usize = 4000;

/// Scoring weights for section retrieval
#[derive(Debug, Clone)]
pub struct ContextWeights {
    /// Multiplier for fuzzy heading matches
    pub heading: f64,
    /// Score per literal body occurrence
    pub body_hit: f64,
    /// Body occurrences beyond this are ignored
    pub body_hit_cap: usize,
    /// Discount for matches on individual words instead of the whole question
    pub word_penalty: f64,
    /// Score per occurrence of a quoted phrase
    pub phrase_hit: f64,
}

impl Default for ContextWeights {
    fn default() -> Self {
        Self {
            heading: 2.0,
            body_hit: 8.0,
            body_hit_cap: 10,
            word_penalty: 0.7,
            phrase_hit: 16.0,
        }
    }
}

fn position_multiplier(match_type: MatchType) -> f64 {
    match match_type {
        MatchType::FullWord => 1.0,
        MatchType::WordStart => 0.8,
        MatchType::WordEnd => 0.6,
        MatchType::WordMiddle => 0.4,
        MatchType::Scattered => 0.3,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContextOptions {
    pub top_k: usize,
    /// Maximum total chars of section text
    pub char_budget: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            char_budget: DEFAULT_CHAR_BUDGET,
        }
    }
}

/// A heading-delimited slice of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub doc: &'a Document,
    pub heading: String,
    /// Section text including its heading line
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextSection {
    pub doc_id: String,
    pub doc_title: String,
    pub heading: String,
    pub score: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatContext {
    pub question: String,
    pub sections: Vec<ContextSection>,
}

impl ChatContext {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn total_chars(&self) -> usize {
        self.sections.iter().map(|s| s.text.chars().count()).sum()
    }

    /// Plain-text rendering, sections separated by `---`
    pub fn render_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| format!("[{} / {}]\n{}", s.doc_title, s.heading, s.text.trim_end()))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }
}

/// ATX heading text (`#` to `######` followed by a space), if the line is one
fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_end();
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &trimmed[hashes..];
    if rest.is_empty() {
        return Some("");
    }
    rest.strip_prefix(' ').map(str::trim)
}

/// Split a markdown body into sections. Headings inside fenced code blocks are
/// ignored; text before the first heading is titled after the document.
pub fn split_sections(doc: &Document) -> Vec<Section<'_>> {
    let body = doc.body.as_str();
    let mut sections = Vec::new();
    let mut current_heading = doc.title.clone();
    let mut current_start = 0usize;
    let mut offset = 0usize;
    let mut in_fence = false;

    for line in body.split_inclusive('\n') {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        } else if !in_fence {
            if let Some(heading) = heading_text(line) {
                let text = &body[current_start..offset];
                if !text.trim().is_empty() {
                    sections.push(Section {
                        doc,
                        heading: current_heading,
                        text,
                    });
                }
                current_heading = heading.to_string();
                current_start = offset;
            }
        }
        offset += line.len();
    }

    let text = &body[current_start..];
    if !text.trim().is_empty() {
        sections.push(Section {
            doc,
            heading: current_heading,
            text,
        });
    }

    sections
}

/// Scores sections against questions and packs a context window
pub struct ContextRetriever {
    matcher: FuzzyMatcher,
    weights: ContextWeights,
    options: ContextOptions,
}

impl ContextRetriever {
    pub fn new(options: ContextOptions) -> Self {
        Self {
            matcher: FuzzyMatcher::new(),
            weights: ContextWeights::default(),
            options,
        }
    }

    pub fn retrieve(&mut self, corpus: &Corpus, question: &str) -> ChatContext {
        let parsed = parse_question(question);
        let mut context = ChatContext {
            question: parsed.whole.clone(),
            sections: Vec::new(),
        };
        if parsed.is_empty() || self.options.top_k == 0 {
            return context;
        }

        let whole_lower = parsed.whole.to_lowercase();
        let word_penalty = self.weights.word_penalty;
        let phrases: Vec<String> = parsed.phrases.iter().map(|p| p.to_lowercase()).collect();

        let mut scored: Vec<(f64, Section<'_>)> = Vec::new();
        for doc in corpus.documents() {
            for section in split_sections(doc) {
                let text_lower = section.text.to_lowercase();

                let mut phrase_score = 0.0;
                let mut all_phrases = true;
                for phrase in &phrases {
                    let (hits, _) = count_occurrences(&text_lower, phrase);
                    if hits == 0 {
                        all_phrases = false;
                        break;
                    }
                    phrase_score += hits.min(self.weights.body_hit_cap) as f64 * self.weights.phrase_hit;
                }
                if !all_phrases {
                    continue;
                }

                let whole_score = self.score_term(&section.heading, &text_lower, &whole_lower);
                let words_score: f64 = parsed
                    .words
                    .iter()
                    .map(|w| self.score_term(&section.heading, &text_lower, w))
                    .sum::<f64>()
                    * word_penalty;

                let score = whole_score.max(words_score) + phrase_score;
                if score > 0.0 {
                    scored.push((score, section));
                }
            }
        }

        // stable: equal scores keep document and section order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        debug!(
            "Context retrieval for {:?}: {} candidate sections",
            parsed.whole,
            scored.len()
        );

        let mut used = 0usize;
        for (score, section) in scored {
            if context.sections.len() == self.options.top_k {
                break;
            }

            let len = section.text.chars().count();
            let text = if used + len <= self.options.char_budget {
                section.text.to_string()
            } else if context.sections.is_empty() {
                section.text.chars().take(self.options.char_budget).collect()
            } else {
                continue;
            };
            if text.is_empty() {
                continue;
            }

            used += text.chars().count();
            context.sections.push(ContextSection {
                doc_id: section.doc.id.clone(),
                doc_title: section.doc.title.clone(),
                heading: section.heading,
                score,
                text,
            });
        }

        context
    }

    fn score_term(&mut self, heading: &str, text_lower: &str, term: &str) -> f64 {
        let heading_score = self
            .matcher
            .fuzzy_match(heading, term)
            .map(|m| m.score as f64 * position_multiplier(m.match_type))
            .unwrap_or(0.0)
            * self.weights.heading;

        let (hits, _) = count_occurrences(text_lower, term);
        heading_score + hits.min(self.weights.body_hit_cap) as f64 * self.weights.body_hit
    }
}
