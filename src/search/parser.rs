//! Question parsing for chat context retrieval
//!
//! Splits a free-form question into the whole question, quoted phrases that
//! must appear literally, and content words with stop words removed.

use unicode_segmentation::UnicodeSegmentation;

/// Words that carry no retrieval signal in a question
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does", "for", "from", "has",
    "how", "i", "in", "is", "it", "its", "me", "my", "of", "on", "or", "should", "that", "the",
    "this", "to", "was", "we", "what", "when", "where", "which", "who", "why", "will", "with",
    "you",
];

/// Parsed question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestion {
    /// Trimmed question text
    pub whole: String,
    /// Lower-cased content words, deduplicated, in order of appearance
    pub words: Vec<String>,
    /// Phrases given in double quotes
    pub phrases: Vec<String>,
}

impl ParsedQuestion {
    pub fn is_empty(&self) -> bool {
        self.whole.is_empty()
    }
}

pub fn parse_question(question: &str) -> ParsedQuestion {
    let whole = question.trim().to_string();
    let (phrases, rest) = split_quoted(&whole);

    let mut words: Vec<String> = Vec::new();
    for word in rest.unicode_words().map(str::to_lowercase) {
        if !STOP_WORDS.contains(&word.as_str()) && !words.contains(&word) {
            words.push(word);
        }
    }

    ParsedQuestion {
        whole,
        words,
        phrases,
    }
}

/// Pull out `"..."` phrases. An unclosed quote is kept as ordinary text.
fn split_quoted(text: &str) -> (Vec<String>, String) {
    let mut phrases = Vec::new();
    let mut rest = String::new();
    let mut parts = text.split('"').peekable();
    let mut inside = false;

    while let Some(part) = parts.next() {
        if inside {
            if parts.peek().is_some() {
                let phrase = part.trim();
                if !phrase.is_empty() {
                    phrases.push(phrase.to_string());
                }
            } else {
                // no closing quote followed
                rest.push('"');
                rest.push_str(part);
            }
        } else {
            rest.push_str(part);
            rest.push(' ');
        }
        inside = !inside;
    }

    (phrases, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_drop_stop_words() {
        let parsed = parse_question("How do I release a new version?");
        assert_eq!(parsed.whole, "How do I release a new version?");
        assert_eq!(parsed.words, vec!["release", "new", "version"]);
        assert!(parsed.phrases.is_empty());
    }

    #[test]
    fn test_quoted_phrases() {
        let parsed = parse_question(r#"where is "project structure" described"#);
        assert_eq!(parsed.phrases, vec!["project structure"]);
        assert_eq!(parsed.words, vec!["described"]);
    }

    #[test]
    fn test_multiple_and_empty_phrases() {
        let parsed = parse_question(r#""first one" and "" "second one""#);
        assert_eq!(parsed.phrases, vec!["first one", "second one"]);
        assert!(parsed.words.is_empty());
    }

    #[test]
    fn test_unclosed_quote_is_text() {
        let parsed = parse_question(r#"obfuscate "release build"#);
        assert!(parsed.phrases.is_empty());
        assert_eq!(parsed.words, vec!["obfuscate", "release", "build"]);
    }

    #[test]
    fn test_words_are_deduplicated() {
        let parsed = parse_question("build Build BUILD steps");
        assert_eq!(parsed.words, vec!["build", "steps"]);
    }

    #[test]
    fn test_empty_question() {
        let parsed = parse_question("   ");
        assert!(parsed.is_empty());
        assert!(parsed.words.is_empty());
    }

    #[test]
    fn test_unicode_words() {
        let parsed = parse_question("Größe der Ebene");
        assert_eq!(parsed.words, vec!["größe", "der", "ebene"]);
    }
}
