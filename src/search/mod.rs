//! Document search: ranking, snippet extraction, highlighting and the fuzzy
//! matching used for chat context retrieval

pub mod fuzzy;
pub mod highlight;
pub mod parser;
pub mod ranking;
pub mod snippet;


pub use highlight::{HighlightStyle, Highlighter};
