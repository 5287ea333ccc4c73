//! Document corpus: data model and one-shot loading

pub mod document;
pub mod loader;

pub use document::{Corpus, CorpusManifest, Document};
pub use loader::{CorpusLoader, CorpusSource};
