//! Corpus data model: documents and the manifest describing where they live

use crate::error::{validate_doc_id, AppError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path};

/// A searchable long-form document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    /// Page the document is published at, e.g. `/docs/structure`
    pub url: String,
    pub body: String,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            body: body.into(),
        }
    }
}

/// Immutable set of documents, loaded once and shared read-only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Documents in load order. Ranking ties resolve to this order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// One document the loader should fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Path of the markdown asset relative to the corpus root
    pub asset: String,
}

/// The list of documents making up the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusManifest {
    pub documents: Vec<ManifestEntry>,
}

impl Default for CorpusManifest {
    /// The two published guides
    fn default() -> Self {
        Self {
            documents: vec![
                ManifestEntry {
                    id: "structure".to_string(),
                    title: "SimpleBIM Structure Guide".to_string(),
                    url: "/docs/structure".to_string(),
                    asset: "data/structure.md".to_string(),
                },
                ManifestEntry {
                    id: "editing".to_string(),
                    title: "SimpleBIM Editing & Release Guide".to_string(),
                    url: "/docs/editing".to_string(),
                    asset: "data/editing.md".to_string(),
                },
            ],
        }
    }
}

impl CorpusManifest {
    /// Read a JSON manifest from disk and validate it
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Io(format!("Failed to read manifest {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let manifest: CorpusManifest = serde_json::from_str(raw)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Ids must be unique slugs and assets must stay inside the corpus root
    pub fn validate(&self) -> Result<(), AppError> {
        if self.documents.is_empty() {
            return Err(AppError::InvalidInput("Manifest lists no documents".to_string()));
        }

        let mut seen = HashSet::new();
        for entry in &self.documents {
            validate_doc_id(&entry.id)?;
            if !seen.insert(entry.id.as_str()) {
                return Err(AppError::InvalidInput(format!(
                    "Duplicate document id in manifest: {}",
                    entry.id
                )));
            }

            let asset = Path::new(&entry.asset);
            let escapes_root = entry.asset.is_empty()
                || asset
                    .components()
                    .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
            if escapes_root {
                return Err(AppError::InvalidInput(format!(
                    "Asset path must be relative to the corpus root: {}",
                    entry.asset
                )));
            }
        }

        Ok(())
    }
}
