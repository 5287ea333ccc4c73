//! Corpus loading from a local directory or a remote base URL
//!
//! Every asset listed in the manifest must load; a single failure fails the
//! whole corpus.

use super::document::{Corpus, CorpusManifest, Document, ManifestEntry};
use crate::error::AppError;
use crate::http::{as_base_url, client_with_timeout, fetch_text};
use futures::future::try_join_all;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Where corpus assets are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
    Directory(PathBuf),
    Remote(Url),
}

impl CorpusSource {
    /// `http://` and `https://` values are remote, everything else is a directory
    pub fn parse(value: &str) -> Result<Self, AppError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput("Corpus source cannot be empty".to_string()));
        }

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            let url = Url::parse(trimmed)
                .map_err(|e| AppError::InvalidInput(format!("Invalid corpus URL: {}", e)))?;
            Ok(CorpusSource::Remote(as_base_url(url)))
        } else {
            Ok(CorpusSource::Directory(PathBuf::from(trimmed)))
        }
    }

    /// Default source: `./public` when present, else the user data directory
    pub fn default_location() -> Self {
        let local = PathBuf::from("public");
        if local.is_dir() {
            return CorpusSource::Directory(local);
        }

        let data_dir = dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("simplebim");
        CorpusSource::Directory(data_dir)
    }
}

impl std::fmt::Display for CorpusSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorpusSource::Directory(path) => write!(f, "{}", path.display()),
            CorpusSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Loads every manifest entry from a source
pub struct CorpusLoader {
    source: CorpusSource,
    manifest: CorpusManifest,
    client: Option<Client>,
}

impl CorpusLoader {
    pub fn new(source: CorpusSource, manifest: CorpusManifest) -> Result<Self, AppError> {
        manifest.validate()?;

        let client = match source {
            CorpusSource::Remote(_) => Some(client_with_timeout(Duration::from_secs(30))?),
            CorpusSource::Directory(_) => None,
        };

        Ok(Self {
            source,
            manifest,
            client,
        })
    }

    pub fn source(&self) -> &CorpusSource {
        &self.source
    }

    /// Fetch all assets. Documents keep manifest order.
    pub async fn load(&self) -> Result<Corpus, AppError> {
        debug!(
            "Loading {} documents from {}",
            self.manifest.documents.len(),
            self.source
        );

        let documents = try_join_all(self.manifest.documents.iter().map(|entry| self.load_entry(entry)))
            .await
            .map_err(|e| match e {
                AppError::CorpusLoad(_) => e,
                other => AppError::CorpusLoad(other.to_string()),
            })?;

        info!("Loaded {} documents from {}", documents.len(), self.source);
        Ok(Corpus::new(documents))
    }

    async fn load_entry(&self, entry: &ManifestEntry) -> Result<Document, AppError> {
        let body = match (&self.source, &self.client) {
            (CorpusSource::Directory(root), _) => {
                let path = root.join(&entry.asset);
                tokio::fs::read_to_string(&path).await.map_err(|e| {
                    AppError::CorpusLoad(format!("Failed to read {}: {}", path.display(), e))
                })?
            }
            (CorpusSource::Remote(base), Some(client)) => {
                let url = base.join(&entry.asset).map_err(|e| {
                    AppError::CorpusLoad(format!("Invalid asset path {}: {}", entry.asset, e))
                })?;
                fetch_text(client, &url).await?
            }
            (CorpusSource::Remote(_), None) => {
                return Err(AppError::Internal("Remote loader without HTTP client".to_string()))
            }
        };

        debug!("Loaded '{}' ({} bytes)", entry.id, body.len());
        Ok(Document::new(
            entry.id.clone(),
            entry.title.clone(),
            entry.url.clone(),
            body,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::net::SocketAddr;

    fn write_default_assets(root: &std::path::Path) {
        std::fs::create_dir_all(root.join("data")).unwrap();
        std::fs::write(root.join("data/structure.md"), "# Structure\nProject layout.").unwrap();
        std::fs::write(root.join("data/editing.md"), "# Editing\nRelease steps.").unwrap();
    }

    async fn serve(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    #[test]
    fn test_parse_source() {
        assert_eq!(
            CorpusSource::parse("./public").unwrap(),
            CorpusSource::Directory(PathBuf::from("./public"))
        );

        match CorpusSource::parse("https://example.com/site").unwrap() {
            CorpusSource::Remote(url) => assert_eq!(url.as_str(), "https://example.com/site/"),
            other => panic!("expected remote source, got {:?}", other),
        }

        assert!(CorpusSource::parse("   ").is_err());
        assert!(CorpusSource::parse("http://").is_err());
    }

    #[tokio::test]
    async fn test_load_from_directory_keeps_manifest_order() {
        let dir = tempfile::tempdir().unwrap();
        write_default_assets(dir.path());

        let loader = CorpusLoader::new(
            CorpusSource::Directory(dir.path().to_path_buf()),
            CorpusManifest::default(),
        )
        .unwrap();
        let corpus = loader.load().await.unwrap();

        let ids: Vec<&str> = corpus.documents().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["structure", "editing"]);
        assert_eq!(corpus.documents()[1].body, "# Editing\nRelease steps.");
        assert_eq!(corpus.documents()[0].url, "/docs/structure");
    }

    #[tokio::test]
    async fn test_missing_asset_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/structure.md"), "only one").unwrap();

        let loader = CorpusLoader::new(
            CorpusSource::Directory(dir.path().to_path_buf()),
            CorpusManifest::default(),
        )
        .unwrap();

        assert!(matches!(loader.load().await, Err(AppError::CorpusLoad(_))));
    }

    #[tokio::test]
    async fn test_load_from_remote() {
        let router = Router::new()
            .route("/site/data/structure.md", get(|| async { "structure body" }))
            .route("/site/data/editing.md", get(|| async { "editing body" }));
        let addr = serve(router).await;

        let source = CorpusSource::parse(&format!("http://{}/site", addr)).unwrap();
        let loader = CorpusLoader::new(source, CorpusManifest::default()).unwrap();
        let corpus = loader.load().await.unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get("editing").unwrap().body, "editing body");
    }

    #[tokio::test]
    async fn test_remote_non_success_status_fails_whole_load() {
        let router = Router::new()
            .route("/data/structure.md", get(|| async { "structure body" }))
            .route(
                "/data/editing.md",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            );
        let addr = serve(router).await;

        let source = CorpusSource::parse(&format!("http://{}", addr)).unwrap();
        let loader = CorpusLoader::new(source, CorpusManifest::default()).unwrap();

        match loader.load().await {
            Err(AppError::CorpusLoad(msg)) => assert!(msg.contains("500")),
            other => panic!("expected corpus load failure, got {:?}", other),
        }
    }
}
