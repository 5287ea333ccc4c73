//! HTTP portal
//!
//! Serves the search page, its JSON view and highlighted document pages over a
//! corpus loaded once at startup.

use crate::corpus::Corpus;
use crate::docs::{find_document, render_document};
use crate::error::{validate_query, AppError};
use crate::page::{SearchPage, SearchView};
use crate::search::highlight::{escape_html, HighlightStyle, Highlighter};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocParams {
    pub highlight: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) | AppError::Parse(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "code": self.error_code(),
            "message": self.message(),
        });
        (status, Json(body)).into_response()
    }
}

pub fn router(corpus: Arc<Corpus>) -> Router {
    Router::new()
        .route("/search", get(search_page))
        .route("/api/search", get(search_api))
        .route("/docs/:id", get(document_page))
        .route("/healthz", get(healthz))
        .with_state(corpus)
}

/// Bind and serve until the process is stopped
pub async fn serve(corpus: Arc<Corpus>, bind: SocketAddr) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(
        "Serving {} documents on http://{}",
        corpus.len(),
        listener.local_addr()?
    );
    axum::serve(listener, router(corpus)).await?;
    Ok(())
}

fn search_view(corpus: Arc<Corpus>, query: String) -> Result<SearchView, AppError> {
    validate_query(&query)?;
    let mut page = SearchPage::with_corpus(corpus, Highlighter::new(HighlightStyle::Html));
    page.set_query(query);
    Ok(page.view())
}

async fn search_page(
    State(corpus): State<Arc<Corpus>>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    debug!("GET /search q={:?}", params.q);
    let query = escape_html(&params.q);
    let view = search_view(corpus, params.q)?;
    Ok(Html(layout(
        "Search",
        &format!(
            r#"<form action="/search" method="get"><input type="search" name="q" value="{}" autofocus></form>{}"#,
            query,
            view.render_html()
        ),
    )))
}

async fn search_api(
    State(corpus): State<Arc<Corpus>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchView>, AppError> {
    Ok(Json(search_view(corpus, params.q)?))
}

async fn document_page(
    State(corpus): State<Arc<Corpus>>,
    Path(id): Path<String>,
    Query(params): Query<DocParams>,
) -> Result<Html<String>, AppError> {
    if let Some(term) = &params.highlight {
        validate_query(term)?;
    }
    let doc = find_document(&corpus, &id)?;
    let rendered = render_document(
        doc,
        params.highlight.as_deref(),
        &Highlighter::new(HighlightStyle::Html),
    );
    Ok(Html(layout(&rendered.title, &rendered.to_html())))
}

async fn healthz(State(corpus): State<Arc<Corpus>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "documents": corpus.len() }))
}

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{} · SimpleBIM Docs</title>
    <style>
        body {{ font-family: -apple-system, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; max-width: 860px; margin: 2rem auto; }}
        mark {{ background: #fde68a; }}
        .doc-body {{ white-space: pre-wrap; }}
        .error {{ color: #b91c1c; }}
    </style>
</head>
<body>
{}
</body>
</html>"#,
        escape_html(title),
        content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(Corpus::new(vec![
            Document::new(
                "structure",
                "Structure Guide",
                "/docs/structure",
                "Run ConfuserEx <before> release.",
            ),
            Document::new("editing", "Editing Guide", "/docs/editing", "Nothing here."),
        ])))
    }

    async fn get_body(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_search_page_renders_results() {
        let (status, body) = get_body("/search?q=confuserex").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<mark>ConfuserEx</mark>"));
        assert!(body.contains("&lt;before&gt;"));
        assert!(body.contains(r#"href="/docs/structure?highlight=confuserex""#));
    }

    #[tokio::test]
    async fn test_search_page_without_query_prompts() {
        let (status, body) = get_body("/search").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("class=\"prompt\""));
    }

    #[tokio::test]
    async fn test_search_api_json() {
        let (status, body) = get_body("/api/search?q=zzz").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["state"], "no_results");
        assert_eq!(json["query"], "zzz");
    }

    #[tokio::test]
    async fn test_document_page_highlights() {
        let (status, body) = get_body("/docs/structure?highlight=release").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<mark>release</mark>"));
        assert!(body.contains("<title>Structure Guide · SimpleBIM Docs</title>"));
    }

    #[tokio::test]
    async fn test_document_errors() {
        let (status, body) = get_body("/docs/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("\"not_found\""));

        let (status, _) = get_body("/docs/Bad.Id").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_healthz() {
        let (status, body) = get_body("/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"documents\":2"));
    }
}
