//! HTTP client utilities
//!
//! Provides a reqwest::Client configured with a timeout. Proxy settings come from
//! the usual environment variables (HTTP_PROXY, HTTPS_PROXY, ALL_PROXY, NO_PROXY),
//! which reqwest reads on its own.

use crate::error::AppError;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Build a reqwest Client with the given timeout
pub fn client_with_timeout(timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("simplebim-search/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// GET a text resource; any non-2xx status is an error
pub async fn fetch_text(client: &Client, url: &Url) -> Result<String, AppError> {
    debug!("Fetching {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| AppError::Network(format!("Failed to fetch {}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Network(format!("{} returned {}", url, status)));
    }

    Ok(response.text().await?)
}

/// Make sure a base URL ends with '/' so relative joins stay underneath it
pub fn as_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
