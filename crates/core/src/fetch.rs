//! Content retrieval from the Readeck API, local files, and stdin.
//!
//! [`ReadeckClient`] talks to a Readeck instance with a Bearer token. The
//! file and stdin helpers exist so article HTML saved to disk can be run
//! through the extractor without a server.

use std::fs;
use std::path::PathBuf;

use crate::{ExportError, Result};

#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::{Client, Response};
#[cfg(feature = "fetch")]
use tracing::debug;
#[cfg(feature = "fetch")]
use url::Url;

#[cfg(feature = "fetch")]
use crate::bookmark::{Bookmark, RemoteAnnotation};
#[cfg(feature = "fetch")]
use crate::config::{ExportConfig, slash_join};

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: format!("readeck-export/{}", env!("CARGO_PKG_VERSION")) }
    }
}

/// Authenticated client for the Readeck REST API.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct ReadeckClient {
    client: Client,
    base_url: String,
    token: String,
    timeout: u64,
}

#[cfg(feature = "fetch")]
impl ReadeckClient {
    /// Builds a client from the export configuration.
    ///
    /// Fails with [`ExportError::MissingToken`] before any request is made
    /// when no token is configured.
    pub fn new(config: &ExportConfig) -> Result<Self> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ExportError::MissingToken)?;

        let base = Url::parse(&config.base_url).map_err(|e| ExportError::InvalidUrl(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ExportError::InvalidUrl(format!(
                "{} (scheme must be http or https)",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch.timeout))
            .user_agent(config.fetch.user_agent.clone())
            .build()
            .map_err(ExportError::HttpError)?;

        Ok(Self { client, base_url: config.base_url.clone(), token, timeout: config.fetch.timeout })
    }

    /// Fetches bookmark metadata from `/api/bookmarks/{id}`.
    pub async fn bookmark(&self, id: &str) -> Result<Bookmark> {
        let body = self.get_text(&format!("api/bookmarks/{id}"), "application/json").await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches the rendered article HTML from `/api/bookmarks/{id}/article`.
    pub async fn article_html(&self, id: &str) -> Result<String> {
        self.get_text(&format!("api/bookmarks/{id}/article"), "text/html").await
    }

    /// Fetches stored annotations from `/api/bookmarks/{id}/annotations`.
    pub async fn annotations(&self, id: &str) -> Result<Vec<RemoteAnnotation>> {
        let body = self
            .get_text(&format!("api/bookmarks/{id}/annotations"), "application/json")
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_text(&self, path: &str, accept: &str) -> Result<String> {
        let response = self.get(path, accept).await?;
        Ok(response.text().await?)
    }

    async fn get(&self, path: &str, accept: &str) -> Result<Response> {
        let url = Url::parse(&slash_join(&self.base_url, path)).map_err(|e| ExportError::InvalidUrl(e.to_string()))?;
        debug!(%url, "requesting");

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .header("Accept", accept)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() { ExportError::Timeout { timeout: self.timeout } } else { ExportError::HttpError(e) }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::Api { status: status.as_u16(), url: url.to_string() });
        }

        Ok(response)
    }
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(ExportError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(ExportError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(ExportError::from)?;

    Ok(buffer)
}
