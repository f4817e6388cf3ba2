// src/wiki/client.rs
use crate::utils::error::WikiError;
use reqwest::header;
use std::path::{Path, PathBuf};

// The wiki serves the full page layout only to browser-like agents.
const WIKI_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; rv:78.0) Gecko/20100101 Firefox/78.0";

/// Creates a reqwest client configured for wiki interaction.
fn build_wiki_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(WIKI_USER_AGENT)
        .build()
}

/// Downloads a wiki page and returns its HTML body.
pub async fn download_page(url: &str) -> Result<String, WikiError> {
    let client = build_wiki_client()?;

    tracing::debug!("Downloading page from: {} (User-Agent: {})", url, WIKI_USER_AGENT);

    let response = client
        .get(url)
        .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
        .send()
        .await?; // Propagates reqwest::Error as WikiError::Network

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(WikiError::PageNotFound(url.to_string()));
        }
        return Err(WikiError::Http(status));
    }

    let body = response.text().await?;
    tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);

    Ok(body)
}

/// Where chapter pages come from.
#[derive(Debug, Clone)]
pub enum PageSource {
    /// Live wiki over HTTP.
    Remote,
    /// Directory of previously downloaded pages named `chapter_<n>` or `chapter_<n>.html`.
    Dump(PathBuf),
}

impl PageSource {
    /// Loads the HTML for one chapter. `url` is only used by the remote source.
    pub async fn load(&self, number: u32, url: &str) -> Result<String, WikiError> {
        match self {
            PageSource::Remote => download_page(url).await,
            PageSource::Dump(dir) => read_dump(dir, number).await,
        }
    }
}

async fn read_dump(dir: &Path, number: u32) -> Result<String, WikiError> {
    let candidates = [
        dir.join(format!("chapter_{}", number)),
        dir.join(format!("chapter_{}.html", number)),
    ];

    for path in &candidates {
        if tokio::fs::try_exists(path).await? {
            tracing::debug!("Reading page dump from: {}", path.display());
            return Ok(tokio::fs::read_to_string(path).await?);
        }
    }

    Err(WikiError::PageNotFound(candidates[0].display().to_string()))
}
