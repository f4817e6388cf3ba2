// src/storage/api.rs
use crate::utils::error::StorageError;
use crate::wiki::models::Chapter;
use reqwest::header;

/// Pushes chapter records to the remote chapters API as JSON.
pub struct ApiPusher {
    client: reqwest::Client,
    endpoint: String,
}

impl ApiPusher {
    pub fn new(endpoint: &str) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POSTs one chapter. Any non-2xx response is returned as a rejection with its body.
    pub async fn push_chapter(&self, chapter: &Chapter) -> Result<(), StorageError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(chapter) // Sets Content-Type: application/json
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::info!("API responded {} for chapter {}", status, chapter.number);
        tracing::debug!("API response body: {}", body);

        if !status.is_success() {
            return Err(StorageError::Rejected(status, body));
        }
        Ok(())
    }
}
