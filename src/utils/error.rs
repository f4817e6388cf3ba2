// src/utils/error.rs
use thiserror::Error;

// Specific error types for each layer of the scraper
#[derive(Error, Debug)]
pub enum WikiError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 403 Forbidden, 500

    #[error("Wiki page not found: {0}")]
    PageNotFound(String),

    #[error("Failed to read page dump: {0}")]
    Dump(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid CSS selector '{0}'")]
    InvalidSelector(String),

    #[error("Cover image not found for chapter {0}")]
    MissingCoverImage(u32),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("API request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API rejected chapter ({0}): {1}")]
    Rejected(reqwest::StatusCode, String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wiki interaction failed: {0}")]
    Wiki(#[from] WikiError), // Automatically convert fetch errors

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
