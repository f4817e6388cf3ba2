// src/storage/files.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::utils::error::StorageError;
use crate::wiki::models::Chapter;

/// Writes one pretty-printed JSON document per chapter under a base directory.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Creates a new FileStore, creating the base directory if needed
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Path the given chapter is written to
    pub fn chapter_path(&self, number: u32) -> PathBuf {
        self.base_dir.join(format!("chapter_{}.json", number))
    }

    /// Saves the chapter together with the time it was scraped
    pub fn save_chapter(&self, chapter: &Chapter) -> Result<PathBuf, StorageError> {
        let file_path = self.chapter_path(chapter.number);

        let mut document = serde_json::to_value(chapter)?;
        document["scraped_at"] = serde_json::Value::String(chrono::Utc::now().to_rfc3339());

        fs::write(&file_path, serde_json::to_string_pretty(&document)?)?;

        tracing::info!("Saved chapter {} to {}", chapter.number, file_path.display());
        Ok(file_path)
    }

    /// Keeps the raw page next to the output for debugging selector problems
    pub fn save_raw_page(&self, number: u32, html: &str) -> Result<PathBuf, StorageError> {
        let debug_dir = self.base_dir.join("debug");
        if !debug_dir.exists() {
            fs::create_dir_all(&debug_dir)?;
        }

        let file_path = debug_dir.join(format!("chapter_{}.html", number));
        fs::write(&file_path, html)?;

        tracing::debug!("Saved raw page for chapter {} to {}", number, file_path.display());
        Ok(file_path)
    }
}
