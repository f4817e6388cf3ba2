// src/storage/mod.rs
pub mod api;
pub mod files;
pub mod sqlite;

use crate::utils::error::StorageError;
use crate::wiki::models::Chapter;

pub use api::ApiPusher;
pub use files::FileStore;
pub use sqlite::SqliteStore;

/// The backend a run persists chapters to.
pub enum ChapterSink {
    Api(ApiPusher),
    Sqlite(SqliteStore),
    Files(FileStore),
}

impl ChapterSink {
    pub async fn store(&self, chapter: &Chapter) -> Result<(), StorageError> {
        match self {
            ChapterSink::Api(pusher) => pusher.push_chapter(chapter).await,
            ChapterSink::Sqlite(store) => store.save_chapter(chapter),
            ChapterSink::Files(store) => store.save_chapter(chapter).map(|_| ()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ChapterSink::Api(pusher) => format!("API at {}", pusher.endpoint()),
            ChapterSink::Sqlite(_) => "SQLite database".to_string(),
            ChapterSink::Files(_) => "JSON files".to_string(),
        }
    }
}
