// src/storage/sqlite.rs
use std::path::Path;
use rusqlite::{params, Connection, OptionalExtension};
use crate::utils::error::StorageError;
use crate::wiki::models::{Chapter, Reference};

/// Where in the chapter a tag was referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSection {
    Cover,
    ShortSummary,
    Summary,
    Character,
}

impl TagSection {
    pub fn as_str(self) -> &'static str {
        match self {
            TagSection::Cover => "cover",
            TagSection::ShortSummary => "short_summary",
            TagSection::Summary => "summary",
            TagSection::Character => "character",
        }
    }
}

/// Relational chapter store. References become rows in `tags`, keyed by their
/// wiki target, linked to chapters through `chapter_tags`.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref())?;
        tracing::info!("Opened chapter database at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Inserts or replaces a chapter with its links and tag associations, atomically.
    pub fn save_chapter(&self, chapter: &Chapter) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO chapters
                (number, title, release_date, cover_text, cover_image, short_summary, summary)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(number) DO UPDATE SET
                title = excluded.title,
                release_date = excluded.release_date,
                cover_text = excluded.cover_text,
                cover_image = excluded.cover_image,
                short_summary = excluded.short_summary,
                summary = excluded.summary",
            params![
                chapter.number,
                chapter.title,
                chapter.release_date.map(|date| date.to_string()),
                chapter.cover.text,
                chapter.cover.image,
                chapter.short_summary.text,
                chapter.summary.text,
            ],
        )?;

        tx.execute("DELETE FROM chapter_links WHERE chapter_number = ?1", params![chapter.number])?;
        tx.execute("DELETE FROM chapter_tags WHERE chapter_number = ?1", params![chapter.number])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO chapter_links (chapter_number, name, value) VALUES (?1, ?2, ?3)",
            )?;
            for link in &chapter.links {
                stmt.execute(params![chapter.number, link.name, link.value])?;
            }
        }

        let groups = [
            (TagSection::Cover, &chapter.cover.references),
            (TagSection::ShortSummary, &chapter.short_summary.references),
            (TagSection::Summary, &chapter.summary.references),
            (TagSection::Character, &chapter.characters),
        ];

        let mut tag_count = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO chapter_tags (chapter_number, tag_id, section, position)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (section, references) in groups {
                for (position, reference) in references.iter().enumerate() {
                    let tag_id = find_or_create_tag(&tx, reference)?;
                    stmt.execute(params![chapter.number, tag_id, section.as_str(), position as i64])?;
                    tag_count += 1;
                }
            }
        }

        tx.commit()?;
        tracing::info!("Stored chapter {} with {} tag associations", chapter.number, tag_count);
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS chapters (
            number        INTEGER PRIMARY KEY,
            title         TEXT NOT NULL,
            release_date  TEXT,
            cover_text    TEXT NOT NULL,
            cover_image   TEXT NOT NULL,
            short_summary TEXT NOT NULL,
            summary       TEXT NOT NULL,
            updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS chapter_links (
            chapter_number INTEGER NOT NULL REFERENCES chapters(number) ON DELETE CASCADE,
            name           TEXT NOT NULL,
            value          TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_chapter_links_chapter ON chapter_links(chapter_number);

        CREATE TABLE IF NOT EXISTS tags (
            id   INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            wiki TEXT NOT NULL UNIQUE
        );

        -- Many-to-many: a chapter references many tags, a tag appears in many chapters
        CREATE TABLE IF NOT EXISTS chapter_tags (
            chapter_number INTEGER NOT NULL REFERENCES chapters(number) ON DELETE CASCADE,
            tag_id         INTEGER NOT NULL REFERENCES tags(id),
            section        TEXT NOT NULL CHECK(section IN ('cover','short_summary','summary','character')),
            position       INTEGER NOT NULL,
            PRIMARY KEY (chapter_number, section, position)
        );
        CREATE INDEX IF NOT EXISTS idx_chapter_tags_tag ON chapter_tags(tag_id);
        ",
    )?;
    Ok(())
}

// Tags are shared by wiki target; the first label seen for a target is kept.
fn find_or_create_tag(conn: &Connection, reference: &Reference) -> Result<i64, StorageError> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM tags WHERE wiki = ?1",
            params![reference.wiki],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    conn.execute(
        "INSERT INTO tags (name, wiki) VALUES (?1, ?2)",
        params![reference.name, reference.wiki],
    )?;
    Ok(conn.last_insert_rowid())
}
