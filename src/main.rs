// src/main.rs
mod extractors;
mod storage;
mod utils;
mod wiki;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use extractors::ChapterParser;
use storage::{ApiPusher, ChapterSink, FileStore, SqliteStore};
use utils::AppError;
use wiki::client::PageSource;
use wiki::models::ChapterUrls;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// POST each chapter to the chapters API
    Api,
    /// Write chapters and tag associations to a SQLite database
    Sqlite,
    /// Write one JSON file per chapter
    Files,
}

/// Scrapes chapter pages from the wiki and stores them as structured records
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First chapter number to scrape
    #[arg(short, long, default_value_t = 1)]
    start: u32,

    /// Last chapter number to scrape (inclusive)
    #[arg(short, long, default_value_t = 1022)]
    end: u32,

    /// Where scraped chapters are stored
    #[arg(short, long, value_enum, default_value_t = Backend::Files)]
    backend: Backend,

    /// Chapters API endpoint (required for the api backend)
    #[arg(long, env = "CHAPTER_API_URL")]
    api_url: Option<String>,

    /// SQLite database path for the sqlite backend
    #[arg(long, default_value = "./chapters.sqlite")]
    database: PathBuf,

    /// Output directory for JSON files and debug pages
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// Read pages from a local dump directory instead of the wiki
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Wiki page URL template, `{}` is replaced by the chapter number
    #[arg(long, default_value = "https://onepiece.fandom.com/wiki/Chapter_{}")]
    wiki_url: String,

    /// Online reader URL template, `{}` is replaced by the chapter number
    #[arg(long, default_value = "https://manganelo.com/chapter/tkqu521609849722/chapter_{}")]
    reader_url: String,

    /// Debug mode - save the raw page of every chapter
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting scrape with args: {:?}", args);

    if args.start > args.end {
        return Err(AppError::Config(format!(
            "start chapter {} is after end chapter {}",
            args.start, args.end
        )));
    }
    for template in [&args.wiki_url, &args.reader_url] {
        if !template.contains("{}") {
            return Err(AppError::Config(format!("URL template '{}' has no {{}} placeholder", template)));
        }
    }

    // 3. Initialize storage
    let sink = build_sink(&args)?;
    let debug_store = if args.debug {
        Some(FileStore::new(&args.output_dir)?)
    } else {
        None
    };
    tracing::info!("Storing chapters to {}", sink.describe());

    // 4. Initialize parser and page source
    let parser = ChapterParser::new(ChapterUrls {
        wiki_template: args.wiki_url.clone(),
        reader_template: args.reader_url.clone(),
    });
    let source = match &args.dump_dir {
        Some(dir) => PageSource::Dump(dir.clone()),
        None => PageSource::Remote,
    };

    // 5. Process each chapter in order; the first failure ends the run
    let mut processed = 0;
    for number in args.start..=args.end {
        if let Err(e) = process_chapter(number, &parser, &source, &sink, debug_store.as_ref()).await {
            tracing::error!("Chapter {} failed: {}", number, e);
            tracing::info!("Stopped after {} chapters", processed);
            return Err(e);
        }
        processed += 1;
    }

    tracing::info!("Processing finished. {} chapters stored", processed);
    Ok(())
}

fn build_sink(args: &Args) -> Result<ChapterSink, AppError> {
    let sink = match args.backend {
        Backend::Api => {
            let url = args.api_url.as_deref().ok_or_else(|| {
                AppError::Config("the api backend needs --api-url or CHAPTER_API_URL".to_string())
            })?;
            ChapterSink::Api(ApiPusher::new(url)?)
        }
        Backend::Sqlite => ChapterSink::Sqlite(SqliteStore::open(&args.database)?),
        Backend::Files => ChapterSink::Files(FileStore::new(&args.output_dir)?),
    };
    Ok(sink)
}

async fn process_chapter(
    number: u32,
    parser: &ChapterParser,
    source: &PageSource,
    sink: &ChapterSink,
    debug_store: Option<&FileStore>,
) -> Result<(), AppError> {
    let url = parser.urls().wiki_url(number);
    tracing::info!("Processing chapter {} ({})", number, url);

    let html = source.load(number, &url).await?;
    tracing::debug!("Loaded chapter {} page ({} bytes)", number, html.len());

    // Debug copies are best effort; only fetch, parse and store failures end the run.
    if let Some(store) = debug_store {
        if let Err(e) = store.save_raw_page(number, &html) {
            tracing::warn!("Failed to save raw page for chapter {}: {}", number, e);
        }
    }

    let chapter = parser.parse(number, &html)?;
    sink.store(&chapter).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["chapter_scraper"]);
        assert_eq!(args.start, 1);
        assert_eq!(args.end, 1022);
        assert_eq!(args.backend, Backend::Files);
        assert!(!args.debug);
    }

    #[test]
    fn test_api_backend_requires_url() {
        let mut args = Args::parse_from(["chapter_scraper", "--backend", "api"]);
        args.api_url = None; // ignore CHAPTER_API_URL from the environment
        assert!(matches!(build_sink(&args), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_process_chapter_from_dump() {
        let dump = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(
            dump.path().join("chapter_3"),
            r#"<html><body><div id="mw-content-text"><div>
                <aside>
                  <h2 data-source="title">Introduce Captain Usopp</h2>
                  <figure><a href="cover_3.png">cover</a></figure>
                </aside>
                <h2><span id="Short_Summary">Short Summary</span></h2>
                <p>Luffy and <a href="/wiki/Roronoa_Zoro">Zoro</a> escape.</p>
            </div></div></body></html>"#,
        )
        .unwrap();

        let parser = ChapterParser::new(ChapterUrls::default());
        let source = PageSource::Dump(dump.path().to_path_buf());
        let store = FileStore::new(out.path()).unwrap();
        let debug_store = FileStore::new(out.path()).unwrap();
        let sink = ChapterSink::Files(store);

        process_chapter(3, &parser, &source, &sink, Some(&debug_store)).await.unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.path().join("chapter_3.json")).unwrap()).unwrap();
        assert_eq!(saved["title"], "Introduce Captain Usopp");
        assert_eq!(saved["cover"]["image"], "cover_3.png");
        assert_eq!(saved["short_summary"]["text"], "Luffy and Zoro escape.");
        assert_eq!(saved["summary"]["text"], "Not Available");
        assert!(out.path().join("debug").join("chapter_3.html").exists());
    }

    #[tokio::test]
    async fn test_debug_copy_failure_still_stores_chapter() {
        let dump = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let debug_out = tempfile::tempdir().unwrap();
        std::fs::write(
            dump.path().join("chapter_4.html"),
            r#"<html><body><div id="mw-content-text"><div>
                <aside><figure><a href="cover_4.png">cover</a></figure></aside>
            </div></div></body></html>"#,
        )
        .unwrap();
        // A plain file where the debug directory should be makes the raw page write fail
        std::fs::write(debug_out.path().join("debug"), "").unwrap();

        let parser = ChapterParser::new(ChapterUrls::default());
        let source = PageSource::Dump(dump.path().to_path_buf());
        let sink = ChapterSink::Files(FileStore::new(out.path()).unwrap());
        let debug_store = FileStore::new(debug_out.path()).unwrap();

        process_chapter(4, &parser, &source, &sink, Some(&debug_store)).await.unwrap();
        assert!(out.path().join("chapter_4.json").exists());
    }

    #[tokio::test]
    async fn test_process_chapter_missing_page_fails() {
        let dump = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let parser = ChapterParser::new(ChapterUrls::default());
        let source = PageSource::Dump(dump.path().to_path_buf());
        let sink = ChapterSink::Files(FileStore::new(out.path()).unwrap());

        let result = process_chapter(9, &parser, &source, &sink, None).await;
        assert!(matches!(result, Err(AppError::Wiki(_))));
    }
}
