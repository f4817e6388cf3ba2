// src/extractors/chapter.rs
use crate::extractors::characters::extract_characters;
use crate::extractors::section::{COVER_PAGE, LONG_SUMMARY, SHORT_SUMMARY};
use crate::utils::error::ExtractError;
use crate::wiki::models::{Chapter, ChapterUrls, Cover};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// Release dates are written like "January 2, 2006".
const RELEASE_DATE_FORMAT: &str = "%B %d, %Y";
// Footnote marker glued to the date cell, e.g. "July 22, 1997[ref]".
const FOOTNOTE_CHARS: &[char] = &['[', 'r', 'e', 'f', ']'];

// --- CSS Selectors (Lazy Static) ---
static INFO_BOX_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("#mw-content-text > div > aside").expect("Failed to compile INFO_BOX_SELECTOR")
});

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("[data-source=title]").expect("Failed to compile TITLE_SELECTOR")
});

static RELEASE_DATE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("[data-source=date2] > div").expect("Failed to compile RELEASE_DATE_SELECTOR")
});

static COVER_IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("figure > a").expect("Failed to compile COVER_IMAGE_SELECTOR")
});

/// Assembles chapter records from wiki pages.
pub struct ChapterParser {
    urls: ChapterUrls,
}

impl ChapterParser {
    pub fn new(urls: ChapterUrls) -> Self {
        Self { urls }
    }

    pub fn urls(&self) -> &ChapterUrls {
        &self.urls
    }

    /// Parses the HTML of one chapter page.
    pub fn parse(&self, number: u32, html_content: &str) -> Result<Chapter, ExtractError> {
        let document = Html::parse_document(html_content);
        self.parse_document(number, &document)
    }

    /// Builds the full record. Only a missing cover image is an error; every
    /// other missing field degrades to empty text, the sentinel, or `None`.
    pub fn parse_document(&self, number: u32, document: &Html) -> Result<Chapter, ExtractError> {
        let info_box = document.select(&INFO_BOX_SELECTOR).next();
        if info_box.is_none() {
            tracing::warn!("Chapter {}: info box not found", number);
        }

        let title = info_box
            .map(|info| select_text(info, &TITLE_SELECTOR))
            .unwrap_or_default()
            .trim()
            .to_string();

        let release_date = info_box
            .map(|info| select_text(info, &RELEASE_DATE_SELECTOR))
            .and_then(|raw| {
                let parsed = parse_release_date(&raw);
                if parsed.is_none() {
                    tracing::warn!("Chapter {}: could not parse release date '{}'", number, raw);
                }
                parsed
            });

        let image = info_box
            .and_then(|info| info.select(&COVER_IMAGE_SELECTOR).next())
            .and_then(|link| link.value().attr("href"))
            .ok_or(ExtractError::MissingCoverImage(number))?
            .to_string();

        let cover_section = COVER_PAGE.extract(document);

        let chapter = Chapter {
            number,
            title,
            release_date,
            links: self.urls.links(number),
            cover: Cover {
                text: cover_section.text,
                image,
                references: cover_section.references,
            },
            short_summary: SHORT_SUMMARY.extract(document),
            summary: LONG_SUMMARY.extract(document),
            characters: extract_characters(document),
        };

        tracing::debug!(
            "Chapter {} '{}': {} summary references, {} characters",
            number,
            chapter.title,
            chapter.summary.references.len(),
            chapter.characters.len()
        );

        Ok(chapter)
    }
}

// Concatenated text of every match, like reading the whole selection at once.
fn select_text(scope: ElementRef, selector: &Selector) -> String {
    scope.select(selector).flat_map(|el| el.text()).collect()
}

/// Parses an info box date cell, ignoring a trailing `[ref]` footnote marker.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim().trim_matches(FOOTNOTE_CHARS).trim();
    NaiveDate::parse_from_str(cleaned, RELEASE_DATE_FORMAT).ok()
}
