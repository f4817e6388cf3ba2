// src/extractors/characters.rs
use crate::extractors::section::link_reference;
use crate::wiki::models::Reference;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static CHARACTER_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".CharTable a").expect("Failed to compile CHARACTER_LINK_SELECTOR")
});

/// Collects one reference per link in the character table, in document order.
/// Link text is kept as written.
pub fn extract_characters(document: &Html) -> Vec<Reference> {
    let characters: Vec<Reference> = document
        .select(&CHARACTER_LINK_SELECTOR)
        .map(link_reference)
        .collect();

    tracing::debug!("Found {} character references", characters.len());
    characters
}
