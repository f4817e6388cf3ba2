// src/extractors/section.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use crate::wiki::models::{ExtractedSection, Reference, NOT_AVAILABLE};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// --- Heading Anchors ---
pub const COVER_PAGE_QUERY: &str = "#Cover_Page";
pub const SHORT_SUMMARY_QUERY: &str = "#Short_Summary";
pub const LONG_SUMMARY_QUERY: &str = "#Long_Summary";

/// Link targets whose anchor text is replaced by a fixed label.
/// Exact matches only; anything else keeps the text it was written with.
const RELABELED_TARGETS: [(&str, &str); 2] = [
    ("/wiki/Belly", "Belly"),
    ("/wiki/Belly#Other_Currencies", "Belly Other currencies"),
];

// --- CSS Selectors (Lazy Static) ---
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a").expect("Failed to compile LINK_SELECTOR")
});

pub static COVER_PAGE: Lazy<SectionExtractor> = Lazy::new(|| {
    SectionExtractor::new(COVER_PAGE_QUERY).expect("Failed to compile COVER_PAGE extractor")
});

pub static SHORT_SUMMARY: Lazy<SectionExtractor> = Lazy::new(|| {
    SectionExtractor::new(SHORT_SUMMARY_QUERY).expect("Failed to compile SHORT_SUMMARY extractor")
});

pub static LONG_SUMMARY: Lazy<SectionExtractor> = Lazy::new(|| {
    SectionExtractor::new(LONG_SUMMARY_QUERY).expect("Failed to compile LONG_SUMMARY extractor")
});

/// Reads the paragraph run that follows a heading anchor.
///
/// The anchor usually sits inside the heading element (`<h2><span id="Cover_Page">`),
/// so traversal starts at the anchor's parent and walks its following element
/// siblings for as long as they are `<p>` elements.
#[derive(Debug)]
pub struct SectionExtractor {
    query: String,
    heading: Selector,
}

impl SectionExtractor {
    /// Compiles the heading selector. Fails only if `query` is not valid CSS.
    pub fn new(query: &str) -> Result<Self, ExtractError> {
        let heading = Selector::parse(query)
            .map_err(|_| ExtractError::InvalidSelector(query.to_string()))?;
        Ok(Self {
            query: query.to_string(),
            heading,
        })
    }

    /// Extracts the text and references of the section. A heading that is not
    /// present yields the sentinel text and no references.
    pub fn extract(&self, document: &Html) -> ExtractedSection {
        let mut text = String::new();
        let mut references = Vec::new();

        let mut cursor = document
            .select(&self.heading)
            .next()
            .and_then(|anchor| anchor.parent())
            .and_then(ElementRef::wrap)
            .and_then(next_element_sibling);

        while let Some(paragraph) = cursor.filter(|el| el.value().name() == "p") {
            text.extend(paragraph.text());
            references.extend(paragraph.select(&LINK_SELECTOR).map(link_reference));
            cursor = next_element_sibling(paragraph);
        }

        if text.is_empty() && references.is_empty() {
            tracing::debug!("No paragraphs found under '{}'", self.query);
        }

        for reference in references.iter_mut() {
            relabel(reference);
        }

        let mut text = escape_text(&text.replace('\n', ""));
        if text.is_empty() {
            text = NOT_AVAILABLE.to_string();
        }

        tracing::trace!("Section '{}': {} bytes, {} references", self.query, text.len(), references.len());
        ExtractedSection { text, references }
    }
}

/// Builds a reference from an `<a>` element. A missing `href` becomes an empty target.
pub(crate) fn link_reference(link: ElementRef) -> Reference {
    Reference::new(
        link.text().collect::<String>(),
        link.value().attr("href").unwrap_or_default(),
    )
}

// Quotes use the numeric entities the chapters API has always received.
fn escape_text(text: &str) -> String {
    html_escape::encode_text(text)
        .replace('"', "&#34;")
        .replace('\'', "&#39;")
}

fn relabel(reference: &mut Reference) {
    if let Some((_, label)) = RELABELED_TARGETS
        .iter()
        .find(|(target, _)| *target == reference.wiki)
    {
        reference.name = label.to_string();
    }
}

// Text and comment nodes between elements are skipped.
fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Html {
        Html::parse_document(&format!(
            "<!DOCTYPE html><html><head><title>Chapter</title></head><body>{}</body></html>",
            body
        ))
    }

    #[test]
    fn test_paragraphs_without_links() {
        let doc = page(r#"
            <h2><span class="mw-headline" id="Short_Summary">Short Summary</span></h2>
            <p>Luffy sets sail.</p>
            <p>Zoro joins the crew.</p>
        "#);

        let section = SHORT_SUMMARY.extract(&doc);
        assert_eq!(section.text, "Luffy sets sail.Zoro joins the crew.");
        assert!(section.references.is_empty());
    }

    #[test]
    fn test_missing_heading_yields_sentinel() {
        let doc = page("<h2><span id=\"Long_Summary\">Long Summary</span></h2><p>Text</p>");

        let section = COVER_PAGE.extract(&doc);
        assert_eq!(section.text, NOT_AVAILABLE);
        assert!(section.references.is_empty());
    }

    #[test]
    fn test_heading_followed_by_non_paragraph() {
        let doc = page(r#"
            <h2><span id="Cover_Page">Cover Page</span></h2>
            <figure><img src="cover.png"></figure>
            <p>Not part of the run.</p>
        "#);

        let section = COVER_PAGE.extract(&doc);
        assert_eq!(section.text, NOT_AVAILABLE);
        assert!(section.references.is_empty());
    }

    #[test]
    fn test_run_stops_at_first_non_paragraph() {
        let doc = page(r#"
            <h2><span id="Long_Summary">Long Summary</span></h2>
            <p>One.</p>
            <p>Two.</p>
            <p>Three.</p>
            <h3>Next Section</h3>
            <p>Four <a href="/wiki/Nami">Nami</a>.</p>
        "#);

        let section = LONG_SUMMARY.extract(&doc);
        assert_eq!(section.text, "One.Two.Three.");
        assert!(!section.text.contains("Four"));
        assert!(section.references.is_empty());
    }

    #[test]
    fn test_belly_targets_are_relabeled() {
        let doc = page(r#"
            <h2><span id="Cover_Page">Cover Page</span></h2>
            <p>A bounty of 30,000,000 <a href="/wiki/Belly">berries</a>
            paid in <a href="/wiki/Belly#Other_Currencies">other money</a>
            and <a href="/wiki/Belly#History">history</a>.</p>
        "#);

        let section = COVER_PAGE.extract(&doc);
        assert_eq!(
            section.references,
            vec![
                Reference::new("Belly", "/wiki/Belly"),
                Reference::new("Belly Other currencies", "/wiki/Belly#Other_Currencies"),
                Reference::new("history", "/wiki/Belly#History"),
            ]
        );
    }

    #[test]
    fn test_text_is_html_escaped() {
        let doc = page(r#"
            <h2><span id="Short_Summary">Short Summary</span></h2>
            <p>Usopp &amp; Chopper say 1 &lt; 2</p>
        "#);

        let section = SHORT_SUMMARY.extract(&doc);
        assert_eq!(section.text, "Usopp &amp; Chopper say 1 &lt; 2");
    }

    #[test]
    fn test_quotes_use_numeric_entities() {
        let doc = page(r#"
            <h2><span id="Short_Summary">Short Summary</span></h2>
            <p>Luffy's "hat" &gt; 1 &amp; 2 &lt; 3</p>
        "#);

        let section = SHORT_SUMMARY.extract(&doc);
        assert_eq!(section.text, "Luffy&#39;s &#34;hat&#34; &gt; 1 &amp; 2 &lt; 3");
    }

    #[test]
    fn test_newlines_are_stripped() {
        let doc = page("<h2><span id=\"Short_Summary\">S</span></h2><p>Line one\nline two\n</p>");

        let section = SHORT_SUMMARY.extract(&doc);
        assert_eq!(section.text, "Line oneline two");
    }

    #[test]
    fn test_references_follow_document_order() {
        let doc = page(r#"
            <h2><span id="Long_Summary">Long Summary</span></h2>
            <p><a href="/wiki/A">A</a> meets <a href="/wiki/B">B</a>.</p>
            <p>Later <a href="/wiki/C">C</a> arrives, and <a href="/wiki/A">A</a> again.</p>
        "#);

        let section = LONG_SUMMARY.extract(&doc);
        let names: Vec<&str> = section.references.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn test_link_without_href_has_empty_target() {
        let doc = page(r#"
            <h2><span id="Cover_Page">Cover Page</span></h2>
            <p>See <a name="anchor">the anchor</a>.</p>
        "#);

        let section = COVER_PAGE.extract(&doc);
        assert_eq!(section.references, vec![Reference::new("the anchor", "")]);
        assert_eq!(section.text, "See the anchor.");
    }

    #[test]
    fn test_nested_link_text_is_collected() {
        let doc = page(r#"
            <h2><span id="Cover_Page">Cover Page</span></h2>
            <p><b><a href="/wiki/Buggy">Buggy <i>the Clown</i></a></b></p>
        "#);

        let section = COVER_PAGE.extract(&doc);
        assert_eq!(section.references, vec![Reference::new("Buggy the Clown", "/wiki/Buggy")]);
    }

    #[test]
    fn test_custom_selector() {
        let extractor = SectionExtractor::new("#Notes").unwrap();
        let doc = page("<h2><span id=\"Notes\">Notes</span></h2><p>First appearance.</p>");

        assert_eq!(extractor.extract(&doc).text, "First appearance.");
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let result = SectionExtractor::new("div[");
        assert!(matches!(result, Err(ExtractError::InvalidSelector(q)) if q == "div["));
    }
}
