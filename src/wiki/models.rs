// src/wiki/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder text for a section that yielded no paragraph text.
pub const NOT_AVAILABLE: &str = "Not Available";

/// A display label paired with the link target it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    pub wiki: String, // Relative wiki path or external URL
}

impl Reference {
    pub fn new(name: impl Into<String>, wiki: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wiki: wiki.into(),
        }
    }
}

/// Text and references gathered from the paragraph run under one heading.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub text: String,
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cover {
    pub text: String,
    pub image: String,
    pub references: Vec<Reference>,
}

/// Full record assembled from one chapter page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u32,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub links: Vec<Link>,
    pub cover: Cover,
    pub short_summary: ExtractedSection,
    pub summary: ExtractedSection,
    pub characters: Vec<Reference>,
}

/// URL templates for one chapter; `{}` is replaced by the chapter number.
#[derive(Debug, Clone)]
pub struct ChapterUrls {
    pub wiki_template: String,
    pub reader_template: String,
}

impl Default for ChapterUrls {
    fn default() -> Self {
        Self {
            wiki_template: "https://onepiece.fandom.com/wiki/Chapter_{}".to_string(),
            reader_template: "https://manganelo.com/chapter/tkqu521609849722/chapter_{}".to_string(),
        }
    }
}

impl ChapterUrls {
    /// Wiki page for the given chapter
    pub fn wiki_url(&self, number: u32) -> String {
        self.wiki_template.replace("{}", &number.to_string())
    }

    /// Online reader page for the given chapter
    pub fn reader_url(&self, number: u32) -> String {
        self.reader_template.replace("{}", &number.to_string())
    }

    /// The `links` list attached to every chapter record.
    pub fn links(&self, number: u32) -> Vec<Link> {
        vec![
            Link {
                name: "wiki".to_string(),
                value: self.wiki_url(number),
            },
            Link {
                name: "manganelo".to_string(),
                value: self.reader_url(number),
            },
        ]
    }
}
