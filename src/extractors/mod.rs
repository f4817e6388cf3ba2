// src/extractors/mod.rs
pub mod chapter;
pub mod characters;
pub mod section;

// Re-export key extraction types for convenience
pub use chapter::ChapterParser;
