use serde::{Deserialize, Serialize};

/// A chapter link found on the table of contents page, in reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterRef {
    pub title: String,
    pub url: String,
    /// 1-based position within the table of contents.
    pub order: usize,
    /// Volume number from the nearest preceding "Volume N" heading, if any.
    pub volume: Option<u32>,
}

/// A fetched chapter ready for assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    /// Cleaned inner XHTML of the chapter body.
    pub body: String,
    pub order: usize,
    /// Illustration URLs referenced by the body.
    pub images: Vec<String>,
}

/// Book-level metadata supplied by the CLI driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub language: String,
    pub volume: Option<u32>,
}

/// Cover image reference from the table of contents page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cover {
    pub url: String,
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

/// A downloaded image payload, keyed by its packaged filename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAsset {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Everything the assembler needs to package one EPUB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub metadata: BookMetadata,
    /// TOC page URL, used as the book identifier.
    pub source_url: String,
    /// Published time from the TOC page, formatted as UTC. Omitted from the
    /// package when the page carries none so output stays reproducible.
    pub published: Option<String>,
    pub cover: Option<Cover>,
    pub chapters: Vec<Chapter>,
    pub images: Vec<ImageAsset>,
}
