pub mod crawler;
pub mod epub;
pub mod error;
pub mod models;

pub use crawler::CclawCrawler;
pub use epub::EpubBuilder;
pub use error::{Error, Result};
pub use models::{Book, BookMetadata, Chapter, ChapterRef, Cover, ImageAsset};
