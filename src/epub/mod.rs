pub mod chapter;
pub mod compression;
pub mod metadata;

pub use chapter::ChapterGenerator;
pub use compression::EpubCompressor;
pub use metadata::MetadataGenerator;

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::Book;

/// Packages an assembled [`Book`] into an EPUB file.
///
/// The whole tree is staged inside a temp directory and the output path is
/// written only once the archive is complete, so a failed run never leaves a
/// partial file behind.
pub struct EpubBuilder {
    book: Option<Book>,
    output: Option<PathBuf>,
}

impl EpubBuilder {
    pub fn new() -> Self {
        Self {
            book: None,
            output: None,
        }
    }

    pub fn book(mut self, book: Book) -> Self {
        self.book = Some(book);
        self
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn build(self) -> Result<PathBuf> {
        let book = self
            .book
            .ok_or_else(|| Error::config("book is required"))?;
        let output = self
            .output
            .ok_or_else(|| Error::config("output path is required"))?;

        let staging = TempDir::new().map_err(|e| Error::io("epub staging", e))?;
        let root = staging.path().join("book");

        MetadataGenerator::new().generate_all(&book, &root)?;
        ChapterGenerator::new().generate_all(&book, &root)?;

        let images_dir = root.join("OEBPS").join("Images");
        for asset in &book.images {
            write_file(&images_dir.join(&asset.filename), &asset.data)?;
        }

        let archive = staging.path().join("book.epub");
        EpubCompressor::new().compress(&root, &archive)?;

        // Copy next to the destination and rename into place, so an
        // interrupted write never leaves a truncated file at the output
        // path.
        let partial = output.with_extension("epub.part");
        let installed = fs::copy(&archive, &partial)
            .and_then(|_| fs::rename(&partial, &output));
        if let Err(e) = installed {
            let _ = fs::remove_file(&partial);
            return Err(Error::io(&output, e));
        }
        info!("EPUB written to {}", output.display());
        Ok(output)
    }
}

impl Default for EpubBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::io(path, e))
}

pub(crate) fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}
