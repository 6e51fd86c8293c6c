//! EPUB archive packing.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

/// Zips a staged EPUB directory into the final container.
pub struct EpubCompressor;

impl EpubCompressor {
    pub fn new() -> Self {
        Self
    }

    /// The container spec requires `mimetype` as the first entry, stored
    /// uncompressed. Remaining entries are written in sorted order with a
    /// fixed timestamp so repeated runs produce byte-identical archives.
    pub fn compress(&self, source_dir: &Path, archive_path: &Path) -> Result<()> {
        let file = File::create(archive_path).map_err(|e| Error::io(archive_path, e))?;
        let mut zip = ZipWriter::new(file);

        let fixed_time = zip::DateTime::default();
        let stored = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(fixed_time);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(fixed_time);

        let mimetype_path = source_dir.join("mimetype");
        let mimetype = fs::read(&mimetype_path).map_err(|e| Error::io(&mimetype_path, e))?;
        zip.start_file("mimetype", stored)
            .map_err(|e| zip_error(archive_path, e))?;
        zip.write_all(&mimetype)
            .map_err(|e| Error::io(archive_path, e))?;

        let mut entries = Vec::new();
        collect_files(source_dir, source_dir, &mut entries)?;
        entries.sort();

        for relative in entries {
            if relative == "mimetype" {
                continue;
            }
            let path = source_dir.join(&relative);
            let data = fs::read(&path).map_err(|e| Error::io(&path, e))?;
            zip.start_file(relative, deflated)
                .map_err(|e| zip_error(archive_path, e))?;
            zip.write_all(&data)
                .map_err(|e| Error::io(archive_path, e))?;
        }

        zip.finish().map_err(|e| zip_error(archive_path, e))?;
        Ok(())
    }
}

fn zip_error(path: &Path, source: zip::result::ZipError) -> Error {
    Error::io(path, io::Error::other(source))
}

/// Collect file paths relative to `root`, using `/` separators as zip
/// entry names require.
fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(root, &path, out)?;
        } else {
            let relative = path
                .strip_prefix(root)
                .expect("walked path is under root")
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            out.push(relative);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn stage_minimal_epub(root: &Path) {
        fs::write(root.join("mimetype"), "application/epub+zip").unwrap();
        fs::create_dir_all(root.join("META-INF")).unwrap();
        fs::write(root.join("META-INF").join("container.xml"), "<container/>").unwrap();
        fs::create_dir_all(root.join("OEBPS").join("Text")).unwrap();
        fs::write(root.join("OEBPS").join("content.opf"), "<package/>").unwrap();
        fs::write(
            root.join("OEBPS").join("Text").join("chapter_001.xhtml"),
            "<html/>",
        )
        .unwrap();
    }

    #[test]
    fn mimetype_is_first_and_stored() {
        let staging = tempfile::tempdir().unwrap();
        let book = staging.path().join("book");
        fs::create_dir_all(&book).unwrap();
        stage_minimal_epub(&book);
        let archive_path = staging.path().join("out.epub");

        EpubCompressor::new().compress(&book, &archive_path).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        drop(first);

        let mut opf = archive.by_name("OEBPS/content.opf").unwrap();
        let mut contents = String::new();
        opf.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "<package/>");
    }

    #[test]
    fn repeated_compression_is_byte_identical() {
        let staging = tempfile::tempdir().unwrap();
        let book = staging.path().join("book");
        fs::create_dir_all(&book).unwrap();
        stage_minimal_epub(&book);
        let first = staging.path().join("a.epub");
        let second = staging.path().join("b.epub");

        let compressor = EpubCompressor::new();
        compressor.compress(&book, &first).unwrap();
        compressor.compress(&book, &second).unwrap();
        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }
}
