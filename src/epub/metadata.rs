//! EPUB skeleton and metadata documents.
//!
//! Generates the fixed container files plus the three documents that carry
//! the book's structure: `content.opf` (package manifest + spine),
//! `toc.ncx` (legacy navigation), and the EPUB 3 nav document.

use std::fmt::Write as _;
use std::path::Path;

use super::chapter::chapter_filename;
use super::{create_dir_all, write_file};
use crate::error::Result;
use crate::models::Book;

const MIMETYPE: &str = "application/epub+zip";

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

const STYLESHEET: &str = r#"div.svg_outer {
  display: block;
  margin: 0;
  padding: 0;
  text-align: left;
}

div.svg_inner {
  display: block;
  text-align: center;
}

h1, h2 {
  text-align: center;
  page-break-before: always;
  margin-bottom: 10%;
  margin-top: 10%;
}

h3, h4, h5, h6 {
  text-align: center;
  margin-bottom: 15%;
  margin-top: 10%;
}

body {
  margin: 2%;
}

p {
  overflow-wrap: break-word;
}

img {
  display: block;
  min-height: 1em;
  max-height: 100%;
  max-width: 100%;
  margin: 2% auto;
  padding: 0;
}

hr {
  color: black;
  background-color: black;
  height: 2px;
}
"#;

pub struct MetadataGenerator;

impl MetadataGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Create the EPUB directory skeleton and write every metadata document.
    pub fn generate_all(&self, book: &Book, epub_root: &Path) -> Result<()> {
        let oebps = epub_root.join("OEBPS");
        create_dir_all(&epub_root.join("META-INF"))?;
        create_dir_all(&oebps.join("Text"))?;
        create_dir_all(&oebps.join("Images"))?;
        create_dir_all(&oebps.join("Styles"))?;

        write_file(&epub_root.join("mimetype"), MIMETYPE)?;
        write_file(&epub_root.join("META-INF").join("container.xml"), CONTAINER_XML)?;
        write_file(&oebps.join("Styles").join("stylesheet.css"), STYLESHEET)?;
        write_file(&oebps.join("content.opf"), self.content_opf(book))?;
        write_file(&oebps.join("toc.ncx"), self.toc_ncx(book))?;
        write_file(&oebps.join("Text").join("toc.xhtml"), self.nav_document(book))?;
        Ok(())
    }

    pub fn content_opf(&self, book: &Book) -> String {
        let meta = &book.metadata;
        let mut opf = String::new();

        opf.push_str(
            r#"<?xml version="1.0" encoding="utf-8"?>
<package version="3.0" unique-identifier="BookId" xmlns="http://www.idpf.org/2007/opf">
  <metadata xmlns:opf="http://www.idpf.org/2007/opf" xmlns:dc="http://purl.org/dc/elements/1.1/">
"#,
        );
        let _ = writeln!(opf, "    <dc:title>{}</dc:title>", escape_xml(&meta.title));
        let _ = writeln!(opf, "    <dc:language>{}</dc:language>", escape_xml(&meta.language));
        let _ = writeln!(
            opf,
            "    <dc:creator id=\"creator\">{}</dc:creator>",
            escape_xml(&meta.author)
        );
        let _ = writeln!(
            opf,
            "    <meta refines=\"#creator\" property=\"file-as\">{}</meta>",
            escape_xml(&meta.author)
        );
        opf.push_str("    <meta refines=\"#creator\" property=\"role\">aut</meta>\n");
        let _ = writeln!(
            opf,
            "    <dc:identifier id=\"BookId\">{}</dc:identifier>",
            escape_xml(&book.source_url)
        );
        opf.push_str("    <meta refines=\"#BookId\" property=\"identifier-type\">URI</meta>\n");
        if let Some(published) = &book.published {
            let _ = writeln!(
                opf,
                "    <meta property=\"dcterms:modified\">{published}</meta>"
            );
        }
        if book.cover.is_some() {
            opf.push_str("    <meta name=\"cover\" content=\"cover-image\"/>\n");
        }
        opf.push_str("  </metadata>\n  <manifest>\n");

        let cover_filename = book.cover.as_ref().map(|c| c.filename.as_str());
        for (i, image) in book.images.iter().enumerate() {
            let id = if Some(image.filename.as_str()) == cover_filename {
                "cover-image".to_string()
            } else {
                format!("image{}", i + 1)
            };
            let _ = writeln!(
                opf,
                "    <item id=\"{id}\" href=\"Images/{}\" media-type=\"{}\"/>",
                escape_xml(&image.filename),
                media_type(&image.filename)
            );
        }
        for chapter in &book.chapters {
            let _ = writeln!(
                opf,
                "    <item id=\"chapter{}\" href=\"Text/{}\" media-type=\"application/xhtml+xml\"/>",
                chapter.order,
                chapter_filename(chapter.order)
            );
        }
        opf.push_str(
            "    <item id=\"stylesheet\" href=\"Styles/stylesheet.css\" media-type=\"text/css\"/>\n",
        );
        opf.push_str("    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n");
        if book.cover.is_some() {
            opf.push_str(
                "    <item id=\"cover\" href=\"Text/Cover.xhtml\" media-type=\"application/xhtml+xml\" properties=\"svg\"/>\n",
            );
        }
        opf.push_str(
            "    <item id=\"nav\" href=\"Text/toc.xhtml\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>\n",
        );
        opf.push_str("  </manifest>\n  <spine toc=\"ncx\">\n");

        if book.cover.is_some() {
            opf.push_str("    <itemref idref=\"cover\"/>\n");
        }
        for chapter in &book.chapters {
            let _ = writeln!(opf, "    <itemref idref=\"chapter{}\"/>", chapter.order);
        }
        opf.push_str("    <itemref idref=\"nav\"/>\n  </spine>\n");

        if book.cover.is_some() {
            opf.push_str(
                "  <guide>\n    <reference type=\"cover\" title=\"Cover\" href=\"Text/Cover.xhtml\"/>\n  </guide>\n",
            );
        }
        opf.push_str("</package>\n");
        opf
    }

    pub fn toc_ncx(&self, book: &Book) -> String {
        let mut ncx = String::new();
        ncx.push_str(
            r#"<?xml version="1.0" encoding="utf-8"?>
<ncx version="2005-1" xml:lang="en" xmlns="http://www.daisy.org/z3986/2005/ncx/">
  <head>
"#,
        );
        let _ = writeln!(
            ncx,
            "    <meta content=\"{}\" name=\"dtb:uid\"/>",
            escape_xml(&book.source_url)
        );
        ncx.push_str(
            r#"    <meta content="1" name="dtb:depth"/>
    <meta content="0" name="dtb:totalPageCount"/>
    <meta content="0" name="dtb:maxPageNumber"/>
  </head>
  <docTitle>
"#,
        );
        let _ = writeln!(ncx, "    <text>{}</text>", escape_xml(&book.metadata.title));
        ncx.push_str("  </docTitle>\n  <navMap>\n");

        for chapter in &book.chapters {
            let _ = writeln!(
                ncx,
                r#"    <navPoint id="chapter{order}" playOrder="{order}">
      <navLabel>
        <text>{title}</text>
      </navLabel>
      <content src="Text/{file}"/>
    </navPoint>"#,
                order = chapter.order,
                title = escape_xml(&chapter.title),
                file = chapter_filename(chapter.order)
            );
        }
        ncx.push_str("  </navMap>\n</ncx>\n");
        ncx
    }

    pub fn nav_document(&self, book: &Book) -> String {
        let mut nav = String::new();
        nav.push_str(
            r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="en" xmlns:epub="http://www.idpf.org/2007/ops" lang="en">
  <head>
    <title>Table of Contents</title>
  </head>
  <body>
    <nav epub:type="toc" id="toc">
      <h1>Table of Contents</h1>
      <ol>
"#,
        );
        for chapter in &book.chapters {
            let _ = writeln!(
                nav,
                "        <li>\n          <a href=\"../Text/{}\">{}</a>\n        </li>",
                chapter_filename(chapter.order),
                escape_xml(&chapter.title)
            );
        }
        nav.push_str("      </ol>\n    </nav>\n  </body>\n</html>\n");
        nav
    }
}

pub(crate) fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn media_type(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "image/jpeg",
    }
}
