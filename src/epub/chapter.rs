//! Chapter and cover page generation.

use std::fmt::Write as _;
use std::path::Path;

use super::metadata::escape_xml;
use super::write_file;
use crate::error::Result;
use crate::models::{Book, Chapter, Cover};

pub struct ChapterGenerator;

impl ChapterGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Write the cover page (when there is one) and every chapter XHTML file
    /// under `OEBPS/Text`.
    pub fn generate_all(&self, book: &Book, epub_root: &Path) -> Result<()> {
        let text_dir = epub_root.join("OEBPS").join("Text");

        if let Some(cover) = &book.cover {
            write_file(&text_dir.join("Cover.xhtml"), self.cover_xhtml(cover))?;
        }
        for chapter in &book.chapters {
            write_file(
                &text_dir.join(chapter_filename(chapter.order)),
                self.chapter_xhtml(chapter),
            )?;
        }
        Ok(())
    }

    /// The chapter body already carries its own heading from the source
    /// page, so the document is just the cleaned content plus stylesheet.
    pub fn chapter_xhtml(&self, chapter: &Chapter) -> String {
        let mut xhtml = String::new();
        xhtml.push_str(
            r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
  <head>
"#,
        );
        let _ = writeln!(xhtml, "    <title>{}</title>", escape_xml(&chapter.title));
        xhtml.push_str(
            r#"    <link href="../Styles/stylesheet.css" type="text/css" rel="stylesheet"/>
  </head>
  <body>
"#,
        );
        xhtml.push_str(&chapter.body);
        xhtml.push_str("\n  </body>\n</html>\n");
        xhtml
    }

    /// SVG-wrapped cover image, scaled to the viewport while keeping the
    /// original aspect ratio.
    pub fn cover_xhtml(&self, cover: &Cover) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
  <head>
    <title>Cover</title>
    <link href="../Styles/stylesheet.css" type="text/css" rel="stylesheet"/>
  </head>
  <body>
    <div class="svg_outer svg_inner">
      <svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" height="99%" width="100%" version="1.1" preserveAspectRatio="xMidYMid meet" viewBox="0 0 {width} {height}">
        <image xlink:href="../Images/{filename}" width="{width}" height="{height}"/>
      </svg>
    </div>
  </body>
</html>
"#,
            width = cover.width,
            height = cover.height,
            filename = escape_xml(&cover.filename),
        )
    }
}

pub(crate) fn chapter_filename(order: usize) -> String {
    format!("chapter_{order:03}.xhtml")
}
