//! Chapter content extraction.
//!
//! Chapter pages carry the prose inside `div.entry-content`, surrounded by
//! WordPress boilerplate: a navigation preamble before the chapter heading,
//! share widgets, ad wrappers, spacers, and inline scripts. Extraction keeps
//! only the narrative elements and rewrites illustration references to the
//! packaged image paths.

use scraper::{ElementRef, Html, Selector};

use super::images::filename_from_url;
use crate::error::{Error, Result};

/// Cleaned chapter body plus the illustration URLs it references.
#[derive(Debug, Clone)]
pub struct ChapterContent {
    pub body: String,
    pub images: Vec<String>,
}

/// Classes marking non-narrative blocks inside entry-content.
const BOILERPLATE_CLASSES: &[&str] = &[
    "sharedaddy",
    "wordads-ad-wrapper",
    "wp-block-spacer",
    "jp-relatedposts",
];

const BOILERPLATE_TAGS: &[&str] = &["script", "style", "hr"];

pub fn extract_chapter(markup: &str) -> Result<ChapterContent> {
    let document = Html::parse_document(markup);

    let content_selector = Selector::parse("div.entry-content").unwrap();
    let content = document
        .select(&content_selector)
        .next()
        .ok_or_else(|| Error::parse("chapter page has no entry-content region"))?;

    let heading_selector = Selector::parse("h2.wp-block-heading").unwrap();
    let img_selector = Selector::parse("img").unwrap();

    // Paragraphs before the chapter's own heading are site navigation.
    // Pages without any heading (image-only interludes) keep everything.
    let mut seen_heading = content.select(&heading_selector).next().is_none();

    let mut kept = Vec::new();
    let mut images = Vec::new();

    for element in content.children().filter_map(ElementRef::wrap) {
        let name = element.value().name();

        // The heading may be the child itself or sit inside a wrapper
        // block; either ends the preamble.
        let is_heading =
            name == "h2" && element.value().classes().any(|c| c == "wp-block-heading");
        if is_heading || element.select(&heading_selector).next().is_some() {
            seen_heading = true;
        }
        if !seen_heading && name == "p" {
            continue;
        }
        if BOILERPLATE_TAGS.contains(&name) {
            continue;
        }
        if element
            .value()
            .classes()
            .any(|c| BOILERPLATE_CLASSES.contains(&c))
        {
            continue;
        }

        let mut html = element.html();
        for img in element.select(&img_selector) {
            let Some(original) = img
                .value()
                .attr("data-orig-file")
                .or_else(|| img.value().attr("src"))
            else {
                continue;
            };
            if original.is_empty() {
                continue;
            }
            let local = format!("../Images/{}", filename_from_url(original));
            // Sized variants in src point at the same file as data-orig-file,
            // so both get rewritten to the packaged copy. src goes first:
            // its query-string suffix must not survive the shorter rewrite.
            for attr in ["src", "data-orig-file"] {
                if let Some(value) = img.value().attr(attr) {
                    if !value.is_empty() {
                        html = html.replace(value, &local);
                    }
                }
            }
            images.push(original.to_string());
        }

        kept.push(html);
    }

    let body = kept.join("\n");
    if body.trim().is_empty() {
        return Err(Error::parse(
            "chapter page has no recognizable content after cleaning",
        ));
    }

    Ok(ChapterContent { body, images })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter_page(content: &str) -> String {
        format!(
            r#"<html><body><article>
            <div class="entry-content">{content}</div>
            </article></body></html>"#
        )
    }

    #[test]
    fn missing_content_region_is_a_parse_error() {
        let err = extract_chapter("<html><body><p>nothing here</p></body></html>").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn empty_content_region_is_a_parse_error() {
        let markup = chapter_page(r#"<div class="sharedaddy">share me</div><hr/>"#);
        let err = extract_chapter(&markup).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn preamble_before_heading_is_dropped() {
        let markup = chapter_page(
            r#"<p><a href="/toc/">Back to ToC</a></p>
            <h2 class="wp-block-heading">Chapter 1 - Beginnings</h2>
            <p>Hello world.</p>"#,
        );
        let content = extract_chapter(&markup).unwrap();
        assert!(!content.body.contains("Back to ToC"));
        assert!(content.body.contains("Chapter 1 - Beginnings"));
        assert!(content.body.contains("Hello world."));
    }

    #[test]
    fn boilerplate_blocks_are_stripped() {
        let markup = chapter_page(
            r#"<h2 class="wp-block-heading">Chapter 2</h2>
            <p>Prose.</p>
            <div class="wordads-ad-wrapper">ad</div>
            <div class="sharedaddy">share</div>
            <div class="wp-block-spacer"></div>
            <script>evil()</script>
            <hr/>
            <p>More prose.</p>"#,
        );
        let content = extract_chapter(&markup).unwrap();
        assert!(content.body.contains("Prose."));
        assert!(content.body.contains("More prose."));
        for gone in ["ad", "share", "evil()", "<hr"] {
            assert!(!content.body.contains(gone), "expected {gone:?} stripped");
        }
    }

    #[test]
    fn images_are_collected_and_remapped() {
        let markup = chapter_page(
            r#"<h2 class="wp-block-heading">Chapter 3</h2>
            <div class="wp-block-image">
              <img src="https://cdn.example.com/art.jpg?w=640"
                   data-orig-file="https://cdn.example.com/art.jpg"/>
            </div>
            <p>Caption.</p>"#,
        );
        let content = extract_chapter(&markup).unwrap();
        assert_eq!(content.images, ["https://cdn.example.com/art.jpg"]);
        assert!(content.body.contains("../Images/art.jpg"));
        assert!(!content.body.contains("cdn.example.com"));
    }

    #[test]
    fn heading_inside_wrapper_still_anchors_content() {
        let markup = chapter_page(
            r#"<p><a href="/toc/">Back to ToC</a></p>
            <div class="wp-block-group"><h2 class="wp-block-heading">Chapter 4</h2></div>
            <p>Wrapped heading prose.</p>"#,
        );
        let content = extract_chapter(&markup).unwrap();
        assert!(!content.body.contains("Back to ToC"));
        assert!(content.body.contains("Chapter 4"));
        assert!(content.body.contains("Wrapped heading prose."));
    }

    #[test]
    fn heading_less_page_keeps_paragraphs() {
        let markup = chapter_page(r#"<p>Short announcement chapter.</p>"#);
        let content = extract_chapter(&markup).unwrap();
        assert!(content.body.contains("Short announcement chapter."));
    }
}
