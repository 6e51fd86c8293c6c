//! Table of contents parsing.
//!
//! CClaw TOC pages are WordPress posts: the book title lives in
//! `h1.entry-title` (with a trailing " ToC"), chapter links sit inside
//! centered paragraphs, and multi-volume series separate chapter runs with
//! centered "Volume N" headings.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::images::filename_from_url;
use crate::error::{Error, Result};
use crate::models::{ChapterRef, Cover};

/// Parsed table of contents page.
#[derive(Debug, Clone)]
pub struct TocPage {
    pub title: String,
    pub published: Option<String>,
    pub cover: Option<Cover>,
    pub chapters: Vec<ChapterRef>,
}

impl TocPage {
    /// Whether the page carries "Volume N" headings.
    pub fn has_volume_headings(&self) -> bool {
        self.chapters.iter().any(|c| c.volume.is_some())
    }
}

const TITLE_SUFFIX: &str = " ToC";

/// Parse the TOC page. Chapter anchors that are missing an href, empty, or
/// pointing off-site are skipped silently; a page yielding zero chapters is
/// a parse error.
pub fn parse_toc(markup: &str, base: &Url) -> Result<TocPage> {
    let document = Html::parse_document(markup);

    let title_selector = Selector::parse("h1.entry-title").unwrap();
    let title = document
        .select(&title_selector)
        .next()
        .map(|h1| element_text(&h1))
        .ok_or_else(|| Error::parse("TOC page has no entry-title heading"))?;
    let title = title
        .strip_suffix(TITLE_SUFFIX)
        .unwrap_or(&title)
        .to_string();

    // Headings and chapter paragraphs are walked together so each chapter
    // picks up the volume number of the nearest preceding heading.
    let entry_selector = Selector::parse(
        "h2.wp-block-heading.has-text-align-center, p.has-text-align-center",
    )
    .unwrap();
    let anchor_selector = Selector::parse("a").unwrap();

    let mut chapters = Vec::new();
    let mut current_volume = None;

    for element in document.select(&entry_selector) {
        if element.value().name() == "h2" {
            let text = element_text(&element);
            if let Some(number) = volume_heading_number(&text) {
                current_volume = Some(number);
            }
            continue;
        }

        let Some(anchor) = element.select(&anchor_selector).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base.join(href) else {
            debug!("skipping unparsable chapter link: {href}");
            continue;
        };
        if resolved.origin() != base.origin() {
            debug!("skipping off-site chapter link: {resolved}");
            continue;
        }
        let title = element_text(&anchor);
        if title.is_empty() {
            continue;
        }

        chapters.push(ChapterRef {
            title,
            url: resolved.to_string(),
            order: chapters.len() + 1,
            volume: current_volume,
        });
    }

    if chapters.is_empty() {
        return Err(Error::parse(format!(
            "TOC page {base} lists no usable chapter links"
        )));
    }

    let published = parse_published_time(&document);
    let cover = parse_cover(&document, base);
    if cover.is_none() {
        warn!("TOC page has no cover image, continuing without one");
    }

    Ok(TocPage {
        title,
        published,
        cover,
        chapters,
    })
}

/// Select the chapter subrange for `volume`.
///
/// Heading-derived volume numbers win when the page has them; otherwise an
/// even partition by `chapters_per_volume` applies. A multi-volume TOC with
/// no volume requested is an error, matching the site convention that each
/// volume becomes its own file.
pub fn select_volume(
    chapters: Vec<ChapterRef>,
    volume: Option<u32>,
    chapters_per_volume: Option<usize>,
) -> Result<Vec<ChapterRef>> {
    let has_headings = chapters.iter().any(|c| c.volume.is_some());

    let Some(volume) = volume else {
        if has_headings {
            return Err(Error::config(
                "multi-volume series detected, pass --volume to select one",
            ));
        }
        return Ok(chapters);
    };

    let selected: Vec<ChapterRef> = if has_headings {
        chapters
            .into_iter()
            .filter(|c| c.volume == Some(volume))
            .collect()
    } else if let Some(per_volume) = chapters_per_volume {
        if per_volume == 0 {
            return Err(Error::config("--chapters-per-volume must be positive"));
        }
        let start = (volume as usize - 1).saturating_mul(per_volume);
        chapters
            .into_iter()
            .skip(start)
            .take(per_volume)
            .collect()
    } else {
        return Err(Error::config(
            "TOC has no volume headings, pass --chapters-per-volume to split it",
        ));
    };

    if selected.is_empty() {
        return Err(Error::config(format!(
            "volume {volume} has no chapters in this table of contents"
        )));
    }
    Ok(selected)
}

fn volume_heading_number(text: &str) -> Option<u32> {
    let rest = text.trim().strip_prefix("Volume")?;
    rest.split_whitespace().last()?.parse().ok()
}

fn parse_published_time(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[property="article:published_time"]"#).unwrap();
    let content = document.select(&selector).next()?.value().attr("content")?;
    let parsed = DateTime::parse_from_rfc3339(content).ok()?;
    Some(
        parsed
            .with_timezone(&Utc)
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string(),
    )
}

fn parse_cover(document: &Html, base: &Url) -> Option<Cover> {
    let selector = Selector::parse("div.wp-block-image img").unwrap();
    let img = document.select(&selector).next()?;
    let src = img
        .value()
        .attr("data-orig-file")
        .or_else(|| img.value().attr("src"))?;
    let url = base.join(src).ok()?;

    // WordPress reports the full-size dimensions as "width,height".
    let (width, height) = img
        .value()
        .attr("data-orig-size")
        .and_then(|size| {
            let (w, h) = size.split_once(',')?;
            Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
        })
        .unwrap_or((600, 800));

    Some(Cover {
        filename: filename_from_url(url.as_str()),
        url: url.to_string(),
        width,
        height,
    })
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
