pub mod chapter;
pub mod images;
pub mod toc;

pub use images::ImageDownloader;
pub use toc::TocPage;

use std::time::Duration;

use reqwest::Client;
use tracing::info;
use url::Url;

use crate::error::{Error, Result};
use crate::models::{Book, BookMetadata, Chapter};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Fetches the TOC and chapter pages and produces an assembled [`Book`].
///
/// Holds the one shared HTTP session: user agent and timeout are set once on
/// the client, and every request in a run goes through it.
pub struct CclawCrawler {
    client: Client,
    delay: Duration,
}

impl CclawCrawler {
    pub fn new(timeout: Duration, delay: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, delay })
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::network(url, e))?;
        response.text().await.map_err(|e| Error::network(url, e))
    }

    /// Run the whole scrape: TOC, then each selected chapter in reading
    /// order, then cover and illustration downloads. Any failure past the
    /// tolerated TOC-entry skips aborts the run.
    pub async fn crawl(
        &self,
        toc_url: &str,
        author: &str,
        language: &str,
        volume: Option<u32>,
        chapters_per_volume: Option<usize>,
    ) -> Result<Book> {
        let base = Url::parse(toc_url)
            .map_err(|e| Error::config(format!("invalid TOC URL {toc_url}: {e}")))?;

        info!("fetching table of contents: {toc_url}");
        let markup = self.fetch(toc_url).await?;
        let toc = toc::parse_toc(&markup, &base)?;
        let refs = toc::select_volume(toc.chapters, volume, chapters_per_volume)?;
        info!("{} chapters selected from '{}'", refs.len(), toc.title);

        let mut chapters = Vec::with_capacity(refs.len());
        let mut image_urls = Vec::new();
        if let Some(cover) = &toc.cover {
            image_urls.push(cover.url.clone());
        }

        for (index, chapter_ref) in refs.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            info!(
                "fetching chapter {}/{}: {}",
                index + 1,
                refs.len(),
                chapter_ref.url
            );
            let markup = self.fetch(&chapter_ref.url).await?;
            let content = chapter::extract_chapter(&markup).map_err(|e| match e {
                Error::Parse { message } => {
                    Error::parse(format!("{}: {message}", chapter_ref.url))
                }
                other => other,
            })?;

            image_urls.extend(content.images.iter().cloned());
            chapters.push(Chapter {
                title: chapter_ref.title.clone(),
                body: content.body,
                order: index + 1,
                images: content.images,
            });
        }

        let images = ImageDownloader::new(self.client.clone())
            .fetch_all(&image_urls)
            .await?;

        let mut title = toc.title;
        if let Some(volume) = volume {
            title = format!("{title}, Vol. {volume}");
        }

        Ok(Book {
            metadata: BookMetadata {
                title,
                author: author.to_string(),
                language: language.to_string(),
                volume,
            },
            source_url: toc_url.to_string(),
            published: toc.published,
            cover: toc.cover,
            chapters,
            images,
        })
    }
}
