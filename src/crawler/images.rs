use reqwest::Client;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::ImageAsset;

/// Downloads cover and illustration images referenced by the book.
pub struct ImageDownloader {
    client: Client,
}

impl ImageDownloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch_image(&self, url: &str) -> Result<ImageAsset> {
        info!("downloading image: {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::network(url, e))?;
        let data = response
            .bytes()
            .await
            .map_err(|e| Error::network(url, e))?;

        Ok(ImageAsset {
            filename: filename_from_url(url),
            data: data.to_vec(),
        })
    }

    /// Fetch every URL, first occurrence wins when two URLs share a filename.
    pub async fn fetch_all(&self, urls: &[String]) -> Result<Vec<ImageAsset>> {
        let mut assets: Vec<ImageAsset> = Vec::new();
        for url in urls {
            let filename = filename_from_url(url);
            if assets.iter().any(|a| a.filename == filename) {
                continue;
            }
            assets.push(self.fetch_image(url).await?);
        }
        Ok(assets)
    }
}

/// Last path segment of a URL, with any query string dropped.
pub fn filename_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("image")
        .to_string()
}
