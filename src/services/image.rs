use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::clients::HttpClient;
use crate::error::Result;
use crate::models::{Enrichment, Media};

/// Fetches the HTML of a listing page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Page fetcher with a hard per-request timeout.
pub struct HttpPageFetcher {
    http: HttpClient,
    timeout: Duration,
}

impl HttpPageFetcher {
    pub fn new(http: HttpClient, timeout: Duration) -> Self {
        Self { http, timeout }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let request = self.http.get(url).timeout(self.timeout);
        let response = self.http.send(request).await?;
        Ok(response.text().await?)
    }
}

/// Finds Open Graph / Twitter card image URLs in `<meta>` tags.
#[derive(Debug, Clone)]
pub struct MetaImageScanner {
    meta_tag: Regex,
    attribute: Regex,
}

impl MetaImageScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            meta_tag: Regex::new(r"(?is)<meta\b[^>]*>")?,
            attribute: Regex::new(r#"(?is)([a-z_:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)?,
        })
    }

    /// `og:image` wins over `twitter:image` wherever they appear in the page.
    pub fn image_url(&self, html: &str) -> Option<String> {
        let mut twitter = None;

        for tag in self.meta_tag.find_iter(html) {
            let mut key = None;
            let mut content = None;

            for caps in self.attribute.captures_iter(tag.as_str()) {
                let name = caps.get(1).map(|m| m.as_str().to_ascii_lowercase());
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map(|m| m.as_str());
                match (name.as_deref(), value) {
                    (Some("property") | Some("name"), Some(v)) => key = Some(v.trim().to_ascii_lowercase()),
                    (Some("content"), Some(v)) => content = Some(html_escape::decode_html_entities(v.trim()).to_string()),
                    _ => {}
                }
            }

            let Some(content) = content.filter(|c| !c.is_empty()) else {
                continue;
            };
            match key.as_deref() {
                Some("og:image") => return Some(content),
                Some("twitter:image") if twitter.is_none() => twitter = Some(content),
                _ => {}
            }
        }

        twitter
    }
}

/// Picks an image for a listing: media field first, then a scrape of the listing page.
#[derive(Clone)]
pub struct ImageResolver {
    fetcher: Arc<dyn PageFetcher>,
    scanner: MetaImageScanner,
}

impl ImageResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        Ok(Self {
            fetcher,
            scanner: MetaImageScanner::new()?,
        })
    }

    /// Never fails; an empty string is a valid outcome.
    pub async fn resolve(&self, name: &str, media: Option<&[Media]>, page_url: &str) -> Enrichment<String> {
        let from_media = media
            .and_then(|entries| entries.first())
            .and_then(|entry| entry.url.as_deref())
            .filter(|url| !url.trim().is_empty());

        if let Some(url) = from_media {
            debug!(product = name, "Image taken from media field");
            return Enrichment::Fresh(url.to_string());
        }

        info!(product = name, url = page_url, "No media image, scraping listing page");
        match self.fetcher.fetch_page(page_url).await {
            Ok(html) => match self.scanner.image_url(&html) {
                Some(url) => Enrichment::Fresh(url),
                None => {
                    warn!(product = name, "No og:image or twitter:image on listing page");
                    Enrichment::fallback(String::new(), "no image meta tag")
                }
            },
            Err(e) => {
                warn!(product = name, error = %e, "Failed to fetch listing page");
                Enrichment::fallback(String::new(), e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_open_graph_over_twitter() {
        let scanner = MetaImageScanner::new().unwrap();
        let html = r#"<head>
            <meta name="twitter:image" content="https://img.test/twitter.png">
            <meta property="og:image" content="https://img.test/og.png?a=1&amp;b=2" />
        </head>"#;
        assert_eq!(scanner.image_url(html).as_deref(), Some("https://img.test/og.png?a=1&b=2"));
    }

    #[test]
    fn falls_back_to_twitter_card() {
        let scanner = MetaImageScanner::new().unwrap();
        let html = r#"<META content='https://img.test/card.jpg' NAME='twitter:image'>"#;
        assert_eq!(scanner.image_url(html).as_deref(), Some("https://img.test/card.jpg"));
    }

    #[test]
    fn reads_unquoted_attribute_values() {
        let scanner = MetaImageScanner::new().unwrap();
        let html = "<head><meta name=twitter:image content=https://img.test/card.png>\
                    <meta property=og:image content=https://img.test/unquoted.png></head>";
        assert_eq!(scanner.image_url(html).as_deref(), Some("https://img.test/unquoted.png"));
    }

    #[test]
    fn ignores_unrelated_and_empty_tags() {
        let scanner = MetaImageScanner::new().unwrap();
        let html = r#"<meta property="og:title" content="Venice"><meta property="og:image" content="">"#;
        assert!(scanner.image_url(html).is_none());
    }
}
