use crate::parser::{ParseError, parse_catalog, parse_results_page};
use crate::types::{Catalog, ResultsPage};

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/101.0.4951.67 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.9";

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_options(crate::BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_options(base_url: &str, timeout: Duration) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));

        // Accept-Encoding is added by reqwest's gzip/deflate support, which
        // also decodes the body.
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetch_catalog(&self) -> Result<Catalog, ScraperError> {
        let url = format!("{}/sitemap", self.base_url);
        log::info!("Fetching sitemap from {}...", url);
        let html = self.get_html(&url)?;
        let catalog = parse_catalog(&html, &self.base_url)?;
        log::info!(
            "Catalog has {} fields and {} states",
            catalog.categories.len(),
            catalog.locations.len()
        );
        Ok(catalog)
    }

    pub fn fetch_results(&self, url: &str) -> Result<ResultsPage, ScraperError> {
        log::info!("Fetching results from {}...", url);
        let html = self.get_html(url)?;
        let page = parse_results_page(&html, &self.base_url)?;
        log::info!("Parsed {} postings", page.postings.len());
        Ok(page)
    }

    fn get_html(&self, url: &str) -> Result<String, ScraperError> {
        Ok(self
            .client
            .get(url)
            .send()
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }
}
