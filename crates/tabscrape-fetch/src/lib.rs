//! tabscrape Fetch Layer
//!
//! Retrieves raw page markup for the extraction pipeline.
//!
//! # Fetchers
//!
//! - `HttpFetcher`: plain HTTP GET with user-agent rotation, retries and a
//!   content sufficiency check
//! - `StaticFetcher`: canned documents keyed by URL, for tests and offline runs
//!
//! A failed fetch is an ordinary error value; callers drop the URL and move
//! on to the next one.

#![warn(missing_docs)]

pub mod config;
pub mod http;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

pub use config::FetchConfig;
pub use http::HttpFetcher;

/// Errors that can occur while fetching a page
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    #[error("Request failed for {url}: {message}")]
    Request {
        /// URL being fetched
        url: String,
        /// Transport error
        message: String,
    },

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status {
        /// URL being fetched
        url: String,
        /// Status code
        status: u16,
    },

    /// The page has no body or too little text in it
    #[error("Insufficient content at {url}: {length} chars of body text (need {required})")]
    InsufficientContent {
        /// URL being fetched
        url: String,
        /// Trimmed body text length found
        length: usize,
        /// Configured minimum
        required: usize,
    },

    /// No document is known for the URL
    #[error("No document for {0}")]
    NotFound(String),

    /// Fetcher configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Trait for retrieving raw page markup
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw markup at `url`
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetcher serving pre-registered documents
///
/// # Examples
///
/// ```
/// use tabscrape_fetch::{PageFetcher, StaticFetcher};
///
/// # #[tokio::main]
/// # async fn main() {
/// let fetcher = StaticFetcher::new().with_page("https://shop.test", "<body>Widget</body>");
/// assert!(fetcher.fetch("https://shop.test").await.is_ok());
/// assert!(fetcher.fetch("https://other.test").await.is_err());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    /// Create an empty fetcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document for a URL
    pub fn with_page(mut self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.insert(url.into(), markup.into());
        self
    }

    /// Register a document for a URL
    pub fn add_page(&mut self, url: impl Into<String>, markup: impl Into<String>) {
        self.pages.insert(url.into(), markup.into());
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_fetcher_serves_registered_pages() {
        let mut fetcher = StaticFetcher::new().with_page("https://a.test", "<p>A</p>");
        fetcher.add_page("https://b.test", "<p>B</p>");

        assert_eq!(fetcher.fetch("https://a.test").await.unwrap(), "<p>A</p>");
        assert_eq!(fetcher.fetch("https://b.test").await.unwrap(), "<p>B</p>");
    }

    #[tokio::test]
    async fn test_static_fetcher_unknown_url() {
        let fetcher = StaticFetcher::new();
        let result = fetcher.fetch("https://missing.test").await;
        assert!(matches!(result, Err(FetchError::NotFound(url)) if url == "https://missing.test"));
    }

    #[test]
    fn test_error_messages() {
        let err = FetchError::Status {
            url: "https://x.test".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "HTTP 503 for https://x.test");
    }
}
