//! Error types for the tabscrape SDK.

use tabscrape_export::ExportError;
use tabscrape_extractor::ExtractorError;
use tabscrape_llm::LlmError;
use thiserror::Error;

/// Errors returned by a scrape request
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The request itself is unusable (bad format, no URLs, empty description)
    #[error("{0}")]
    InvalidRequest(String),

    /// No URL produced a usable table
    #[error("{0}")]
    NoExtractableData(String),

    /// Rendering the combined table failed
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// The extractor could not be built
    #[error("Extractor error: {0}")]
    Extractor(#[from] ExtractorError),

    /// The LLM provider could not be built
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Service configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote service answered with an error status
    #[error("Server error (HTTP {status}): {detail}")]
    Router {
        /// HTTP status code
        status: u16,
        /// `detail` field of the error body, or the raw body
        detail: String,
    },

    /// The remote service could not be reached
    #[error("Connection error: {0}")]
    Connection(String),
}

impl ScrapeError {
    /// Whether the caller is at fault (maps to HTTP 400)
    pub fn is_client_error(&self) -> bool {
        match self {
            ScrapeError::InvalidRequest(_) | ScrapeError::NoExtractableData(_) => true,
            ScrapeError::Router { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ScrapeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ScrapeError::Connection(e.to_string())
        } else if let Some(status) = e.status() {
            ScrapeError::Router {
                status: status.as_u16(),
                detail: e.to_string(),
            }
        } else {
            ScrapeError::Connection(e.to_string())
        }
    }
}
