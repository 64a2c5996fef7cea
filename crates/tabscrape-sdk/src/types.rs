//! Request, response and outcome types

use serde::{Deserialize, Serialize};
use tabscrape_domain::OutputFormat;
use tabscrape_export::Table;
use tabscrape_extractor::ExtractionStats;

/// Message returned for non-Excel formats
pub const SUCCESS_MESSAGE: &str = "Data processed successfully.";

/// Message returned for Excel output
pub const EXCEL_SUCCESS_MESSAGE: &str = "Excel data generated successfully.";

/// Detail when no URL produced a table
pub const NO_DATA_DETAIL: &str = "No valid data extracted from provided URLs.";

/// Detail when tables were produced but none survived combination
pub const NO_VALID_CHUNKS_DETAIL: &str = "All CSV chunks were invalid or mismatched column counts.";

/// A scrape request as accepted over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    /// Pages to scrape, processed in order
    pub urls: Vec<String>,

    /// What the table should contain, in plain language
    pub parse_description: String,

    /// One of `csv`, `json`, `excel`, `xml`
    pub output_format: String,
}

impl ScrapeRequest {
    /// Build a request
    pub fn new(
        urls: Vec<String>,
        parse_description: impl Into<String>,
        output_format: OutputFormat,
    ) -> Self {
        Self {
            urls,
            parse_description: parse_description.into(),
            output_format: output_format.to_string(),
        }
    }
}

/// A successful scrape response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    /// Always `"success"`
    pub status: String,

    /// Rendered table (base64 `.xlsx` for Excel)
    pub data: String,

    /// Human-readable outcome
    pub message: String,

    /// HTML preview table, for Excel only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// What happened to one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlStatus {
    /// The page could not be fetched
    FetchFailed(String),

    /// The page was fetched but produced no table
    NoTable,

    /// The page produced a table with this many data rows
    Extracted {
        /// Data rows in the document's table
        rows: usize,
    },
}

/// Per-URL report
#[derive(Debug, Clone)]
pub struct UrlReport {
    /// The URL as requested
    pub url: String,

    /// Outcome
    pub status: UrlStatus,

    /// Extraction statistics, when the page was fetched
    pub stats: Option<ExtractionStats>,
}

/// Everything a scrape produced, before and after rendering
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    /// The wire response
    pub response: ScrapeResponse,

    /// Requested format
    pub format: OutputFormat,

    /// The combined table that was rendered
    pub table: Table,

    /// One report per requested URL, in request order
    pub urls: Vec<UrlReport>,

    /// Per-URL tables left out of the combined table
    pub tables_rejected: usize,

    /// Wall-clock time for the whole request
    pub processing_time_ms: u64,
}
