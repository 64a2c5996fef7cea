//! tabscrape SDK
//!
//! Request orchestration for the scraper: validate a request, fetch each
//! page, extract a table per page, combine the tables and render them in the
//! requested format. [`ScrapeService`] runs in-process; [`ScrapeClient`]
//! talks to a running router over HTTP.
//!
//! # Example
//!
//! ```no_run
//! use tabscrape_sdk::{ScrapeRequest, ScrapeService, ServiceConfig};
//! use tabscrape_domain::OutputFormat;
//!
//! # async fn example() -> Result<(), tabscrape_sdk::ScrapeError> {
//! let service = ScrapeService::from_config(&ServiceConfig::default())?;
//!
//! let request = ScrapeRequest::new(
//!     vec!["https://example.com/products".to_string()],
//!     "product name and price",
//!     OutputFormat::Csv,
//! );
//! let response = service.scrape(&request).await?;
//! println!("{}", response.data);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod service;
mod types;

pub use client::{HealthStatus, ScrapeClient, DEFAULT_TIMEOUT};
pub use config::{CombinePolicy, ServiceConfig};
pub use error::ScrapeError;
pub use service::{validate, ScrapeService};
pub use types::{
    ScrapeOutcome, ScrapeRequest, ScrapeResponse, UrlReport, UrlStatus, EXCEL_SUCCESS_MESSAGE,
    NO_DATA_DETAIL, NO_VALID_CHUNKS_DETAIL, SUCCESS_MESSAGE,
};
