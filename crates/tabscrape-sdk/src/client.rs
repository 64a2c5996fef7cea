//! HTTP client for a running tabscrape router

use crate::error::ScrapeError;
use crate::types::{ScrapeRequest, ScrapeResponse};
use serde::Deserialize;
use std::time::Duration;

/// Default request timeout; a scrape calls the LLM once per chunk
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Health report from `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    /// `"healthy"` when the service is up
    pub status: String,

    /// Service version
    #[serde(default)]
    pub version: Option<String>,

    /// Model answering extraction prompts
    #[serde(default)]
    pub model: Option<String>,
}

/// Client for the scrape HTTP API
#[derive(Debug, Clone)]
pub struct ScrapeClient {
    base_url: String,
    http: reqwest::Client,
}

impl ScrapeClient {
    /// Create a client for the router at `base_url`
    pub fn new(base_url: &str) -> Result<Self, ScrapeError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScrapeError::Connection(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Router base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check router health
    pub async fn health(&self) -> Result<HealthStatus, ScrapeError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Submit a scrape request
    ///
    /// Error responses become [`ScrapeError::Router`] carrying the body's
    /// `detail`.
    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, ScrapeError> {
        tracing::debug!("POST {}/scrape_and_parse/", self.base_url);
        let response = self
            .http
            .post(format!("{}/scrape_and_parse/", self.base_url))
            .json(request)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ScrapeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.detail)
        .unwrap_or(body);

    Err(ScrapeError::Router {
        status: status.as_u16(),
        detail,
    })
}
