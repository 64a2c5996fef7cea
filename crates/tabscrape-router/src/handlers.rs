//! HTTP request handlers for the router.
//!
//! Exposes the welcome, health and scrape endpoints using axum.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabscrape_llm::AnyProvider;
use tabscrape_sdk::{ScrapeError, ScrapeRequest, ScrapeResponse, ScrapeService};
use tracing::{error, warn};

/// Greeting returned by `GET /`
pub const WELCOME_MESSAGE: &str = "Welcome to the Generative AI Web Scraper API!";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Scrape service shared by every request
    pub service: Arc<ScrapeService<AnyProvider>>,
}

/// Welcome response
#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    /// Greeting
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Service version
    pub version: String,
    /// Model answering extraction prompts
    pub model: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub detail: String,
}

/// Application error type
#[derive(Debug)]
pub struct AppError(ScrapeError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            warn!("Rejected scrape request: {}", self.0);
            StatusCode::BAD_REQUEST
        } else {
            error!("Scrape request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = Json(ErrorResponse {
            detail: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<ScrapeError> for AppError {
    fn from(e: ScrapeError) -> Self {
        AppError(e)
    }
}

/// GET / - Welcome message
async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// GET /health - Liveness check
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.service.extractor().model_name().to_string(),
    })
}

/// POST /scrape_and_parse/ - Scrape the URLs and return one rendered table
async fn scrape_and_parse(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, AppError> {
    let response = state.service.scrape(&request).await?;
    Ok(Json(response))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route("/scrape_and_parse/", post(scrape_and_parse))
        .with_state(state)
}
