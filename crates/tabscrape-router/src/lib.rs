//! tabscrape Router
//!
//! HTTP front end for the scraper. One `POST /scrape_and_parse/` request
//! fetches every URL, extracts a table from each page and returns the
//! combined table in the requested format.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use axum::http::HeaderValue;
use config::RouterConfig;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tabscrape_sdk::{ScrapeError, ScrapeService};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Router error
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The scrape service could not be built
    #[error("Service error: {0}")]
    Service(#[from] ScrapeError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// CORS layer allowing the configured origins, with credentials
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, RouterError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| {
                RouterError::Config(config::ConfigError::Invalid(format!(
                    "invalid CORS origin '{}'",
                    origin
                )))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Build the full application: routes, CORS and request tracing
pub fn build_app(state: AppState, cors_origins: &[String]) -> Result<axum::Router, RouterError> {
    Ok(create_router(state)
        .layer(cors_layer(cors_origins)?)
        .layer(TraceLayer::new_for_http()))
}

/// Start the router HTTP server
///
/// Builds the scrape service from configuration and serves until the
/// process is stopped.
pub async fn start_server(config: RouterConfig) -> Result<(), RouterError> {
    info!("Starting tabscrape router");
    info!("Bind address: {}", config.bind_addr());
    info!("Allowed origins: {}", config.cors_origins.join(", "));

    let service = ScrapeService::from_config(&config.service)?;
    let state = AppState {
        service: Arc::new(service),
    };
    let app = build_app(state, &config.cors_origins)?;

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Router listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| RouterError::Server(e.to_string()))?;

    Ok(())
}
