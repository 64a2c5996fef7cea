//! Plain HTTP page fetcher

use crate::config::FetchConfig;
use crate::{FetchError, PageFetcher};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

/// Length of the body's text with every text node trimmed
///
/// Returns 0 when the document has no body text at all.
pub fn body_text_length(html: &str) -> usize {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("body") else {
        return 0;
    };
    document
        .select(&selector)
        .next()
        .map(|body| body.text().map(|t| t.trim().chars().count()).sum())
        .unwrap_or(0)
}

/// Fetches pages over HTTP with retries and user-agent rotation
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a new fetcher
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        config.validate().map_err(FetchError::Config)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Active configuration
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn pick_user_agent(&self) -> Option<String> {
        self.config
            .user_agents
            .choose(&mut rand::thread_rng())
            .cloned()
    }

    /// One GET request, with failures classified as retryable or fatal
    async fn attempt(&self, url: &str) -> Result<String, Attempt> {
        let mut request = self.client.get(url);
        if let Some(user_agent) = self.pick_user_agent() {
            request = request.header(reqwest::header::USER_AGENT, user_agent);
        }

        let response = request.send().await.map_err(|e| {
            Attempt::Retry(FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })
        })?;

        let status = response.status();
        if !status.is_success() {
            let error = FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            };
            return Err(if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                Attempt::Retry(error)
            } else {
                Attempt::Fatal(error)
            });
        }

        response.text().await.map_err(|e| {
            Attempt::Retry(FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })
        })
    }
}

enum Attempt {
    Retry(FetchError),
    Fatal(FetchError),
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut attempts = 0;

        let html = loop {
            attempts += 1;
            match self.attempt(url).await {
                Ok(html) => break html,
                Err(Attempt::Fatal(e)) => return Err(e),
                Err(Attempt::Retry(e)) => {
                    if attempts >= self.config.max_retries {
                        return Err(e);
                    }
                    let delay = self.config.backoff(attempts);
                    warn!(url = %url, attempt = attempts, ?delay, error = %e, "Fetch failed, retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        };

        let length = body_text_length(&html);
        if length < self.config.min_text_length {
            debug!(url = %url, length, "Fetched page has too little text");
            return Err(FetchError::InsufficientContent {
                url: url.to_string(),
                length,
                required: self.config.min_text_length,
            });
        }

        info!(url = %url, bytes = html.len(), "Fetched page");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::get;
    use axum::Router;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const LONG_PAGE: &str = "<html><body><h1>Catalogue</h1><p>Widget costs 9.99 and ships in two days from the warehouse.</p><p>Gadget costs 4.50 and is back in stock.</p></body></html>";

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fast_config() -> FetchConfig {
        FetchConfig {
            timeout_secs: 5,
            retry_backoff_ms: 10,
            min_text_length: 50,
            ..FetchConfig::default()
        }
    }

    async fn flaky(State(hits): State<Arc<AtomicUsize>>) -> (AxumStatus, &'static str) {
        if hits.fetch_add(1, Ordering::SeqCst) == 0 {
            (AxumStatus::SERVICE_UNAVAILABLE, "busy")
        } else {
            (AxumStatus::OK, LONG_PAGE)
        }
    }

    async fn echo_agent(headers: HeaderMap) -> String {
        let agent = headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        format!("<body><p>{}</p></body>", agent)
    }

    #[test]
    fn test_body_text_length() {
        assert_eq!(body_text_length("<body><p> ab </p>\n<p>cd</p></body>"), 4);
        assert_eq!(body_text_length("<html><head><title>t</title></head></html>"), 0);
        assert!(body_text_length(LONG_PAGE) >= 100);
        assert_eq!(body_text_length(""), 0);
    }

    #[tokio::test]
    async fn test_fetch_page() {
        let base = serve(Router::new().route("/", get(|| async { LONG_PAGE }))).await;
        let fetcher = HttpFetcher::new(fast_config()).unwrap();

        let html = fetcher.fetch(&format!("{}/", base)).await.unwrap();
        assert_eq!(html, LONG_PAGE);
    }

    #[tokio::test]
    async fn test_short_page_is_insufficient() {
        let base = serve(Router::new().route("/", get(|| async { "<body>tiny</body>" }))).await;
        let fetcher = HttpFetcher::new(fast_config()).unwrap();

        let result = fetcher.fetch(&format!("{}/", base)).await;
        assert!(matches!(
            result,
            Err(FetchError::InsufficientContent { length: 4, required: 50, .. })
        ));
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new().route(
            "/",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (AxumStatus::NOT_FOUND, "gone")
                }
            }),
        );
        let base = serve(router).await;
        let fetcher = HttpFetcher::new(fast_config()).unwrap();

        let result = fetcher.fetch(&format!("{}/", base)).await;
        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route("/", get(flaky))
            .with_state(Arc::clone(&hits));
        let base = serve(router).await;
        let fetcher = HttpFetcher::new(fast_config()).unwrap();

        let html = fetcher.fetch(&format!("{}/", base)).await.unwrap();
        assert_eq!(html, LONG_PAGE);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_user_agent_comes_from_pool() {
        let base = serve(Router::new().route("/", get(echo_agent))).await;
        let config = FetchConfig {
            min_text_length: 1,
            user_agents: vec!["tabscrape-test-agent/1.0".to_string()],
            ..fast_config()
        };
        let fetcher = HttpFetcher::new(config).unwrap();

        let html = fetcher.fetch(&format!("{}/", base)).await.unwrap();
        assert!(html.contains("tabscrape-test-agent/1.0"));
    }

    #[tokio::test]
    async fn test_unreachable_host_fails_after_retries() {
        let config = FetchConfig {
            max_retries: 2,
            ..fast_config()
        };
        let fetcher = HttpFetcher::new(config).unwrap();

        let result = fetcher.fetch("http://127.0.0.1:1/").await;
        assert!(matches!(result, Err(FetchError::Request { .. })));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = FetchConfig {
            timeout_secs: 0,
            ..FetchConfig::default()
        };
        assert!(matches!(HttpFetcher::new(config), Err(FetchError::Config(_))));
    }
}
