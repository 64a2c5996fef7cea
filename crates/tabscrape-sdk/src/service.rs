//! Scrape orchestration: fetch each URL, extract, combine, render

use crate::config::{CombinePolicy, ServiceConfig};
use crate::error::ScrapeError;
use crate::types::{
    ScrapeOutcome, ScrapeRequest, ScrapeResponse, UrlReport, UrlStatus, EXCEL_SUCCESS_MESSAGE,
    NO_DATA_DETAIL, NO_VALID_CHUNKS_DETAIL, SUCCESS_MESSAGE,
};
use std::sync::Arc;
use std::time::Instant;
use tabscrape_domain::traits::LlmProvider;
use tabscrape_domain::{CsvFragment, MasterTable, OutputFormat};
use tabscrape_export::{combine, render, Table};
use tabscrape_extractor::DocumentExtractor;
use tabscrape_fetch::{HttpFetcher, PageFetcher};
use tabscrape_llm::AnyProvider;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Serves scrape requests end to end
///
/// URLs are processed one after another; concurrency lives inside each
/// document's extraction. A URL that fails to fetch or yields no table is
/// logged and skipped.
pub struct ScrapeService<L>
where
    L: LlmProvider,
{
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<DocumentExtractor<L>>,
    combine_policy: CombinePolicy,
}

impl<L> Clone for ScrapeService<L>
where
    L: LlmProvider,
{
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            extractor: Arc::clone(&self.extractor),
            combine_policy: self.combine_policy,
        }
    }
}

impl ScrapeService<AnyProvider> {
    /// Build the provider, extractor and HTTP fetcher from configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ScrapeError> {
        config.validate().map_err(ScrapeError::Config)?;

        let provider = config.llm.build_provider()?;
        let extractor = DocumentExtractor::new(Arc::new(provider), config.extractor.clone())?;
        let fetcher =
            HttpFetcher::new(config.fetch.clone()).map_err(|e| ScrapeError::Config(e.to_string()))?;

        info!(
            "Scrape service ready: provider={:?}, model={}, combine={:?}",
            config.llm.provider, config.llm.model, config.combine
        );

        Ok(Self::new(Arc::new(fetcher), extractor).with_combine_policy(config.combine))
    }
}

impl<L> ScrapeService<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a service with the default combination policy
    pub fn new(fetcher: Arc<dyn PageFetcher>, extractor: DocumentExtractor<L>) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(extractor),
            combine_policy: CombinePolicy::default(),
        }
    }

    /// Use a different cross-URL combination policy
    pub fn with_combine_policy(mut self, policy: CombinePolicy) -> Self {
        self.combine_policy = policy;
        self
    }

    /// The cross-URL combination policy
    pub fn combine_policy(&self) -> CombinePolicy {
        self.combine_policy
    }

    /// The document extractor
    pub fn extractor(&self) -> &DocumentExtractor<L> {
        &self.extractor
    }

    /// Serve a request, returning only the wire response
    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, ScrapeError> {
        self.run(request).await.map(|outcome| outcome.response)
    }

    /// Serve a request, returning the response with the table and per-URL reports
    pub async fn run(&self, request: &ScrapeRequest) -> Result<ScrapeOutcome, ScrapeError> {
        let span = info_span!("scrape", request_id = %Uuid::now_v7());
        self.run_inner(request).instrument(span).await
    }

    async fn run_inner(&self, request: &ScrapeRequest) -> Result<ScrapeOutcome, ScrapeError> {
        let start_time = Instant::now();
        let format = validate(request)?;

        info!(
            "Scraping {} URL(s) as {}: '{}'",
            request.urls.len(),
            format,
            request.parse_description
        );

        let mut reports = Vec::with_capacity(request.urls.len());
        let mut tables = Vec::new();

        for url in &request.urls {
            let page = match self.fetcher.fetch(url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Failed to fetch {}: {}", url, e);
                    reports.push(UrlReport {
                        url: url.clone(),
                        status: UrlStatus::FetchFailed(e.to_string()),
                        stats: None,
                    });
                    continue;
                }
            };

            let report = self
                .extractor
                .extract_document(&page, &request.parse_description)
                .await;

            let status = match report.table {
                Some(table) => {
                    debug!("{} produced {} rows", url, table.row_count());
                    let rows = table.row_count();
                    tables.push(table);
                    UrlStatus::Extracted { rows }
                }
                None => {
                    warn!("No table extracted from {}", url);
                    UrlStatus::NoTable
                }
            };

            reports.push(UrlReport {
                url: url.clone(),
                status,
                stats: Some(report.stats),
            });
        }

        if tables.is_empty() {
            return Err(ScrapeError::NoExtractableData(NO_DATA_DETAIL.to_string()));
        }

        let produced = tables.len();
        let (table, accepted) = match self.combine(tables) {
            Some(combined) if !combined.0.is_empty() => combined,
            _ => return Err(ScrapeError::NoExtractableData(NO_VALID_CHUNKS_DETAIL.to_string())),
        };

        let rendered = render(&table, format)?;
        let message = if format == OutputFormat::Excel {
            EXCEL_SUCCESS_MESSAGE
        } else {
            SUCCESS_MESSAGE
        };

        let processing_time_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Scrape complete: {} rows from {} of {} URL(s) in {}ms",
            table.row_count(),
            accepted,
            request.urls.len(),
            processing_time_ms
        );

        Ok(ScrapeOutcome {
            response: ScrapeResponse {
                status: "success".to_string(),
                data: rendered.data,
                message: message.to_string(),
                preview: rendered.preview,
            },
            format,
            table,
            urls: reports,
            tables_rejected: produced - accepted,
            processing_time_ms,
        })
    }

    /// Combine per-URL tables under the configured policy
    ///
    /// Returns the combined table and how many per-URL tables it drew on.
    fn combine(&self, tables: Vec<MasterTable>) -> Option<(Table, usize)> {
        match self.combine_policy {
            CombinePolicy::ColumnCount => {
                let tables: Vec<Table> = tables
                    .iter()
                    .filter_map(|t| match Table::from_master(t) {
                        Ok(table) => Some(table),
                        Err(e) => {
                            warn!("Skipping unparseable table: {}", e);
                            None
                        }
                    })
                    .collect();
                combine(tables).map(|combined| (combined.table, combined.accepted))
            }
            CombinePolicy::Header => {
                let fragments: Vec<CsvFragment> = tables
                    .iter()
                    .map(|t| CsvFragment::new(t.header(), t.rows().to_vec()))
                    .collect();
                let reconciliation = self.extractor.reconciler().reconcile(&fragments)?;
                for rejected in &reconciliation.rejected {
                    warn!("Skipping table '{}': {}", rejected.header, rejected.reason);
                }
                match Table::from_master(&reconciliation.table) {
                    Ok(table) => Some((table, reconciliation.fragments_used)),
                    Err(e) => {
                        warn!("Combined table is unparseable: {}", e);
                        None
                    }
                }
            }
        }
    }
}

/// Check a request and resolve its output format
pub fn validate(request: &ScrapeRequest) -> Result<OutputFormat, ScrapeError> {
    let format: OutputFormat = request
        .output_format
        .parse()
        .map_err(ScrapeError::InvalidRequest)?;

    if request.urls.is_empty() {
        return Err(ScrapeError::InvalidRequest(
            "At least one URL is required.".to_string(),
        ));
    }
    if request.parse_description.trim().is_empty() {
        return Err(ScrapeError::InvalidRequest(
            "Parse description must not be empty.".to_string(),
        ));
    }

    Ok(format)
}
