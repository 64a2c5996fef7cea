//! Core document extraction pipeline

use crate::chunking::TokenChunker;
use crate::cleaner::FragmentCleaner;
use crate::config::ExtractorConfig;
use crate::error::{ExtractorError, ReduceError};
use crate::invoker::ExtractionInvoker;
use crate::reconciler::FragmentReconciler;
use crate::reducer::TextReducer;
use crate::tokenizer::HeuristicTokenizer;
use crate::types::{DocumentReport, ExtractionStats};
use std::sync::Arc;
use std::time::Instant;
use tabscrape_domain::traits::{LlmProvider, Tokenizer};
use tabscrape_domain::{Chunk, ReducedText};
use tracing::{debug, info, warn};

/// The DocumentExtractor turns one raw page into a reconciled table
pub struct DocumentExtractor<L>
where
    L: LlmProvider,
{
    invoker: ExtractionInvoker<L>,
    reducer: TextReducer,
    chunker: TokenChunker,
    cleaner: FragmentCleaner,
    reconciler: FragmentReconciler,
    config: ExtractorConfig,
    model_name: String,
}

impl<L> DocumentExtractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new DocumentExtractor using the heuristic tokenizer
    pub fn new(llm_provider: Arc<L>, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        let model_name = llm_provider.model_name().to_string();
        let invoker = ExtractionInvoker::new(
            llm_provider,
            config.max_concurrency,
            config.call_timeout(),
        );

        Ok(Self {
            invoker,
            reducer: TextReducer::new(),
            chunker: TokenChunker::new(Arc::new(HeuristicTokenizer), config.max_tokens),
            cleaner: FragmentCleaner::new(),
            reconciler: FragmentReconciler::new(config.header_policy),
            config,
            model_name,
        })
    }

    /// Use a different tokenizer for chunking
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer + Send + Sync>) -> Self {
        self.chunker = TokenChunker::new(tokenizer, self.config.max_tokens);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Reconciler configured with this extractor's header policy
    pub fn reconciler(&self) -> FragmentReconciler {
        self.reconciler
    }

    /// Reduce a raw document, truncating it to `max_text_length` characters
    ///
    /// Returns the text and whether it was truncated.
    pub fn reduce(&self, raw: &str) -> Result<(ReducedText, bool), ReduceError> {
        let reduced = self.reducer.reduce(raw)?;
        let limit = self.config.max_text_length;

        match reduced.as_str().char_indices().nth(limit) {
            Some((cut, _)) => {
                warn!(
                    "Reduced text has {} chars, truncating to {}",
                    reduced.char_len(),
                    limit
                );
                let truncated = reduced.as_str()[..cut].to_string();
                Ok((ReducedText::new(truncated), true))
            }
            None => Ok((reduced, false)),
        }
    }

    /// Name of the model answering extraction prompts
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Reduce and chunk a raw document without calling the LLM
    pub fn chunk_document(&self, raw: &str) -> Result<Vec<Chunk>, ReduceError> {
        let (reduced, _) = self.reduce(raw)?;
        Ok(self.chunker.chunk(reduced.as_str()))
    }

    /// Extract a table from one raw document
    ///
    /// Per-chunk and per-fragment failures are logged and counted in the
    /// report; the table is `None` when nothing survived.
    pub async fn extract_document(&self, raw: &str, description: &str) -> DocumentReport {
        let start_time = Instant::now();
        let mut stats = ExtractionStats::default();

        let (reduced, truncated) = match self.reduce(raw) {
            Ok(reduced) => reduced,
            Err(e) => {
                warn!("Nothing to extract: {}", e);
                return DocumentReport { table: None, stats };
            }
        };
        stats.reduced_chars = reduced.char_len();
        stats.truncated = truncated;

        let chunks = self.chunker.chunk(reduced.as_str());
        stats.chunks = chunks.len();

        info!(
            "Extracting '{}' from {} chars in {} chunks with {}",
            description,
            stats.reduced_chars,
            chunks.len(),
            self.model_name
        );

        let invocation = self.invoker.invoke(&chunks, description).await;
        stats.chunks_extracted = invocation.results.len();
        stats.chunks_failed = invocation.failures.len();

        let mut fragments = Vec::with_capacity(invocation.results.len());
        for result in &invocation.results {
            match self.cleaner.clean(&result.text) {
                Ok(cleaned) => {
                    stats.rows_dropped += cleaned.dropped_rows;
                    fragments.push(cleaned.fragment);
                }
                Err(e) => {
                    warn!("Discarding extraction for chunk {}: {}", result.chunk_index, e);
                    stats.fragments_discarded += 1;
                }
            }
        }
        stats.fragments = fragments.len();

        let table = match self.reconciler.reconcile(&fragments) {
            Some(reconciliation) => {
                stats.fragments_merged = reconciliation.fragments_used;
                stats.fragments_rejected = reconciliation.rejected.len();
                stats.rows_dropped += reconciliation.rows_rejected;
                Some(reconciliation.table)
            }
            None => None,
        };

        stats.processing_time_ms = start_time.elapsed().as_millis() as u64;

        match &table {
            Some(table) => info!(
                "Extraction complete: {} rows, {} of {} chunks usable",
                table.row_count(),
                stats.fragments_merged,
                stats.chunks
            ),
            None => debug!("Extraction produced no table"),
        }

        DocumentReport { table, stats }
    }
}
