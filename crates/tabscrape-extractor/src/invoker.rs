//! Concurrent LLM invocation over a document's chunks
//!
//! Every chunk gets its own task. A semaphore caps how many provider calls
//! run at once, each call is bounded by a timeout, and a failure in one
//! chunk never affects the others.

use crate::error::InvokeError;
use crate::prompt::PromptBuilder;
use crate::types::{ChunkFailure, ExtractionResult, InvocationReport};
use std::sync::Arc;
use std::time::Duration;
use tabscrape_domain::traits::LlmProvider;
use tabscrape_domain::Chunk;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Sends chunks to the LLM with bounded concurrency
pub struct ExtractionInvoker<L> {
    llm: Arc<L>,
    permits: Arc<Semaphore>,
    call_timeout: Duration,
}

impl<L> Clone for ExtractionInvoker<L> {
    fn clone(&self) -> Self {
        Self {
            llm: Arc::clone(&self.llm),
            permits: Arc::clone(&self.permits),
            call_timeout: self.call_timeout,
        }
    }
}

impl<L> ExtractionInvoker<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new invoker
    ///
    /// `max_concurrency` is clamped to at least one.
    pub fn new(llm: Arc<L>, max_concurrency: usize, call_timeout: Duration) -> Self {
        Self {
            llm,
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
            call_timeout,
        }
    }

    /// Invoke the LLM once per chunk
    ///
    /// Results are collected in completion order. Failed, timed out and empty
    /// calls are reported in `failures` and never abort the batch.
    pub async fn invoke(&self, chunks: &[Chunk], description: &str) -> InvocationReport {
        let mut tasks = JoinSet::new();

        for chunk in chunks {
            let prompt = PromptBuilder::new(&chunk.text, description).build();
            let index = chunk.index;
            let this = self.clone();
            tasks.spawn(async move { (index, this.call(index, prompt).await) });
        }

        let mut report = InvocationReport::default();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((chunk_index, Ok(text))) => {
                    report.results.push(ExtractionResult { chunk_index, text });
                }
                Ok((chunk_index, Err(error))) => {
                    warn!("Chunk {} yielded nothing: {}", chunk_index, error);
                    report.failures.push(ChunkFailure {
                        chunk_index: Some(chunk_index),
                        error,
                    });
                }
                Err(e) => {
                    warn!("Extraction task failed: {}", e);
                    report.failures.push(ChunkFailure {
                        chunk_index: None,
                        error: InvokeError::Worker(e.to_string()),
                    });
                }
            }
        }

        debug!(
            "Invocation finished: {} extracted, {} failed",
            report.results.len(),
            report.failures.len()
        );

        report
    }

    async fn call(&self, index: usize, prompt: String) -> Result<String, InvokeError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| InvokeError::Worker(e.to_string()))?;

        debug!("Calling LLM for chunk {} ({} prompt chars)", index, prompt.len());

        let llm = Arc::clone(&self.llm);
        // Held until the provider returns, even past the timeout.
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            llm.generate(&prompt).map_err(|e| InvokeError::Llm(e.to_string()))
        });

        let text = timeout(self.call_timeout, handle)
            .await
            .map_err(|_| InvokeError::Timeout(self.call_timeout))?
            .map_err(|e| InvokeError::Worker(e.to_string()))??;

        if text.trim().is_empty() {
            return Err(InvokeError::EmptyExtraction);
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tabscrape_llm::{LlmError, MockProvider};

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(i, *t, 1))
            .collect()
    }

    /// Records the highest number of simultaneous calls
    struct ConcurrencyProbe {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl LlmProvider for ConcurrencyProbe {
        type Error = LlmError;

        fn generate(&self, _prompt: &str) -> Result<String, Self::Error> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(30));
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok("a\n1".to_string())
        }
    }

    #[tokio::test]
    async fn test_every_chunk_is_invoked() {
        let llm = Arc::new(MockProvider::new("name,price\nWidget,9.99"));
        let invoker = ExtractionInvoker::new(Arc::clone(&llm), 4, Duration::from_secs(5));

        let report = invoker.invoke(&chunks(&["one", "two", "three"]), "products").await;

        assert_eq!(report.results.len(), 3);
        assert!(report.failures.is_empty());
        assert_eq!(llm.call_count(), 3);

        let mut indices: Vec<usize> = report.results.iter().map(|r| r.chunk_index).collect();
        indices.sort();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_failed_chunk_does_not_affect_others() {
        let mut mock = MockProvider::new("name\nok");
        mock.add_error("poison");
        let invoker = ExtractionInvoker::new(Arc::new(mock), 2, Duration::from_secs(5));

        let report = invoker
            .invoke(&chunks(&["alpha", "poison", "gamma"]), "names")
            .await;

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].chunk_index, Some(1));
        assert!(matches!(report.failures[0].error, InvokeError::Llm(_)));
    }

    #[tokio::test]
    async fn test_empty_response_is_a_failure() {
        let mut mock = MockProvider::new("a,b\n1,2");
        mock.add_response("nothing-here", "  \n ");
        let invoker = ExtractionInvoker::new(Arc::new(mock), 2, Duration::from_secs(5));

        let report = invoker
            .invoke(&chunks(&["data", "nothing-here"]), "things")
            .await;

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.failures[0].error, InvokeError::EmptyExtraction);
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let mock = MockProvider::new("a\n1").with_delay(Duration::from_millis(300));
        let invoker = ExtractionInvoker::new(Arc::new(mock), 1, Duration::from_millis(20));

        let report = invoker.invoke(&chunks(&["slow"]), "anything").await;

        assert!(report.results.is_empty());
        assert!(matches!(report.failures[0].error, InvokeError::Timeout(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let probe = Arc::new(ConcurrencyProbe {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let invoker = ExtractionInvoker::new(Arc::clone(&probe), 2, Duration::from_secs(5));

        let texts: Vec<String> = (0..8).map(|i| format!("chunk {}", i)).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let report = invoker.invoke(&chunks(&refs), "rows").await;

        assert_eq!(report.results.len(), 8);
        assert!(probe.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_no_chunks() {
        let invoker = ExtractionInvoker::new(Arc::new(MockProvider::default()), 2, Duration::from_secs(1));
        let report = invoker.invoke(&[], "anything").await;
        assert_eq!(report.total(), 0);
    }
}
