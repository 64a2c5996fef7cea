//! Types produced by the extraction pipeline

use crate::error::{FragmentError, InvokeError};
use tabscrape_domain::{CsvFragment, MasterTable};

/// Raw LLM output for one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Index of the chunk the text was extracted from
    pub chunk_index: usize,

    /// Raw response text (non-empty)
    pub text: String,
}

/// A chunk whose LLM call produced nothing usable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFailure {
    /// Index of the failed chunk, when known
    pub chunk_index: Option<usize>,

    /// Why the call failed
    pub error: InvokeError,
}

/// Outcome of invoking the LLM over every chunk of a document
///
/// `results` are in completion order, not chunk order.
#[derive(Debug, Clone, Default)]
pub struct InvocationReport {
    /// Successful, non-empty extractions
    pub results: Vec<ExtractionResult>,

    /// Chunks that yielded nothing
    pub failures: Vec<ChunkFailure>,
}

impl InvocationReport {
    /// Total number of chunks accounted for
    pub fn total(&self) -> usize {
        self.results.len() + self.failures.len()
    }
}

/// A fragment after cleaning, with what the cleaner dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedFragment {
    /// The cleaned fragment
    pub fragment: CsvFragment,

    /// Rows dropped for malformed CSV or a wrong field count
    pub dropped_rows: usize,

    /// Repeated header lines that were skipped
    pub duplicate_headers: usize,
}

/// A fragment the reconciler left out of the master table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFragment {
    /// Header of the rejected fragment
    pub header: String,

    /// Why it was rejected
    pub reason: FragmentError,
}

/// Outcome of merging fragments into one table
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// The master table
    pub table: MasterTable,

    /// Fragments whose rows were merged (including the master's own)
    pub fragments_used: usize,

    /// Fragments left out entirely
    pub rejected: Vec<RejectedFragment>,

    /// Individual rows left out of otherwise accepted fragments
    pub rows_rejected: usize,
}

/// Counters describing one document's pass through the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Characters of reduced text (after truncation)
    pub reduced_chars: usize,

    /// Whether the reduced text was truncated
    pub truncated: bool,

    /// Number of chunks sent to the LLM
    pub chunks: usize,

    /// Chunks whose call returned non-empty text
    pub chunks_extracted: usize,

    /// Chunks whose call failed, timed out or returned nothing
    pub chunks_failed: usize,

    /// Extractions that survived cleaning
    pub fragments: usize,

    /// Extractions the cleaner rejected outright
    pub fragments_discarded: usize,

    /// Fragments the reconciler merged
    pub fragments_merged: usize,

    /// Fragments the reconciler rejected
    pub fragments_rejected: usize,

    /// Rows dropped by the cleaner or the reconciler
    pub rows_dropped: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Result of extracting one document
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// The document's master table, if any fragment survived
    pub table: Option<MasterTable>,

    /// Pipeline counters
    pub stats: ExtractionStats,
}
