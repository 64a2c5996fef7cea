//! Error types for the Extractor
//!
//! Per-chunk and per-fragment errors are diagnostics: they are logged and
//! counted, and the affected chunk or fragment contributes nothing. Only
//! [`ExtractorError`] is ever returned to a caller.

use std::time::Duration;
use thiserror::Error;

/// Errors that stop the extractor from being built or run
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tokenizer could not be initialized
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
}

/// Why the reducer produced no text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReduceError {
    /// Input was empty or whitespace only
    #[error("document is empty")]
    EmptyInput,

    /// Markup parsed but no readable text survived reduction
    #[error("document has no readable text")]
    NoTextContent,
}

/// Why an LLM call for one chunk yielded nothing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    /// Provider returned an error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Provider did not answer within the call timeout
    #[error("LLM call timed out after {0:?}")]
    Timeout(Duration),

    /// Provider answered with nothing but whitespace
    #[error("empty extraction")]
    EmptyExtraction,

    /// The worker running the call panicked or was cancelled
    #[error("worker failed: {0}")]
    Worker(String),
}

/// Why a CSV fragment (or part of it) was dropped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    /// Nothing but whitespace after unwrapping
    #[error("empty extraction")]
    EmptyExtraction,

    /// The first line could not be parsed as CSV
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// A row or fragment disagrees with the expected field count
    #[error("column count mismatch: expected {expected}, found {found}")]
    ColumnCountMismatch {
        /// Field count of the governing header
        expected: usize,
        /// Field count actually found
        found: usize,
    },

    /// A fragment's header differs from the master header
    #[error("header mismatch: '{0}'")]
    HeaderMismatch(String),
}
