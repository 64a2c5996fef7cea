//! tabscrape Extractor
//!
//! Turns fetched page markup into a table with the help of an LLM.
//!
//! # Architecture
//!
//! ```text
//! raw markup → TextReducer → TokenChunker → [parallel] ExtractionInvoker
//!            → FragmentCleaner (per result) → FragmentReconciler → MasterTable
//! ```
//!
//! Reduction, chunking, cleaning and reconciliation are synchronous and pure.
//! The only suspension point is the LLM call, which runs on the blocking pool
//! with bounded concurrency and a per-call timeout.
//!
//! # Failure model
//!
//! A chunk whose call fails, times out or returns nothing contributes
//! nothing. A response whose header does not parse is dropped, and so is any
//! row whose field count disagrees with its header. None of this aborts the
//! document; the caller only learns whether a table survived.
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use tabscrape_extractor::{DocumentExtractor, ExtractorConfig};
//! use tabscrape_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = Arc::new(MockProvider::new("name,price\nWidget,9.99"));
//! let extractor = DocumentExtractor::new(llm, ExtractorConfig::default())?;
//!
//! let report = extractor
//!     .extract_document("<body><p>Widget costs 9.99</p></body>", "product name and price")
//!     .await;
//!
//! if let Some(table) = report.table {
//!     println!("{}", table);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod chunking;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod extractor;
pub mod invoker;
pub mod prompt;
pub mod reconciler;
pub mod reducer;
pub mod tokenizer;
pub mod types;


pub use chunking::TokenChunker;
pub use cleaner::FragmentCleaner;
pub use config::{ExtractorConfig, HeaderPolicy};
pub use error::{ExtractorError, FragmentError, InvokeError, ReduceError};
pub use extractor::DocumentExtractor;
pub use invoker::ExtractionInvoker;
pub use prompt::PromptBuilder;
pub use reconciler::FragmentReconciler;
pub use reducer::TextReducer;
pub use tokenizer::HeuristicTokenizer;
#[cfg(feature = "tiktoken")]
pub use tokenizer::TiktokenTokenizer;
pub use types::{
    ChunkFailure, CleanedFragment, DocumentReport, ExtractionResult, ExtractionStats,
    InvocationReport, Reconciliation, RejectedFragment,
};
