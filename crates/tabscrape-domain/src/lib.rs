//! tabscrape Domain Layer
//!
//! This crate contains the data model shared by every stage of the
//! page-to-table pipeline. It has ZERO external dependencies and defines the
//! value types and trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **ReducedText**: page text with markup and boilerplate removed
//! - **Chunk**: a token-bounded slice of reduced text sent to the LLM in one call
//! - **CsvFragment**: the cleaned CSV produced from one chunk's LLM response
//! - **MasterTable**: the reconciled table for a document (or a whole request)
//! - **OutputFormat**: the serialization requested by the caller
//!
//! ## Architecture
//!
//! ```text
//! raw markup → reduce → chunk → [parallel] LLM → clean → reconcile → export
//! ```
//!
//! - No external crate dependencies
//! - Infrastructure implementations (LLM providers, tokenizers, fetchers)
//!   live in other crates and plug in through the traits in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod format;
pub mod table;
pub mod traits;

// Re-exports for convenience
pub use document::{Chunk, ReducedText};
pub use format::OutputFormat;
pub use table::{strip_bom, CsvFragment, MasterTable, BOM};
