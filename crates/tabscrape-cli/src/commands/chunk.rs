//! Chunk command implementation.

use crate::cli::ChunkArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::fs;
use std::sync::Arc;
use tabscrape_domain::Chunk;
use tabscrape_extractor::{HeuristicTokenizer, TextReducer, TokenChunker};

/// Execute the chunk command.
pub async fn execute_chunk(args: ChunkArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let raw = fs::read_to_string(&args.file)?;
    let max_tokens = args.max_tokens.unwrap_or(config.service.extractor.max_tokens);

    let chunks = chunk_markup(&raw, max_tokens)?;
    println!("{}", formatter.chunk_listing(&chunks));

    Ok(())
}

/// Reduce markup to text and split it as the extractor would.
pub fn chunk_markup(raw: &str, max_tokens: usize) -> Result<Vec<Chunk>> {
    let reduced = TextReducer::new().reduce(raw)?;
    let chunker = TokenChunker::new(Arc::new(HeuristicTokenizer), max_tokens.max(1));
    Ok(chunker.chunk(reduced.as_str()))
}
