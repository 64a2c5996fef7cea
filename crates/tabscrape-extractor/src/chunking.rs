//! Token-aware chunking of reduced text
//!
//! Lines are packed greedily into chunks that fit the token budget. A line
//! that alone exceeds the budget is packed word by word instead. A single
//! word longer than the budget is the only thing ever emitted over budget.

use std::sync::Arc;
use tabscrape_domain::traits::Tokenizer;
use tabscrape_domain::Chunk;

/// Separator used when packing lines into a chunk
pub const LINE_SEPARATOR: &str = "\n";

/// Separator used when packing the words of an overlong line
pub const WORD_SEPARATOR: &str = " ";

/// Splits text into chunks bounded by a token budget
#[derive(Clone)]
pub struct TokenChunker {
    tokenizer: Arc<dyn Tokenizer + Send + Sync>,
    max_tokens: usize,
}

impl TokenChunker {
    /// Create a new chunker
    pub fn new(tokenizer: Arc<dyn Tokenizer + Send + Sync>, max_tokens: usize) -> Self {
        Self {
            tokenizer,
            max_tokens,
        }
    }

    /// Token budget per chunk
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Chunk the given text
    ///
    /// Blank lines are skipped. Chunks come back in document order.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let mut pieces = Vec::new();
        let mut current = String::new();

        for paragraph in text.lines().filter(|l| !l.trim().is_empty()) {
            if self.count(paragraph) > self.max_tokens {
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
                pieces.extend(self.pack(paragraph.split_whitespace(), WORD_SEPARATOR));
                continue;
            }
            self.push_or_flush(&mut pieces, &mut current, paragraph, LINE_SEPARATOR);
        }

        if !current.is_empty() {
            pieces.push(current);
        }

        pieces
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let token_count = self.count(&text);
                Chunk::new(index, text, token_count)
            })
            .collect()
    }

    /// Greedily combine elements until adding the next would exceed the budget
    fn pack<'a>(&self, elements: impl Iterator<Item = &'a str>, separator: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for element in elements {
            self.push_or_flush(&mut chunks, &mut current, element, separator);
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    fn push_or_flush(
        &self,
        chunks: &mut Vec<String>,
        current: &mut String,
        element: &str,
        separator: &str,
    ) {
        if current.is_empty() {
            current.push_str(element);
            return;
        }

        let candidate_len = current.len() + separator.len() + element.len();
        let mut candidate = String::with_capacity(candidate_len);
        candidate.push_str(current);
        candidate.push_str(separator);
        candidate.push_str(element);

        if self.count(&candidate) > self.max_tokens {
            chunks.push(std::mem::replace(current, element.to_string()));
        } else {
            *current = candidate;
        }
    }

    fn count(&self, text: &str) -> usize {
        self.tokenizer.count_tokens(text)
    }
}
