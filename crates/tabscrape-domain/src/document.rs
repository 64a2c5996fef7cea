//! Document module - reduced page text and the chunks cut from it

use std::fmt;

/// Plain, line-oriented text derived from a fetched page
///
/// Produced by the reducer; contains no markup tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReducedText(String);

impl ReducedText {
    /// Wrap already-reduced text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the text
    pub fn into_string(self) -> String {
        self.0
    }

    /// Length in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for ReducedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bounded-size slice of reduced text sent to the LLM in one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk within its document (0-based)
    pub index: usize,

    /// Chunk text
    pub text: String,

    /// Token count as measured by the tokenizer that produced the chunk
    pub token_count: usize,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(index: usize, text: impl Into<String>, token_count: usize) -> Self {
        Self {
            index,
            text: text.into(),
            token_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_text_char_len_counts_chars() {
        assert_eq!(ReducedText::new("café").char_len(), 4);
    }
}
