//! Token counting implementations

use tabscrape_domain::traits::Tokenizer;

/// Deterministic token estimate that needs no vocabulary
///
/// Counts `max(words, ceil(chars / 4))`. The four-characters-per-token ratio
/// tracks BPE tokenizers on English prose; the word floor keeps short-word
/// text (numbers, tables) from being undercounted.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenizer;

impl Tokenizer for HeuristicTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        let words = text.split_whitespace().count();
        let chars = text.chars().count();
        words.max(chars.div_ceil(4))
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Exact `cl100k_base` BPE token counts
#[cfg(feature = "tiktoken")]
pub struct TiktokenTokenizer {
    bpe: tiktoken_rs::CoreBPE,
}

#[cfg(feature = "tiktoken")]
impl TiktokenTokenizer {
    /// Load the `cl100k_base` vocabulary
    pub fn cl100k() -> Result<Self, crate::ExtractorError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| crate::ExtractorError::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }
}

#[cfg(feature = "tiktoken")]
impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn name(&self) -> &str {
        "cl100k_base"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_empty() {
        assert_eq!(HeuristicTokenizer.count_tokens(""), 0);
    }

    #[test]
    fn test_heuristic_uses_char_ratio_for_long_words() {
        // 1 word, 16 chars
        assert_eq!(HeuristicTokenizer.count_tokens("abcdefghijklmnop"), 4);
    }

    #[test]
    fn test_heuristic_uses_word_floor_for_short_words() {
        // 5 words, 9 chars -> ceil(9/4) = 3 < 5
        assert_eq!(HeuristicTokenizer.count_tokens("1 2 3 4 5"), 5);
    }

    #[test]
    fn test_heuristic_is_monotonic_under_concatenation() {
        let a = "Widget costs 9.99";
        let b = "Gadget costs 4.50";
        let joined = format!("{}\n{}", a, b);
        let t = HeuristicTokenizer;
        assert!(t.count_tokens(&joined) >= t.count_tokens(a));
        assert!(t.count_tokens(&joined) >= t.count_tokens(b));
    }

    #[cfg(feature = "tiktoken")]
    #[test]
    fn test_tiktoken_counts() {
        let t = TiktokenTokenizer::cl100k().unwrap();
        assert!(t.count_tokens("hello world") >= 2);
        assert_eq!(t.count_tokens(""), 0);
    }
}
