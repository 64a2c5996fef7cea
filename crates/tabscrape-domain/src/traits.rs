//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and its
//! collaborators. Implementations live in other crates.

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (tabscrape-llm). Calls are
/// synchronous from the caller's point of view and must be safe to issue
/// concurrently from several threads.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a text completion for a fully rendered prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Name of the model answering the prompts, for diagnostics
    fn model_name(&self) -> &str {
        "llm"
    }
}

/// Trait for counting tokens the way an LLM context window does
///
/// Implemented by the application layer (tabscrape-extractor). Counting must
/// be deterministic: the same text always yields the same count.
pub trait Tokenizer {
    /// Count the tokens in `text`
    fn count_tokens(&self, text: &str) -> usize;

    /// Short identifier for logs
    fn name(&self) -> &str;
}
