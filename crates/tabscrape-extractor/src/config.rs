//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How fragment headers are compared against the master header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
    /// Literal string equality
    Exact,
    /// Equality after trimming fields, case-folding and collapsing whitespace
    Normalized,
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        HeaderPolicy::Exact
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Token budget per chunk
    pub max_tokens: usize,

    /// Maximum LLM calls in flight for one document
    pub max_concurrency: usize,

    /// Maximum time for a single LLM call (seconds), provider retries included
    pub call_timeout_secs: u64,

    /// Header comparison used during reconciliation
    pub header_policy: HeaderPolicy,

    /// Reduced text beyond this many characters is truncated
    pub max_text_length: usize,
}

impl ExtractorConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_tokens: 500,
            max_concurrency: 8,
            call_timeout_secs: 200,
            header_policy: HeaderPolicy::Exact,
            max_text_length: 200_000,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: small chunks, more parallel calls
    pub fn aggressive() -> Self {
        Self {
            max_tokens: 300,
            max_concurrency: 16,
            call_timeout_secs: 200,
            header_policy: HeaderPolicy::Exact,
            max_text_length: 100_000,
        }
    }

    /// Lenient preset: larger chunks, longer timeouts, normalized headers
    pub fn lenient() -> Self {
        Self {
            max_tokens: 1_500,
            max_concurrency: 4,
            call_timeout_secs: 600,
            header_policy: HeaderPolicy::Normalized,
            max_text_length: 500_000,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
