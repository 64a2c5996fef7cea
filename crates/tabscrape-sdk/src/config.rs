//! Service configuration

use serde::{Deserialize, Serialize};
use tabscrape_extractor::ExtractorConfig;
use tabscrape_fetch::FetchConfig;
use tabscrape_llm::LlmConfig;

/// How per-URL tables are combined into one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinePolicy {
    /// Keep the first table's columns; later tables with the same number of
    /// columns are renamed onto them, others are skipped
    #[default]
    ColumnCount,

    /// Merge tables whose headers match under the extractor's header policy
    Header,
}

/// Everything needed to build a [`crate::ScrapeService`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Cross-URL combination policy
    #[serde(default)]
    pub combine: CombinePolicy,

    /// LLM provider
    #[serde(default)]
    pub llm: LlmConfig,

    /// Extraction pipeline
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Page fetching
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl ServiceConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.llm.validate().map_err(|e| format!("llm: {}", e))?;
        self.extractor
            .validate()
            .map_err(|e| format!("extractor: {}", e))?;
        self.fetch.validate().map_err(|e| format!("fetch: {}", e))?;

        // A call abandoned by the extractor keeps its worker slot until the
        // provider gives up, so the provider must give up first.
        let budget = self.llm.retry_budget();
        if self.extractor.call_timeout() <= budget {
            return Err(format!(
                "extractor: call_timeout_secs ({}) must exceed the llm retry budget of {}s \
                 (timeout_secs {} x max_retries {} plus backoff)",
                self.extractor.call_timeout_secs,
                budget.as_secs(),
                self.llm.timeout_secs,
                self.llm.max_retries
            ));
        }
        Ok(())
    }

    /// Load from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize TOML: {}", e))
    }
}
