//! Provider configuration and construction
//!
//! The provider is selected and built once from configuration; the resulting
//! [`AnyProvider`] is then shared by every extraction call.

use crate::chat::{self, ChatCompletionsProvider};
use crate::ollama::{self, OllamaProvider};
use crate::{LlmError, MockProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tabscrape_domain::traits::LlmProvider as LlmProviderTrait;

/// Which backend answers extraction prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Groq chat completions
    Groq,
    /// OpenAI chat completions
    Openai,
    /// Local Ollama
    Ollama,
    /// Deterministic mock (offline runs and tests)
    Mock,
}

impl Default for ProviderKind {
    fn default() -> Self {
        ProviderKind::Groq
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider backend
    #[serde(default)]
    pub provider: ProviderKind,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Override for the provider's base URL / endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per request, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Canned response used by the mock provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_response: Option<String>,
}

fn default_model() -> String {
    chat::DEFAULT_GROQ_MODEL.to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    chat::DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    chat::DEFAULT_MAX_RETRIES
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            endpoint: None,
            temperature: 0.0,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            mock_response: None,
        }
    }
}

impl LlmConfig {
    /// Configuration for the offline mock provider
    pub fn mock(response: impl Into<String>) -> Self {
        Self {
            provider: ProviderKind::Mock,
            model: "mock".to_string(),
            mock_response: Some(response.into()),
            ..Self::default()
        }
    }

    /// Longest a single prompt can take, every attempt and backoff included
    ///
    /// Backoff doubles from one second between attempts.
    pub fn retry_budget(&self) -> Duration {
        let attempts = u64::from(self.max_retries.max(1));
        let backoff = 2u64
            .saturating_pow(self.max_retries.saturating_sub(1))
            .saturating_sub(1);
        Duration::from_secs(self.timeout_secs.saturating_mul(attempts).saturating_add(backoff))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        Ok(())
    }

    /// Build the configured provider
    ///
    /// Hosted providers read their API key from the environment variable
    /// named by `api_key_env`; a missing key is a configuration error.
    pub fn build_provider(&self) -> Result<AnyProvider, LlmError> {
        self.validate().map_err(LlmError::Config)?;
        let timeout = Duration::from_secs(self.timeout_secs);

        let provider = match self.provider {
            ProviderKind::Groq | ProviderKind::Openai => {
                let api_key = std::env::var(&self.api_key_env).map_err(|_| {
                    LlmError::Config(format!("{} not found in environment variables", self.api_key_env))
                })?;
                let base_url = self.endpoint.clone().unwrap_or_else(|| {
                    if self.provider == ProviderKind::Groq {
                        chat::GROQ_BASE_URL.to_string()
                    } else {
                        chat::OPENAI_BASE_URL.to_string()
                    }
                });
                AnyProvider::Chat(
                    ChatCompletionsProvider::new(base_url, &self.model, api_key)
                        .with_temperature(self.temperature)
                        .with_timeout(timeout)
                        .with_max_retries(self.max_retries),
                )
            }
            ProviderKind::Ollama => {
                let endpoint = self
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| ollama::DEFAULT_ENDPOINT.to_string());
                AnyProvider::Ollama(
                    OllamaProvider::new(endpoint, &self.model)
                        .with_temperature(self.temperature)
                        .with_timeout(timeout)
                        .with_max_retries(self.max_retries),
                )
            }
            ProviderKind::Mock => {
                AnyProvider::Mock(MockProvider::new(self.mock_response.clone().unwrap_or_default()))
            }
        };

        Ok(provider)
    }
}

/// Any of the built-in providers, selected at runtime
pub enum AnyProvider {
    /// OpenAI-compatible chat completions
    Chat(ChatCompletionsProvider),
    /// Local Ollama
    Ollama(OllamaProvider),
    /// Deterministic mock
    Mock(MockProvider),
}

impl LlmProviderTrait for AnyProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        match self {
            AnyProvider::Chat(p) => LlmProviderTrait::generate(p, prompt),
            AnyProvider::Ollama(p) => LlmProviderTrait::generate(p, prompt),
            AnyProvider::Mock(p) => p.generate(prompt),
        }
    }

    fn model_name(&self) -> &str {
        match self {
            AnyProvider::Chat(p) => p.model_name(),
            AnyProvider::Ollama(p) => p.model_name(),
            AnyProvider::Mock(p) => p.model_name(),
        }
    }
}
