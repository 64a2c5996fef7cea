//! Configuration file parsing for the router.
//!
//! Loads the bind address, allowed CORS origins and the scrape service
//! sections (`[llm]`, `[extractor]`, `[fetch]`, `combine`) from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tabscrape_sdk::ServiceConfig;
use thiserror::Error;

/// Router configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range or unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Router configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Origins allowed to call the API from a browser
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Scrape service settings
    #[serde(flatten)]
    pub service: ServiceConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost".to_string()]
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            cors_origins: default_cors_origins(),
            service: ServiceConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_address must not be empty".to_string()));
        }
        if self.cors_origins.iter().any(|o| o.trim().is_empty() || o == "*") {
            return Err(ConfigError::Invalid(
                "cors_origins entries must be explicit origins".to_string(),
            ));
        }
        self.service.validate().map_err(ConfigError::Invalid)
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabscrape_llm::ProviderKind;
    use tabscrape_sdk::CombinePolicy;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.cors_origins, vec!["http://localhost"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = RouterConfig::from_toml(
            r#"
                bind_address = "0.0.0.0"
                bind_port = 9000
                cors_origins = ["http://localhost", "chrome-extension://abcdefghijklmnop"]
                combine = "header"

                [llm]
                provider = "mock"
                mock_response = "a,b\n1,2"

                [extractor]
                max_tokens = 300

                [fetch]
                timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.service.combine, CombinePolicy::Header);
        assert_eq!(config.service.llm.provider, ProviderKind::Mock);
        assert_eq!(config.service.extractor.max_tokens, 300);
        assert_eq!(config.service.fetch.timeout_secs, 5);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = RouterConfig::from_toml("").unwrap();
        assert_eq!(config.bind_port, 8000);
        assert_eq!(config.service.extractor.max_tokens, 500);
    }

    #[test]
    fn test_wildcard_origin_rejected() {
        let result = RouterConfig::from_toml(r#"cors_origins = ["*"]"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_service_section() {
        let result = RouterConfig::from_toml("[extractor]\nmax_concurrency = 0");
        assert!(matches!(result, Err(ConfigError::Invalid(msg)) if msg.starts_with("extractor:")));
    }

    #[test]
    fn test_missing_file() {
        let result = RouterConfig::from_file("/nonexistent/tabscrape-router.toml");
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }
}
