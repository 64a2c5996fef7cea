//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tabscrape_sdk::ServiceConfig;

/// CLI configuration.
///
/// The file holds a `[settings]` table for the CLI itself next to the
/// service sections (`combine`, `[llm]`, `[extractor]`, `[fetch]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// CLI settings
    #[serde(default)]
    pub settings: Settings,

    /// Scrape service settings
    #[serde(flatten)]
    pub service: ServiceConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Router used when `--server` is not given; scrape locally when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            server: None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".tabscrape").join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::path(),
        }
    }

    /// Load configuration from `path`, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.service.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply command-line overrides to the extractor section.
    pub fn apply_overrides(&mut self, max_tokens: Option<usize>, concurrency: Option<usize>) -> Result<()> {
        if let Some(max_tokens) = max_tokens {
            self.service.extractor.max_tokens = max_tokens;
        }
        if let Some(concurrency) = concurrency {
            self.service.extractor.max_concurrency = concurrency;
        }
        self.service
            .extractor
            .validate()
            .map_err(CliError::InvalidInput)
    }
}
