use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::common::constants::{
    DEFAULT_API_URL, DEFAULT_CONFIG_FILE, DEFAULT_PROGRESS_EVERY, DEFAULT_TIMEOUT_SECONDS,
    DEFAULT_USER_AGENT, ENV_API_KEY, ENV_API_URL, ENV_MAX_CONCURRENCY,
};
use crate::common::error::{EnricherError, Result};

/// Run configuration. Layered as: defaults, TOML file, environment, CLI flags.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub api_key: Option<String>,
    /// Cap on lookups in flight; unbounded when unset
    pub max_concurrency: Option<usize>,
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Log progress every N completed lookups
    pub progress_every: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            max_concurrency: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

impl Config {
    /// Load from `path`, or from `enricher.toml` if it exists. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, required) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !config_path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path).map_err(|e| {
            EnricherError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply `ENRICHER_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    pub fn apply_env_from<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = var(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(url) = var(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(raw) = var(ENV_MAX_CONCURRENCY).filter(|v| !v.trim().is_empty()) {
            let cap = raw.trim().parse::<usize>().map_err(|e| {
                EnricherError::Config(format!("{} must be a positive integer, got '{}': {}", ENV_MAX_CONCURRENCY, raw, e))
            })?;
            self.max_concurrency = Some(cap);
        }
        Ok(())
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| EnricherError::Config(format!("API key missing: set {} or api_key in the config file", ENV_API_KEY)))
    }

    pub fn validate(&self) -> Result<()> {
        self.require_api_key()?;
        if self.api_url.trim().is_empty() {
            return Err(EnricherError::Config("api_url must not be empty".to_string()));
        }
        if self.max_concurrency == Some(0) {
            return Err(EnricherError::Config("max_concurrency must be at least 1".to_string()));
        }
        if self.timeout_seconds == 0 {
            return Err(EnricherError::Config("timeout_seconds must be at least 1".to_string()));
        }
        Ok(())
    }
}
