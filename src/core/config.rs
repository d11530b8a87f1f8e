//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::core::client::{
    with_api_version, with_base_url, with_retry_policy, with_timeout, Translator,
    TranslatorOption,
};
use crate::core::endpoint::ApiVersion;
use crate::core::errors::{Result, TranslationError};
use crate::core::retry::{Backoff, RetryPolicy, DEFAULT_MAX_ATTEMPTS};

/// Configuration for translator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub api_version: Option<ApiVersion>,
    pub timeout_ms: u64,
    pub max_attempts: u32,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            api_version: None,
            timeout_ms: 10_000,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl TranslatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup, environment style
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = lookup("DEEPL_API_KEY")
            .or_else(|| lookup("DEEPLX_API_KEY"))
            .unwrap_or_default();

        let base_url = lookup("DEEPLX_API_URL").filter(|url| !url.is_empty());

        let api_version = lookup("DEEPLX_API_VERSION")
            .filter(|v| !v.is_empty())
            .map(|v| v.parse::<ApiVersion>())
            .transpose()?;

        let timeout_ms = match lookup("REQUEST_TIMEOUT_MS") {
            Some(v) => v.parse::<u64>().map_err(|e| {
                TranslationError::config(format!("REQUEST_TIMEOUT_MS: {e}"))
            })?,
            None => defaults.timeout_ms,
        };

        let max_attempts = match lookup("MAX_ATTEMPTS") {
            Some(v) => v
                .parse::<u32>()
                .map_err(|e| TranslationError::config(format!("MAX_ATTEMPTS: {e}")))?,
            None => defaults.max_attempts,
        };

        Ok(Self {
            api_key,
            base_url,
            api_version,
            timeout_ms,
            max_attempts,
        })
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            TranslationError::config(format!("invalid config file: {e}"))
        })?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(TranslationError::EncodeError)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            warn!("No API key configured, requests are sent without Authorization");
        }

        if self.timeout_ms == 0 {
            return Err(TranslationError::config("timeout_ms must be greater than 0"));
        }

        if self.max_attempts == 0 {
            return Err(TranslationError::config("max_attempts must be greater than 0"));
        }

        Ok(())
    }

    /// Construction options equivalent to this configuration
    pub fn options(&self) -> Vec<TranslatorOption> {
        let mut opts = vec![
            with_timeout(Duration::from_millis(self.timeout_ms)),
            with_retry_policy(RetryPolicy::new(self.max_attempts, Backoff::default())),
        ];
        if let Some(base_url) = &self.base_url {
            opts.push(with_base_url(base_url));
        }
        if let Some(version) = self.api_version {
            opts.push(with_api_version(version));
        }
        opts
    }

    /// Validate and build a translator, with `extra` options applied last
    pub fn into_translator(
        self,
        extra: impl IntoIterator<Item = TranslatorOption>,
    ) -> Result<Translator> {
        self.validate()?;
        let mut opts = self.options();
        opts.extend(extra);

        let translator = Translator::new(&self.api_key, opts)?;
        info!(
            "Using {} ({} API, {} tier)",
            translator.server_url(),
            translator.version(),
            translator.tier()
        );
        Ok(translator)
    }
}
