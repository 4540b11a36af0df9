//! Engine configuration.
//!
//! Configuration is plain serde data with defaults matching the reader
//! application: five results per search and a two second delay before the
//! store is loaded in the background. It can be read from a JSON file; the
//! embedding service credential is never serialized and is normally taken from
//! the environment.
//!
//! ```
//! use vallu::config::EngineConfig;
//!
//! let config: EngineConfig = serde_json::from_str(r#"{ "default_top_n": 10 }"#).unwrap();
//! assert_eq!(config.default_top_n, 10);
//! assert_eq!(config.load_delay_ms, 2000);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValluError};
use crate::vector::search::RankerConfig;

/// Environment variables consulted for the embedding service credential, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["VALLU_OPENAI_API_KEY", "OPENAI_API_KEY"];

/// Default embedding model.
pub const DEFAULT_MODEL: &str = "text-embedding-ada-002";

/// Default embeddings endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

/// Settings for the remote embedding service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedderConfig {
    /// Model identifier sent with every request.
    pub model: String,
    /// Embeddings endpoint URL.
    pub endpoint: String,
    /// Bearer credential. Never written out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Expected output dimension; `None` uses the model's default.
    pub dimension: Option<usize>,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            dimension: None,
        }
    }
}

impl EmbedderConfig {
    /// Fill a missing credential from the environment.
    pub fn with_env(mut self) -> Self {
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            self.api_key = API_KEY_ENV_VARS
                .iter()
                .filter_map(|name| std::env::var(name).ok())
                .find(|value| !value.trim().is_empty());
        }
        self
    }

    /// Set the credential explicitly.
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Top level configuration of a [`crate::engine::SemanticSearchEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Embedding service settings.
    pub embedder: EmbedderConfig,
    /// Number of results when the caller does not ask for a specific count.
    pub default_top_n: usize,
    /// Delay before the deferred store load starts, in milliseconds.
    pub load_delay_ms: u64,
    /// Stores with at least this many records are scored in parallel.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            embedder: EmbedderConfig::default(),
            default_top_n: 5,
            load_delay_ms: 2000,
            parallel_threshold: RankerConfig::default().parallel_threshold,
        }
    }
}

impl EngineConfig {
    /// Read a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.default_top_n == 0 {
            return Err(ValluError::invalid_config("default_top_n must be positive"));
        }
        if self.embedder.model.trim().is_empty() {
            return Err(ValluError::invalid_config("embedder.model must not be empty"));
        }
        if self.embedder.endpoint.trim().is_empty() {
            return Err(ValluError::invalid_config(
                "embedder.endpoint must not be empty",
            ));
        }
        if self.embedder.dimension == Some(0) {
            return Err(ValluError::invalid_config(
                "embedder.dimension must be positive",
            ));
        }
        Ok(())
    }

    /// Ranker settings derived from this configuration.
    pub fn ranker_config(&self) -> RankerConfig {
        RankerConfig {
            parallel_threshold: self.parallel_threshold,
        }
    }
}
