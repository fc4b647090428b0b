//! Configuration system for mindvault.

mod env_parser;
mod loader;
mod overrides;
mod paths;
mod validation;

#[cfg(test)]
mod tests_utils;
#[cfg(test)]
use tests_utils::ENV_MUTEX;

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;

use crate::embedding::EmbedderKind;
use crate::errors::Error;

pub use loader::ConfigFile;

/// Default embedding dimension for the hash embedder.
pub const DEFAULT_DIMENSION: usize = 128;

/// Configuration values with priority: defaults < config file < env vars.
#[derive(Debug, Clone)]
pub struct Config {
    /// Embedding backend.
    pub embedder: EmbedderKind,

    /// Vector length shared by the embedder and the memory store.
    pub dimension: usize,

    /// Embedding model identifier (remote model name or HF Hub id).
    pub embedding_model: String,

    /// Base URL of the OpenAI-compatible API.
    pub api_base_url: String,

    /// API key for the remote embedder. Only read from `OPENAI_API_KEY`.
    pub api_key: Option<SecretString>,

    /// Number of memories retrieved per question.
    pub top_k: usize,

    /// Directory holding `habits.json`, `calendar.json` and `notes.txt`.
    pub data_dir: PathBuf,

    /// User id stamped onto ingested memories.
    pub user_id: String,

    /// Timeout for remote embedding requests, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        // Use home directory with sensible fallback for systems without HOME
        let home = dirs::home_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
        });

        Self {
            embedder: EmbedderKind::Hash,
            dimension: DEFAULT_DIMENSION,
            embedding_model: "text-embedding-ada-002".to_string(),
            api_base_url: "https://api.openai.com".to_string(),
            api_key: None,
            top_k: 3,
            data_dir: home.join(".mindvault").join("data"),
            user_id: "demo".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration with defaults, file values, and environment overrides.
    ///
    /// The file is `{config_dir}/mindvault/config.toml`; a missing file is not an error.
    pub fn load() -> Result<Self, Error> {
        Self::load_with_file(loader::default_config_path().as_deref())
    }

    /// Like [`Config::load`], reading the given file instead of the default location.
    pub fn load_with_file(path: Option<&Path>) -> Result<Self, Error> {
        let file_config = match path {
            Some(path) => loader::load_from_path(path)?,
            None => None,
        };

        let mut config = Config::default();

        if let Some(mut file) = file_config {
            if let Some(data_dir) = file.data_dir.as_mut() {
                paths::expand_tilde(data_dir);
            }
            config.merge_from_file(file);
        }

        overrides::apply_env_overrides(&mut config)?;

        config.validate()?;

        Ok(config)
    }

    /// Merge configuration from a file into this config.
    fn merge_from_file(&mut self, file: ConfigFile) {
        if let Some(embedder) = file.embedder {
            self.embedder = embedder;
        }
        if let Some(dimension) = file.dimension {
            self.dimension = dimension;
        }
        if !file.embedding_model.is_empty() {
            self.embedding_model = file.embedding_model;
        }
        if !file.api_base_url.is_empty() {
            self.api_base_url = file.api_base_url;
        }
        if let Some(top_k) = file.top_k {
            self.top_k = top_k;
        }
        if let Some(data_dir) = file.data_dir {
            self.data_dir = data_dir;
        }
        if !file.user_id.is_empty() {
            self.user_id = file.user_id;
        }
        if let Some(timeout) = file.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), Error> {
        validation::ConfigValidator { config: self }.validate()
    }

    /// Remote request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
