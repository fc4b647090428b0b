//! Configuration file loading and parsing.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::embedding::EmbedderKind;
use crate::errors::Error;

/// Configuration loaded from TOML file.
///
/// Missing keys leave the defaults in place.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub embedder: Option<EmbedderKind>,

    #[serde(default)]
    pub dimension: Option<usize>,

    #[serde(default)]
    pub embedding_model: String,

    #[serde(default)]
    pub api_base_url: String,

    #[serde(default)]
    pub top_k: Option<usize>,

    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Default location: `{config_dir}/mindvault/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir().or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
    Some(config_dir.join("mindvault").join("config.toml"))
}

/// Load configuration from a TOML file, if it exists.
pub fn load_from_path(config_path: &Path) -> Result<Option<ConfigFile>, Error> {
    if !config_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(config_path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file {}: {e}",
            config_path.display()
        ))
    })?;

    let config: ConfigFile = toml::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file {}: {e}",
            config_path.display()
        ))
    })?;

    Ok(Some(config))
}
