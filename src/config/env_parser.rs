//! Environment variable parsing utilities for configuration.

use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;

use crate::embedding::EmbedderKind;
use crate::errors::Error;

use super::paths;

/// Parse environment variable value or return error if empty/whitespace.
fn parse_env_string(name: &str, value: &str) -> Result<String, Error> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    Ok(value.to_string())
}

/// Parse environment variable as a path, expanding tilde.
fn parse_env_path(name: &str, value: &str) -> Result<PathBuf, Error> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    Ok(paths::expand_tilde_path(&PathBuf::from(value)))
}

/// Parse environment variable as a number; range checks happen in validation.
fn parse_env_number<T>(name: &str, value: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid {name} value: {e}")))
}

/// Read `name` and, when set, store the parsed value in `target`.
fn apply<T>(
    name: &str,
    target: &mut T,
    parse: impl FnOnce(&str, &str) -> Result<T, Error>,
) -> Result<(), Error> {
    if let Ok(val) = std::env::var(name) {
        *target = parse(name, &val)?;
    }
    Ok(())
}

/// Apply MINDVAULT_EMBEDDER environment variable override.
pub fn apply_embedder_override(embedder: &mut EmbedderKind) -> Result<(), Error> {
    apply("MINDVAULT_EMBEDDER", embedder, |name, value| {
        parse_env_string(name, value)?.parse()
    })
}

/// Apply MINDVAULT_DIMENSION environment variable override.
pub fn apply_dimension_override(dimension: &mut usize) -> Result<(), Error> {
    apply("MINDVAULT_DIMENSION", dimension, parse_env_number)
}

/// Apply MINDVAULT_EMBEDDING_MODEL environment variable override.
pub fn apply_embedding_model_override(embedding_model: &mut String) -> Result<(), Error> {
    apply("MINDVAULT_EMBEDDING_MODEL", embedding_model, parse_env_string)
}

/// Apply MINDVAULT_API_BASE_URL environment variable override.
pub fn apply_api_base_url_override(api_base_url: &mut String) -> Result<(), Error> {
    apply("MINDVAULT_API_BASE_URL", api_base_url, parse_env_string)
}

/// Apply MINDVAULT_TOP_K environment variable override.
pub fn apply_top_k_override(top_k: &mut usize) -> Result<(), Error> {
    apply("MINDVAULT_TOP_K", top_k, parse_env_number)
}

/// Apply MINDVAULT_DATA_DIR environment variable override.
pub fn apply_data_dir_override(data_dir: &mut PathBuf) -> Result<(), Error> {
    apply("MINDVAULT_DATA_DIR", data_dir, parse_env_path)
}

/// Apply MINDVAULT_USER_ID environment variable override.
pub fn apply_user_id_override(user_id: &mut String) -> Result<(), Error> {
    apply("MINDVAULT_USER_ID", user_id, parse_env_string)
}

/// Apply MINDVAULT_REQUEST_TIMEOUT_SECS environment variable override.
pub fn apply_request_timeout_override(timeout_secs: &mut u64) -> Result<(), Error> {
    apply("MINDVAULT_REQUEST_TIMEOUT_SECS", timeout_secs, parse_env_number)
}

/// Read OPENAI_API_KEY. An empty value counts as unset.
pub fn apply_api_key_override(api_key: &mut Option<SecretString>) {
    if let Ok(val) = std::env::var("OPENAI_API_KEY") {
        if !val.trim().is_empty() {
            *api_key = Some(SecretString::new(val.trim().to_string()));
        }
    }
}
