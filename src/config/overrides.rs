//! Environment variable overrides for configuration.

use crate::errors::Error;

use super::Config;
use super::env_parser;

#[cfg(test)]
use super::tests_utils::{CONFIG_ENV_VARS, ENV_MUTEX, cleanup_env_vars, set_env};

/// Apply environment variable overrides to configuration.
pub fn apply_env_overrides(config: &mut Config) -> Result<(), Error> {
    env_parser::apply_embedder_override(&mut config.embedder)?;
    env_parser::apply_dimension_override(&mut config.dimension)?;
    env_parser::apply_embedding_model_override(&mut config.embedding_model)?;
    env_parser::apply_api_base_url_override(&mut config.api_base_url)?;
    env_parser::apply_top_k_override(&mut config.top_k)?;
    env_parser::apply_data_dir_override(&mut config.data_dir)?;
    env_parser::apply_user_id_override(&mut config.user_id)?;
    env_parser::apply_request_timeout_override(&mut config.request_timeout_secs)?;
    env_parser::apply_api_key_override(&mut config.api_key);
    Ok(())
}
