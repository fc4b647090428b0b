//! Configuration validation logic.

use crate::embedding::{EmbedderKind, known_model_dimensions};
use crate::errors::Error;

use super::Config;

/// Validates configuration values.
pub struct ConfigValidator<'a> {
    pub config: &'a Config,
}

impl ConfigValidator<'_> {
    /// Validate all configuration values for correctness and constraints.
    ///
    /// Checks that:
    /// - Dimension and top_k are positive
    /// - Request timeout is positive
    /// - Embedding model and user id are not empty
    /// - API base URL uses http or https
    /// - Data directory is not empty
    /// - The embedding model fits the chosen embedder and dimension
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if any validation check fails.
    pub fn validate(&self) -> Result<(), Error> {
        self.validate_positive("dimension", self.config.dimension as u64)?;
        self.validate_positive("top_k", self.config.top_k as u64)?;
        self.validate_positive("request_timeout_secs", self.config.request_timeout_secs)?;
        self.validate_non_empty("Embedding model", &self.config.embedding_model)?;
        self.validate_non_empty("User id", &self.config.user_id)?;
        self.validate_api_base_url()?;
        self.validate_data_dir()?;
        self.validate_embedding_model()?;

        Ok(())
    }

    fn validate_embedding_model(&self) -> Result<(), Error> {
        let model = self.config.embedding_model.trim();
        let known = known_model_dimensions(model);
        match (self.config.embedder, known) {
            (EmbedderKind::Remote, Some(native)) if native != self.config.dimension => {
                Err(Error::Config(format!(
                    "Embedding model {model} produces {native}-dimensional vectors but dimension is {}",
                    self.config.dimension
                )))
            }
            (EmbedderKind::Onnx, Some(_)) => Err(Error::Config(format!(
                "Embedding model {model} is a remote model; the onnx embedder needs a Hugging Face model id"
            ))),
            _ => Ok(()),
        }
    }

    fn validate_positive(&self, name: &str, value: u64) -> Result<(), Error> {
        if value == 0 {
            return Err(Error::Config(format!(
                "Invalid {name}: must be a positive integer"
            )));
        }
        Ok(())
    }

    fn validate_non_empty(&self, name: &str, value: &str) -> Result<(), Error> {
        if value.trim().is_empty() {
            return Err(Error::Config(format!("{name} cannot be empty")));
        }
        Ok(())
    }

    fn validate_api_base_url(&self) -> Result<(), Error> {
        let url = self.config.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "Invalid API base URL: {url} (must start with http:// or https://)"
            )));
        }
        Ok(())
    }

    fn validate_data_dir(&self) -> Result<(), Error> {
        if self.config.data_dir.as_os_str().is_empty() {
            return Err(Error::Config("Data directory cannot be empty".to_string()));
        }
        Ok(())
    }
}
