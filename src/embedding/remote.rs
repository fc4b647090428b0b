//! OpenAI-compatible embeddings over the `/v1/embeddings` endpoint.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Error;

use super::Embedder;

/// Default model used by the remote backend.
pub const DEFAULT_REMOTE_MODEL: &str = "text-embedding-ada-002";
/// Output size of `text-embedding-ada-002`.
pub const DEFAULT_REMOTE_DIMS: usize = 1536;

/// Native output size of well-known OpenAI embedding models.
pub fn known_model_dimensions(model: &str) -> Option<usize> {
    match model {
        DEFAULT_REMOTE_MODEL | "text-embedding-3-small" => Some(DEFAULT_REMOTE_DIMS),
        "text-embedding-3-large" => Some(3072),
        _ => None,
    }
}

/// Blocking client for an OpenAI-compatible embeddings API.
///
/// Retries are not attempted; callers decide whether a failed request is worth
/// repeating.
pub struct RemoteEmbedder {
    client: reqwest::blocking::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    dims: usize,
}

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn has_version_suffix(base_url: &str) -> bool {
    let Some(last_segment) = base_url.rsplit('/').next() else {
        return false;
    };
    let Some(rest) = last_segment.strip_prefix('v') else {
        return false;
    };
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
}

fn embeddings_endpoint(base_url: &str) -> String {
    let normalized = normalize_base_url(base_url);
    if normalized.ends_with("/embeddings") {
        return normalized;
    }
    if has_version_suffix(&normalized) {
        return format!("{normalized}/embeddings");
    }
    format!("{normalized}/v1/embeddings")
}

impl RemoteEmbedder {
    /// Create a client for `https://api.openai.com` with the default model.
    ///
    /// # Errors
    ///
    /// Returns `Error::Embedding` if the HTTP client cannot be constructed.
    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Embedding(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            base_url: normalize_base_url("https://api.openai.com"),
            model: DEFAULT_REMOTE_MODEL.to_string(),
            dims: DEFAULT_REMOTE_DIMS,
        })
    }

    pub fn with_model(mut self, model: &str, dims: usize) -> Self {
        self.model = model.to_string();
        self.dims = dims;
        self
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = normalize_base_url(url);
        self
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

/// Put response vectors back in request order and check the count.
fn into_ordered_vectors(
    response: EmbeddingResponse,
    expected: usize,
) -> Result<Vec<Vec<f32>>, Error> {
    if response.data.len() != expected {
        return Err(Error::Embedding(format!(
            "Provider returned {} embeddings for {} inputs",
            response.data.len(),
            expected
        )));
    }

    let mut data = response.data;
    if data.iter().all(|item| item.index.is_some()) {
        data.sort_by_key(|item| item.index);
        let in_range = data
            .iter()
            .enumerate()
            .all(|(position, item)| item.index == Some(position));
        if !in_range {
            return Err(Error::Embedding(
                "Provider returned duplicate or out-of-range embedding indices".to_string(),
            ));
        }
    }
    Ok(data.into_iter().map(|item| item.embedding).collect())
}

impl Embedder for RemoteEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, Error> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| Error::Embedding("Empty embedding response".to_string()))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Error> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        if texts.iter().any(|text| text.trim().is_empty()) {
            return Err(Error::Embedding("Cannot embed empty text".to_string()));
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        debug!(model = %self.model, inputs = texts.len(), "requesting remote embeddings");
        let response = self
            .client
            .post(embeddings_endpoint(&self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| Error::Embedding(format!("Embedding request failed: {e}")))?
            .json::<EmbeddingResponse>()
            .map_err(|e| Error::Embedding(format!("Malformed embedding response: {e}")))?;

        into_ordered_vectors(response, texts.len())
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
