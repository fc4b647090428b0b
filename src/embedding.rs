//! Text-to-vector embedders.
//!
//! All backends implement [`Embedder`]. The backend is chosen once from
//! configuration via [`build_embedder`]; callers hold a `Box<dyn Embedder>`
//! and never branch on the concrete type.

mod hash;
#[cfg(feature = "onnx")]
mod onnx;
mod remote;

pub use hash::HashEmbedder;
#[cfg(feature = "onnx")]
pub use onnx::OnnxEmbedder;
pub use remote::{RemoteEmbedder, known_model_dimensions};

use serde::Deserialize;

use crate::config::Config;
use crate::errors::Error;

/// Capability that maps text to a fixed-length vector.
///
/// Implementations need not be deterministic; the memory store never assumes
/// the same text yields the same vector twice.
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Embedding` on empty input or provider failure.
    fn embed(&self, text: &str) -> Result<Vec<f32>, Error>;

    /// Embed several texts, returning vectors in input order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Error> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Length of every vector this embedder produces.
    fn dimensions(&self) -> usize;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

/// Which embedding backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Deterministic SHA-256 based vectors; no network, no model.
    #[default]
    Hash,
    /// OpenAI-compatible embeddings endpoint.
    Remote,
    /// Local ONNX sentence-transformer (requires the `onnx` feature).
    Onnx,
}

impl std::str::FromStr for EmbedderKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hash" | "mock" => Ok(EmbedderKind::Hash),
            "remote" | "openai" => Ok(EmbedderKind::Remote),
            "onnx" | "local" => Ok(EmbedderKind::Onnx),
            other => Err(Error::Config(format!(
                "Unknown embedder '{other}' (expected hash, remote or onnx)"
            ))),
        }
    }
}

/// Build the embedder selected by `config`.
///
/// # Errors
///
/// Returns `Error::Config` if the remote backend has no API key, or if the
/// ONNX backend is requested without the `onnx` feature.
pub fn build_embedder(config: &Config) -> Result<Box<dyn Embedder>, Error> {
    match config.embedder {
        EmbedderKind::Hash => Ok(Box::new(HashEmbedder::new(config.dimension)?)),
        EmbedderKind::Remote => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                Error::Config("Remote embedder requires OPENAI_API_KEY to be set".to_string())
            })?;
            let embedder = RemoteEmbedder::new(api_key, config.request_timeout())?
                .with_base_url(&config.api_base_url)
                .with_model(&config.embedding_model, config.dimension);
            Ok(Box::new(embedder))
        }
        #[cfg(feature = "onnx")]
        EmbedderKind::Onnx => Ok(Box::new(OnnxEmbedder::new(
            &config.embedding_model,
            config.dimension,
        )?)),
        #[cfg(not(feature = "onnx"))]
        EmbedderKind::Onnx => Err(Error::Config(
            "ONNX embedder not available: rebuild with --features onnx".to_string(),
        )),
    }
}

/// Scale a vector to unit length (zero vectors stay zero).
#[cfg_attr(not(feature = "onnx"), allow(dead_code))] // only the ONNX backend pools raw activations
pub(crate) fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|&x| x * x).sum::<f32>().sqrt();
    let norm = norm.max(1e-9);

    vec.iter().map(|&x| x / norm).collect()
}
