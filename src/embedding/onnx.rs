//! Local ONNX sentence-transformer embedder.
//!
//! Mean pooling over the last hidden state followed by L2 normalization.

use std::sync::{Mutex, PoisonError};

use hf_hub::api::sync::Api;
use ort::inputs;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::info;

use crate::errors::Error;

use super::{Embedder, l2_normalize};

/// ONNX embedding engine for synchronous text-to-vector conversion.
pub struct OnnxEmbedder {
    // `Session::run` needs `&mut`; the mutex lets the embedder be shared.
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    requires_token_type_ids: bool,
    model: String,
    dims: usize,
}

impl OnnxEmbedder {
    /// Load model from the HF Hub cache, downloading on first use.
    ///
    /// `dims` must match the hidden size of the model (384 for bge-small).
    pub fn new(model_id: &str, dims: usize) -> Result<Self, Error> {
        let api = Api::new()?;
        let repo = api.model(model_id.to_string());

        let model_path = repo
            .get("onnx/model.onnx")
            .or_else(|_| repo.get("model.onnx"))?;
        let tokenizer_path = repo.get("tokenizer.json")?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)?;
        tokenizer
            .with_padding(None)
            .with_truncation(Some(TruncationParams {
                max_length: 512,
                ..Default::default()
            }))?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level1)?
            .commit_from_file(&model_path)?;

        let requires_token_type_ids = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        info!(model = model_id, dims, "loaded ONNX embedding model");
        Ok(OnnxEmbedder {
            session: Mutex::new(session),
            tokenizer,
            requires_token_type_ids,
            model: model_id.to_string(),
            dims,
        })
    }
}

impl Embedder for OnnxEmbedder {
    /// Texts exceeding 512 tokens are truncated by the tokenizer.
    fn embed(&self, text: &str) -> Result<Vec<f32>, Error> {
        if text.trim().is_empty() {
            return Err(Error::Embedding("Cannot embed empty text".to_string()));
        }

        let encoding = self.tokenizer.encode(text, true)?;
        let input_ids = encoding.get_ids();
        let attention_mask = encoding.get_attention_mask();

        if input_ids.is_empty() {
            return Err(Error::Embedding("Text produced no tokens".to_string()));
        }

        let seq_len = input_ids.len();

        let input_ids_vec: Vec<i64> = input_ids.iter().map(|&id| id as i64).collect();
        let attention_mask_vec: Vec<i64> = attention_mask.iter().map(|&m| m as i64).collect();

        let input_ids_tensor = Tensor::from_array(([1usize, seq_len], input_ids_vec))?;
        let attention_mask_tensor = Tensor::from_array(([1usize, seq_len], attention_mask_vec))?;

        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let outputs = if self.requires_token_type_ids {
            let token_type_ids_tensor = Tensor::from_array(([1usize, seq_len], vec![0i64; seq_len]))?;
            session.run(inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            ])?
        } else {
            session.run(inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor
            ])?
        };

        let (shape, data) = outputs
            .get("last_hidden_state")
            .or_else(|| outputs.get("token_embeddings"))
            .ok_or_else(|| {
                Error::Inference(
                    "Output tensor 'last_hidden_state' or 'token_embeddings' not found".to_string(),
                )
            })?
            .try_extract_tensor::<f32>()?;

        if shape.len() != 3 {
            return Err(Error::Inference(format!(
                "Expected 3D output (batch, seq_len, hidden), got {:?}",
                shape
            )));
        }

        let batch_size = shape[0] as usize;
        let hidden_dim = shape[2] as usize;
        if batch_size != 1 || hidden_dim != self.dims {
            return Err(Error::Inference(format!(
                "Unexpected output shape: {:?}, batch=1, hidden={} expected",
                shape, self.dims
            )));
        }

        let mut pooled = vec![0.0f32; hidden_dim];
        for (token_idx, chunk) in data.chunks(hidden_dim).take(seq_len).enumerate() {
            let mask_value = attention_mask.get(token_idx).copied().unwrap_or(0) as f32;
            for (pooled_value, value) in pooled.iter_mut().zip(chunk.iter()) {
                *pooled_value += value * mask_value;
            }
        }

        let mask_sum: f32 = attention_mask
            .iter()
            .take(seq_len)
            .map(|&m| m as f32)
            .sum::<f32>()
            .max(1e-9);
        for value in pooled.iter_mut() {
            *value /= mask_sum;
        }

        Ok(l2_normalize(&pooled))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ignore]
    #[test]
    fn test_integration_simple_text() {
        let embedder = OnnxEmbedder::new("BAAI/bge-small-en-v1.5", 384).expect("load model");
        let embedding = embedder.embed("hello world").expect("embed text");

        assert_eq!(embedding.len(), 384);
        let norm: f32 = embedding.iter().map(|&x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.01, "Embedding should be L2-normalized");
    }

    #[ignore]
    #[test]
    fn test_integration_empty_string() {
        let embedder = OnnxEmbedder::new("BAAI/bge-small-en-v1.5", 384).expect("load model");
        assert!(matches!(embedder.embed(""), Err(Error::Embedding(_))));
    }
}
