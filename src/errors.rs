//! Error types for mindvault.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for mindvault operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Text is empty or whitespace-only.
    #[error("Input cannot be empty")]
    EmptyInput,

    /// Text exceeds the maximum accepted length.
    #[error("Input too long: {actual_length} bytes (max {max_length})")]
    InputTooLong {
        max_length: usize,
        actual_length: usize,
    },

    /// Vector length disagrees with the store's fixed dimension.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Caller passed a non-positive `k`, dimension, or similar.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Vector contains NaN or infinite values.
    #[error("Invalid embedding: {0}")]
    InvalidEmbedding(String),

    /// Embedding provider failure (network, quota, malformed response, empty input).
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ONNX inference error.
    #[cfg(feature = "onnx")]
    #[error("Inference error: {0}")]
    Inference(String),

    /// Tokenization error.
    #[cfg(feature = "onnx")]
    #[error("Tokenization error: {0}")]
    Tokenization(#[from] tokenizers::Error),

    /// ONNX session error.
    #[cfg(feature = "onnx")]
    #[error("ONNX session error: {0}")]
    Onnx(#[from] ort::Error),

    /// HuggingFace Hub error.
    #[cfg(feature = "onnx")]
    #[error("HuggingFace Hub error: {0}")]
    HfHub(#[from] hf_hub::api::sync::ApiError),
}
