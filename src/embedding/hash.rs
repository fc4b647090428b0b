//! Deterministic SHA-256 based embedder for offline use and tests.

use sha2::{Digest, Sha256};

use crate::errors::Error;

use super::Embedder;

/// Values produced per SHA-256 digest (32 bytes, two bytes per value).
const VALUES_PER_BLOCK: usize = 16;

/// Embedder that derives vectors from SHA-256 digests of the text.
///
/// Same text always yields the same vector. Vectors carry no semantic
/// meaning: only identical text is guaranteed to land at distance zero.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dims: usize,
}

impl HashEmbedder {
    /// Create a hash embedder producing vectors of length `dims`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `dims` is zero.
    pub fn new(dims: usize) -> Result<Self, Error> {
        if dims == 0 {
            return Err(Error::InvalidArgument(
                "embedding dimension must be a positive integer".to_string(),
            ));
        }
        Ok(Self { dims })
    }
}

/// Digest for block `n`: `sha256(text)` for the first, `sha256(text || n)` after.
fn block_digest(text: &str, block: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    if block > 0 {
        hasher.update(block.to_le_bytes());
    }
    hasher.finalize().into()
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, Error> {
        if text.trim().is_empty() {
            return Err(Error::Embedding("Cannot embed empty text".to_string()));
        }

        let mut vector = Vec::with_capacity(self.dims);
        let mut block = 0u32;
        while vector.len() < self.dims {
            let digest = block_digest(text, block);
            for pair in digest.chunks_exact(2).take(VALUES_PER_BLOCK) {
                if vector.len() == self.dims {
                    break;
                }
                let value = u16::from_be_bytes([pair[0], pair[1]]) % 1000;
                vector.push(value as f32 / 1000.0);
            }
            block += 1;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_name(&self) -> &str {
        "sha256-hash"
    }
}
