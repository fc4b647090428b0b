//! mindvault - A personal semantic memory with retrieval-grounded answers.
//!
//! Text snippets about a user (habits, calendar events, notes, chat lines) are
//! embedded into fixed-length vectors and kept in an in-memory store. Questions
//! are embedded the same way and answered from the nearest memories by
//! Euclidean distance. All operations are synchronous.
//!
//! # Example
//!
//! ```no_run
//! use mindvault::{Config, SecondBrain};
//!
//! let config = Config::default();
//! let brain = SecondBrain::from_config(&config).expect("Failed to build brain");
//!
//! brain.add_memory("I usually wake up at 6 AM.", "habits").unwrap();
//! brain.add_memory("I prefer tea over coffee.", "chat").unwrap();
//!
//! let answer = brain.ask("What do I like to drink?", config.top_k).unwrap();
//! for memory in &answer.context {
//!     println!("- {}", memory);
//! }
//! ```
//!
//! # Concurrency
//!
//! [`MemoryStore`] methods take `&self`. Searches and listings share a read
//! lock; `add` and `reset` take the write lock, so readers never observe a
//! half-applied insert.

pub mod answer;
pub mod brain;
pub mod config;
pub mod dataset;
pub mod embedding;
pub mod errors;
pub mod import;
pub mod ingest;
pub mod memory;
pub mod memory_types;
pub mod profile;
pub mod retrieval;
pub mod sources;

// Re-export public API
pub use answer::{AnswerGenerator, TemplateAnswerer};
pub use brain::{Answer, SecondBrain};
pub use config::Config;
#[cfg(feature = "onnx")]
pub use embedding::OnnxEmbedder;
pub use embedding::{Embedder, EmbedderKind, HashEmbedder, RemoteEmbedder, build_embedder};
pub use errors::Error;
pub use ingest::{IngestItem, IngestOutcome, IngestReceipt, bulk_add, ingest_text};
pub use memory::store::MAX_INPUT_LENGTH;
pub use memory::{MemoryStore, validate};
pub use memory_types::{MemoryRecord, Metadata, RecordId, SearchHit};
pub use profile::UserProfile;
pub use retrieval::{retrieve, retrieve_hits};
