//! `SecondBrain`: one user's memory store, embedder and answerer wired together.

use std::sync::Arc;

use tracing::{debug, info};

use crate::answer::{AnswerGenerator, TemplateAnswerer};
use crate::config::Config;
use crate::embedding::{Embedder, build_embedder};
use crate::errors::Error;
use crate::ingest::{IngestItem, IngestOutcome, IngestReceipt, bulk_add, ingest_text};
use crate::memory::{MemoryStore, validate};
use crate::memory_types::SearchHit;
use crate::profile::UserProfile;
use crate::retrieval::{retrieve, retrieve_hits};

/// Answer to a question plus the memories it was built from.
#[derive(Debug, Clone)]
pub struct Answer {
    pub question: String,
    pub context: Vec<String>,
    pub answer: String,
}

/// Facade over a [`MemoryStore`], an [`Embedder`] and an [`AnswerGenerator`].
///
/// The store is shared through an `Arc`, so a clone of [`SecondBrain::store`]
/// can serve concurrent readers while this facade keeps ingesting.
pub struct SecondBrain {
    profile: UserProfile,
    store: Arc<MemoryStore>,
    embedder: Box<dyn Embedder>,
    answerer: Box<dyn AnswerGenerator>,
}

impl SecondBrain {
    /// Wire the parts together.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if the embedder's vector length
    /// differs from the store dimension.
    pub fn new(
        user_id: impl Into<String>,
        store: Arc<MemoryStore>,
        embedder: Box<dyn Embedder>,
        answerer: Box<dyn AnswerGenerator>,
    ) -> Result<Self, Error> {
        if embedder.dimensions() != store.dimension() {
            return Err(Error::DimensionMismatch {
                expected: store.dimension(),
                actual: embedder.dimensions(),
            });
        }
        let profile = UserProfile::new(user_id);
        info!(
            user_id = %profile.user_id,
            model = embedder.model_name(),
            dimension = store.dimension(),
            "second brain ready"
        );
        Ok(Self {
            profile,
            store,
            embedder,
            answerer,
        })
    }

    /// Build an empty brain with the configured embedder and the template answerer.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let store = Arc::new(MemoryStore::new(config.dimension)?);
        let embedder = build_embedder(config)?;
        Self::new(
            config.user_id.clone(),
            store,
            embedder,
            Box::new(TemplateAnswerer),
        )
    }

    pub fn user_id(&self) -> &str {
        &self.profile.user_id
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Mutable access for name, email and preference updates.
    pub fn profile_mut(&mut self) -> &mut UserProfile {
        &mut self.profile
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }

    /// Ingest one snippet tagged with `source`.
    pub fn add_memory(&self, text: &str, source: &str) -> Result<IngestReceipt, Error> {
        ingest_text(&self.store, self.embedder.as_ref(), self.user_id(), text, source)
    }

    /// Ingest a batch; failed items are reported, never fatal.
    pub fn add_bulk(&self, items: &[IngestItem]) -> Vec<IngestOutcome> {
        bulk_add(items, self.embedder.as_ref(), &self.store, self.user_id())
    }

    /// Stored texts in insertion order.
    pub fn list_memories(&self) -> Vec<String> {
        self.store.list_all()
    }

    pub fn clear(&self) {
        self.store.reset();
    }

    /// Retrieve up to `k` memories for `question` and answer from them.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` for a blank question, `Error::InvalidArgument`
    /// for `k == 0`, and propagates embedding and dimension errors.
    pub fn ask(&self, question: &str, k: usize) -> Result<Answer, Error> {
        let question = validate(question)?;
        let context = retrieve(question, k, self.embedder.as_ref(), &self.store)?;
        debug!(k, found = context.len(), "retrieved context");
        let answer = self.answerer.generate(question, &context)?;
        Ok(Answer {
            question: question.to_string(),
            context,
            answer,
        })
    }

    /// Nearest memories to `query` with distances and metadata.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, Error> {
        retrieve_hits(query, k, self.embedder.as_ref(), &self.store)
    }
}
