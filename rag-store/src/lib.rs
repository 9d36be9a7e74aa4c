//! Read-only retrieval facade over a pre-built Qdrant collection.
//!
//! The collection is expected to hold book passages embedded with the same
//! model used for queries. This crate never writes to it.

mod config;
pub mod embed;
mod errors;
mod qdrant_facade;
mod record;
mod retrieve;

pub use config::{
    DEFAULT_COLLECTION, DEFAULT_CONTENT_KEY, DEFAULT_EMBEDDING_DIM, DEFAULT_QDRANT_URL, RagConfig,
};
pub use embed::EmbeddingsProvider;
pub use errors::RagError;
pub use record::RagHit;

use std::sync::Arc;

use tracing::{info, trace};

/// High-level facade that wires configuration, Qdrant client and embedder.
///
/// This is the single entry point recommended for application code.
pub struct RagStore {
    cfg: RagConfig,
    client: qdrant_facade::QdrantFacade,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl RagStore {
    /// Constructs a new store from the given configuration.
    ///
    /// # Errors
    /// Returns `RagError::Config` on invalid config or `RagError::Qdrant` if
    /// the client cannot be built.
    pub fn new(cfg: RagConfig, embedder: Arc<dyn EmbeddingsProvider>) -> Result<Self, RagError> {
        trace!("RagStore::new collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self {
            cfg,
            client,
            embedder,
        })
    }

    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }

    pub fn collection(&self) -> &str {
        &self.cfg.collection
    }

    pub fn embedding_model(&self) -> &str {
        self.embedder.model_name()
    }

    /// Number of stored passages.
    ///
    /// # Errors
    /// `RagError::CollectionMissing` when the collection does not exist,
    /// `RagError::Qdrant` on client failures.
    pub async fn count(&self) -> Result<u64, RagError> {
        if !self.client.collection_exists().await? {
            return Err(RagError::CollectionMissing(self.cfg.collection.clone()));
        }
        let n = self.client.count().await?;
        info!(collection = %self.cfg.collection, points = n, "collection inspected");
        Ok(n)
    }

    /// A retriever returning up to `k` passages per query.
    pub fn as_retriever(&self, k: usize) -> Retriever<'_> {
        Retriever { store: self, k }
    }

    /// Embeds `query` and returns the `top_k` most similar passages.
    ///
    /// # Errors
    /// Returns embedding errors or Qdrant failures.
    pub async fn search_text(&self, query: &str, top_k: usize) -> Result<Vec<RagHit>, RagError> {
        retrieve::rag_context(
            &self.cfg,
            &self.client,
            self.embedder.as_ref(),
            query,
            top_k as u64,
        )
        .await
    }
}

/// Fixed-breadth view over a [`RagStore`].
pub struct Retriever<'a> {
    store: &'a RagStore,
    k: usize,
}

impl Retriever<'_> {
    pub fn k(&self) -> usize {
        self.k
    }

    /// Ranked passages for `query`, most relevant first.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RagHit>, RagError> {
        self.store.search_text(query, self.k).await
    }
}
