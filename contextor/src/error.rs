//! Typed error for the contextor crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// Retrieval was requested before a passage source was attached.
    #[error("RAG system not initialized. Call initialize() first.")]
    Uninitialized,

    /// The collection exists but holds no passages.
    #[error("collection '{0}' is empty")]
    EmptyCollection(String),

    /// None of the warm-up queries returned a passage.
    #[error("no documents retrieved for any warm-up query ({0})")]
    NoWarmupHits(String),

    /// A `RETRIEVAL_K`-style setting could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Errors from the underlying rag-store crate.
    #[error("RAG error: {0}")]
    Rag(#[from] rag_store::RagError),
}
