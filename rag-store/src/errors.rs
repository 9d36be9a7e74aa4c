//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Mismatch between the embedding size and the collection's vector size.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Embedding backend failed.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Target collection does not exist.
    #[error("collection '{0}' does not exist")]
    CollectionMissing(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),
}

impl From<ai_llm_service::services::ollama_service::OllamaError> for RagError {
    fn from(err: ai_llm_service::services::ollama_service::OllamaError) -> Self {
        RagError::Embedding(err.to_string())
    }
}
