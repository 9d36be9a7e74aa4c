use crate::errors::RagError;
use std::{future::Future, pin::Pin};

/// Provider interface for query embeddings.
///
/// Async is required because real providers (Ollama) perform HTTP requests.
pub trait EmbeddingsProvider: Send + Sync {
    /// Async embedding function.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>;

    /// Model name, for diagnostics.
    fn model_name(&self) -> &str;
}

pub mod ollama;
