//! Ollama embedding provider backed by the shared LLM service.

use std::sync::Arc;

use ai_llm_service::services::ollama_service::OllamaService;
use tracing::warn;

use crate::{EmbeddingsProvider, RagError};

/// Ollama embedding provider (async) with an optional dimension check.
#[derive(Clone)]
pub struct OllamaEmbedder {
    svc: Arc<OllamaService>,
    dim: Option<usize>,
}

impl OllamaEmbedder {
    pub fn new(svc: Arc<OllamaService>, dim: Option<usize>) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for OllamaEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>
    {
        Box::pin(async move {
            let resp = self.svc.embeddings(text).await?;

            if let Some(want) = self.dim {
                if resp.len() != want {
                    warn!(got = resp.len(), want, model = %self.svc.model(), "embedding size mismatch");
                    return Err(RagError::VectorSizeMismatch {
                        got: resp.len(),
                        want,
                    });
                }
            }

            Ok(resp)
        })
    }

    fn model_name(&self) -> &str {
        self.svc.model()
    }
}
