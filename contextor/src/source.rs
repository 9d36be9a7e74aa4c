//! Seams between the pipeline and its collaborators.
//!
//! [`PassageSource`] is implemented for [`RagStore`] and [`Completion`] for
//! [`CompletionClient`]; tests substitute in-memory fakes.

use std::{future::Future, pin::Pin};

use ai_llm_service::{ChatOutcome, ChatOverrides, CompletionClient};
use rag_store::{RagError, RagStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Ranked passage retrieval over the book index.
pub trait PassageSource: Send + Sync {
    /// Up to `k` passage texts for `query`, most relevant first.
    fn retrieve<'a>(&'a self, query: &'a str, k: usize) -> BoxFuture<'a, Result<Vec<String>, RagError>>;

    /// Number of stored passages.
    fn count(&self) -> BoxFuture<'_, Result<u64, RagError>>;

    fn collection(&self) -> &str;

    fn embedding_model(&self) -> &str;
}

impl PassageSource for RagStore {
    fn retrieve<'a>(&'a self, query: &'a str, k: usize) -> BoxFuture<'a, Result<Vec<String>, RagError>> {
        Box::pin(async move {
            let hits = self.as_retriever(k).retrieve(query).await?;
            Ok(hits.into_iter().map(|h| h.text).collect())
        })
    }

    fn count(&self) -> BoxFuture<'_, Result<u64, RagError>> {
        Box::pin(RagStore::count(self))
    }

    fn collection(&self) -> &str {
        RagStore::collection(self)
    }

    fn embedding_model(&self) -> &str {
        RagStore::embedding_model(self)
    }
}

/// Answers a composed prompt.
pub trait Completion: Send + Sync {
    fn answer<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, ChatOutcome>;
}

impl Completion for CompletionClient {
    fn answer<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, ChatOutcome> {
        Box::pin(async move { self.complete(prompt, &ChatOverrides::default()).await })
    }
}
