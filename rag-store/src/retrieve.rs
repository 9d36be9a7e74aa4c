//! Retrieval: embed the query text, search, map payloads to hits.

use crate::config::RagConfig;
use crate::embed::EmbeddingsProvider;
use crate::errors::RagError;
use crate::qdrant_facade::QdrantFacade;
use crate::record::RagHit;

use tracing::trace;

/// Embeds `query` and returns up to `top_k` hits ordered by relevance.
///
/// # Errors
/// Returns embedding/provider errors or Qdrant failures.
pub async fn rag_context(
    cfg: &RagConfig,
    client: &QdrantFacade,
    provider: &dyn EmbeddingsProvider,
    query: &str,
    top_k: u64,
) -> Result<Vec<RagHit>, RagError> {
    trace!(top_k, query_len = query.len(), "retrieve::rag_context");

    let qv = provider.embed(query).await?;
    let hits = client.search(qv, top_k, cfg.exact_search).await?;

    let out: Vec<RagHit> = hits
        .into_iter()
        .map(|(score, payload)| RagHit::from_payload(score, payload, &cfg.content_key))
        .collect();

    trace!(hits = out.len(), "retrieve::rag_context done");
    Ok(out)
}
