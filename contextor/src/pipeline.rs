//! Query → classification → retrieval → prompt → completion → framed answer.

use std::sync::{Arc, OnceLock};

use ai_llm_service::ChatOutcome;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    api_types::{InitReport, PipelineStatus, RagStats},
    cfg::ContextorConfig,
    classify::{QueryAnalysis, analyze_query},
    error::ContextorError,
    messages,
    prompt::build_prompt,
    select::select_passages,
    source::{Completion, PassageSource},
};

/// Warm-up queries tried in order during [`RagPipeline::initialize`].
pub const WARMUP_QUERIES: [&str; 5] = ["Harry Potter", "magic", "wizard", "Hogwarts", "book"];

const STATS_QUERY: &str = "test";

/// The assistant pipeline. Shared as `Arc<RagPipeline>`; the passage source is
/// attached once by [`RagPipeline::initialize`] and read-only afterwards.
pub struct RagPipeline {
    completion: Arc<dyn Completion>,
    source: OnceLock<Arc<dyn PassageSource>>,
    retrieval_k: usize,
}

impl RagPipeline {
    pub fn new(completion: Arc<dyn Completion>, cfg: &ContextorConfig) -> Self {
        Self {
            completion,
            source: OnceLock::new(),
            retrieval_k: cfg.retrieval_k.max(1),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.source.get().is_some()
    }

    pub fn retrieval_k(&self) -> usize {
        self.retrieval_k
    }

    /// Checks the store and attaches it.
    ///
    /// The collection must hold at least one passage and one of
    /// [`WARMUP_QUERIES`] must return a hit.
    ///
    /// # Errors
    /// `EmptyCollection`, `NoWarmupHits`, or `Rag` for store failures. On error
    /// the pipeline stays uninitialized.
    #[instrument(skip_all, fields(collection = source.collection()))]
    pub async fn initialize(
        &self,
        source: Arc<dyn PassageSource>,
    ) -> Result<InitReport, ContextorError> {
        let document_count = source.count().await?;
        if document_count == 0 {
            return Err(ContextorError::EmptyCollection(source.collection().to_string()));
        }
        info!(document_count, "collection has passages");

        let mut found = None;
        for query in WARMUP_QUERIES {
            let hits = source.retrieve(query, self.retrieval_k).await?;
            debug!(query, hits = hits.len(), "warm-up retrieval");
            if !hits.is_empty() {
                found = Some((query, hits.len()));
                break;
            }
        }
        let Some((warmup_query, warmup_hits)) = found else {
            return Err(ContextorError::NoWarmupHits(WARMUP_QUERIES.join(", ")));
        };

        if self.source.set(source).is_err() {
            warn!("pipeline already initialized; keeping the first passage source");
        }
        info!(warmup_query, warmup_hits, "pipeline ready");

        Ok(InitReport {
            document_count,
            warmup_query: warmup_query.to_string(),
            warmup_hits,
        })
    }

    /// Selected context passages for `query`.
    ///
    /// Fetches `analysis.k_docs` ranked passages, then applies
    /// [`select_passages`].
    ///
    /// # Errors
    /// `Uninitialized` before [`Self::initialize`]; `Rag` on store failures.
    pub async fn retrieve_context(
        &self,
        query: &str,
        analysis: &QueryAnalysis,
    ) -> Result<Vec<String>, ContextorError> {
        let source = self.source.get().ok_or(ContextorError::Uninitialized)?;
        let ranked = source.retrieve(query, analysis.k_docs).await?;
        let selected = select_passages(ranked, analysis.k_docs);
        debug!(k_docs = analysis.k_docs, selected = selected.len(), "context selected");
        Ok(selected)
    }

    /// Answers a question. Never fails: every error becomes a user-facing
    /// message.
    #[instrument(skip(self), fields(kind))]
    pub async fn generate_response(&self, query: &str) -> String {
        if query.trim().is_empty() {
            return messages::EMPTY_QUERY.to_string();
        }
        if !self.is_initialized() {
            warn!("query received before initialization");
            return messages::NOT_INITIALIZED.to_string();
        }

        match self.answer(query.trim()).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "pipeline failed");
                messages::malfunction(&e)
            }
        }
    }

    async fn answer(&self, query: &str) -> Result<String, ContextorError> {
        let analysis = analyze_query(query);
        tracing::Span::current().record("kind", analysis.kind.as_str());

        let passages = self.retrieve_context(query, &analysis).await?;
        if passages.is_empty() {
            info!("no usable passages");
            return Ok(messages::NO_CONTEXT.to_string());
        }

        let prompt = build_prompt(query, &passages, &analysis);
        match self.completion.answer(&prompt).await {
            ChatOutcome::Answered {
                model,
                text,
                fallback_used,
            } => {
                info!(%model, fallback_used, passages = passages.len(), "answered");
                Ok(messages::answered(&text, passages.len(), analysis.kind))
            }
            exhausted @ ChatOutcome::Exhausted => {
                warn!("all completion models unavailable");
                Ok(messages::degraded(&exhausted.into_text()))
            }
        }
    }

    /// Readiness snapshot; runs one retrieval when initialized.
    pub async fn system_stats(&self) -> RagStats {
        let Some(source) = self.source.get() else {
            return RagStats {
                status: PipelineStatus::NotInitialized,
                collection: None,
                embedding_model: None,
                test_documents_found: None,
                retrieval_k: self.retrieval_k,
                is_functional: false,
                error: None,
            };
        };

        match source.retrieve(STATS_QUERY, self.retrieval_k).await {
            Ok(docs) => RagStats {
                status: PipelineStatus::Ready,
                collection: Some(source.collection().to_string()),
                embedding_model: Some(source.embedding_model().to_string()),
                test_documents_found: Some(docs.len()),
                retrieval_k: self.retrieval_k,
                is_functional: !docs.is_empty(),
                error: None,
            },
            Err(e) => RagStats {
                status: PipelineStatus::Error,
                collection: Some(source.collection().to_string()),
                embedding_model: Some(source.embedding_model().to_string()),
                test_documents_found: None,
                retrieval_k: self.retrieval_k,
                is_functional: false,
                error: Some(e.to_string()),
            },
        }
    }
}
