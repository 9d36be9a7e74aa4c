use serde::Serialize;

/// Pipeline readiness as reported by [`crate::RagPipeline::system_stats`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    NotInitialized,
    Ready,
    Error,
}

/// Snapshot of the retrieval side of the system.
#[derive(Clone, Debug, Serialize)]
pub struct RagStats {
    pub status: PipelineStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_documents_found: Option<usize>,
    pub retrieval_k: usize,
    pub is_functional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a successful [`crate::RagPipeline::initialize`].
#[derive(Clone, Debug, Serialize)]
pub struct InitReport {
    pub document_count: u64,
    /// Warm-up query that produced the first hits.
    pub warmup_query: String,
    pub warmup_hits: usize,
}
