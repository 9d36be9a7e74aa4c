use std::sync::Arc;

use ai_llm_service::{LlmModelConfig, health_service::HealthService};
use contextor::RagPipeline;

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// The assistant pipeline; `generate_response` is the only call bound to the chat.
    pub pipeline: Arc<RagPipeline>,
    /// Reusable provider prober for `/api/health`.
    pub health: HealthService,
    /// Provider configs probed by `/api/health` (completion API, embedding server).
    pub probes: Vec<LlmModelConfig>,
}

impl AppState {
    pub fn new(
        pipeline: Arc<RagPipeline>,
        health: HealthService,
        probes: Vec<LlmModelConfig>,
    ) -> Self {
        Self {
            pipeline,
            health,
            probes,
        }
    }
}
