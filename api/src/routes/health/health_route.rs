//! GET /api/health: provider probes and retrieval stats.

use std::sync::Arc;

use ai_llm_service::health_service::HealthStatus;
use axum::{Json, extract::State};
use contextor::RagStats;
use serde::Serialize;

use crate::app::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub providers: Vec<HealthStatus>,
    pub rag: RagStats,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthResponse>> {
    let (providers, rag) = tokio::join!(
        state.health.check_many(&state.probes),
        state.pipeline.system_stats()
    );
    Json(ApiResponse::success(HealthResponse { providers, rag }))
}
