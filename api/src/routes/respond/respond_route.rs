//! POST /api/respond: answers one question through the pipeline.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    app::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::respond::respond_request::{RespondRequest, RespondResponse},
};

/// Always succeeds once the body parses: pipeline failures come back as
/// user-facing text in `answer`.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:7860/api/respond \
///   -H 'content-type: application/json' \
///   -d '{"query":"Who is Luna Lovegood?"}'
/// ```
pub async fn respond(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RespondRequest>,
) -> Json<ApiResponse<RespondResponse>> {
    let answer = state.pipeline.generate_response(&body.query).await;
    Json(ApiResponse::success(RespondResponse { answer }))
}
