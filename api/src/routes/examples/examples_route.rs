//! GET /api/examples: example question catalog.

use axum::Json;

use crate::app::{
    catalog::{EXAMPLE_CATEGORIES, ExampleCategory},
    http::response_envelope::ApiResponse,
};

pub async fn list_examples() -> Json<ApiResponse<&'static [ExampleCategory]>> {
    Json(ApiResponse::success(&EXAMPLE_CATEGORIES[..]))
}
