//! HTTP front end: the themed chat page plus a small JSON API.
//!
//! | route | purpose |
//! |---|---|
//! | `GET /` | chat page |
//! | `POST /api/respond` | `{query}` → `{answer}` |
//! | `GET /api/examples` | example question catalog |
//! | `GET /api/health` | provider probes and retrieval stats |

mod app;
mod error_handler;
mod middleware_layer;
mod routes;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use crate::app::{
    app_state::AppState,
    catalog::{EXAMPLE_CATEGORIES, ExampleCategory, QUOTES},
    server_config::{DEFAULT_API_HOST, DEFAULT_API_PORT, ServerConfig},
};
pub use error_handler::{AppError, AppResult};

use crate::{
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        examples::examples_route::list_examples, health::health_route::health,
        index::index_route::index_page, respond::respond_route::respond,
    },
};

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/api/respond", post(respond))
        .route("/api/examples", get(list_examples))
        .route("/api/health", get(health))
        .fallback(not_found)
        .layer(middleware::from_fn(json_error_mapper))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serves until Ctrl+C.
///
/// # Errors
/// `AppError::Bind` when the address is taken, `AppError::Server` when the
/// server loop fails.
pub async fn start(state: AppState, addr: SocketAddr) -> AppResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;
    info!(%addr, "listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
