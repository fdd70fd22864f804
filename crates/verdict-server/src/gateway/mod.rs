//! HTTP gateway (Axum) over the answer pipeline.
//!
//! This module is primarily used by the `verdict` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handler::{ask_handler, stats_handler};
pub use payload::AskRequest;
pub use state::HandlerState;

use verdict::vectordb::VectorSearchBackend;

pub fn create_router_with_state<B>(state: HandlerState<B>) -> Router
where
    B: VectorSearchBackend + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/ask", post(ask_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}
