use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::Utc;
use prdforge_core::types::Timestamp;
use serde::Serialize;
use serde_json::json;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Jobs currently being generated.
    pub active_jobs: usize,
    /// Open WebSocket connections.
    pub ws_connections: usize,
    pub timestamp: Timestamp,
}

/// GET /health -- returns service health and load.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        active_jobs: state.tracker.active_count().await,
        ws_connections: state.ws_manager.connection_count().await,
        timestamp: Utc::now(),
    })
}

/// GET / -- service banner with the endpoint map.
async fn service_info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "service": "prdforge",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "generator": state.tracker.generator_name(),
        "endpoints": {
            "generate": "POST /api/v1/generate",
            "jobs": "GET /api/v1/jobs",
            "job_status": "GET /api/v1/jobs/{job_id}",
            "artifacts": "GET /api/v1/artifacts/{job_id}",
            "download": "GET /api/v1/artifacts/{job_id}/{kind}",
            "examples": "GET /api/v1/examples",
            "websocket": "GET /api/v1/ws",
            "health": "GET /health",
        },
    }))
}

/// Mount root-level routes (NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
}
