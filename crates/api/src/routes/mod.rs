pub mod artifacts;
pub mod health;
pub mod jobs;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                  WebSocket (job events)
///
/// /generate                            submit a problem statement (POST)
/// /examples                            example problem statements
///
/// /jobs                                list all jobs
/// /jobs/{id}                           job status
///
/// /artifacts/{id}                      artifact listing of a completed job
/// /artifacts/{id}/{kind}               download one artifact
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_handler))
        // Generation
        .route("/generate", post(handlers::generation::generate))
        .route("/examples", get(handlers::generation::list_examples))
        // Jobs
        .nest("/jobs", jobs::router())
        // Artifacts
        .nest("/artifacts", artifacts::router())
}
