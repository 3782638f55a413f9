//! Route definitions for the `/artifacts` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::artifacts;
use crate::state::AppState;

/// Routes mounted at `/artifacts`.
///
/// ```text
/// GET    /{id}            -> list_artifacts
/// GET    /{id}/{kind}     -> download_artifact
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(artifacts::list_artifacts))
        .route("/{id}/{kind}", get(artifacts::download_artifact))
}
