//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    Router::new()
        // Health check (intentionally unauthenticated for probes)
        .route("/v1/health", get(handlers::health_check))
        // Artifact API; authorization happens per project inside the service
        .route(
            "/v1/projects/{project}/versions",
            get(handlers::list_versions),
        )
        .route(
            "/v1/projects/{project}/versions/{version}",
            post(handlers::create_version),
        )
        .route(
            "/v1/projects/{project}/versions/{version}/files",
            get(handlers::list_files),
        )
        .route(
            "/v1/projects/{project}/versions/{version}/files/{file}",
            get(handlers::get_file).put(handlers::put_file),
        )
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
