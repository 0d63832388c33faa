//! HTTP API server for the Depot artifact store.
//!
//! This crate provides the thin HTTP layer over `depot-store`:
//! - Route configuration and shared state
//! - Bearer-token extraction
//! - Artifact upload/download/listing handlers
//! - Error-to-status mapping

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
