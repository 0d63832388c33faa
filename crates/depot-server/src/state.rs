//! Application state shared across handlers.

use depot_core::config::AppConfig;
use depot_store::ArtifactService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The artifact service (authorization gate + store).
    pub service: Arc<ArtifactService>,
}

impl AppState {
    /// Create application state from configuration.
    pub fn new(config: AppConfig) -> Self {
        let service = ArtifactService::new(config.store.path.clone());
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }
}
