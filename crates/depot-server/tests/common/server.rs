//! Server test utilities.

use depot_core::config::AppConfig;
use depot_server::{create_router, AppState};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A test server wrapper with a temporary state directory.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    state_dir: PathBuf,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with an empty temporary state directory.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let state_dir = temp_dir.path().join("state");
        std::fs::create_dir_all(&state_dir).expect("Failed to create state directory");

        let config = AppConfig::for_testing(&state_dir);
        let state = AppState::new(config);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            state_dir,
            _temp_dir: temp_dir,
        }
    }

    /// The state directory root, for direct filesystem manipulation
    /// (the administration channel).
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Create a project directory with the given access lists
    /// (None = file absent).
    pub fn create_project(&self, name: &str, readers: Option<&str>, writers: Option<&str>) {
        let dir = self.state_dir.join(name);
        std::fs::create_dir_all(&dir).expect("Failed to create project directory");
        if let Some(contents) = readers {
            std::fs::write(dir.join("readers.txt"), contents).expect("Failed to write readers.txt");
        }
        if let Some(contents) = writers {
            std::fs::write(dir.join("writers.txt"), contents).expect("Failed to write writers.txt");
        }
    }
}
