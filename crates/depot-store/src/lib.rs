//! Filesystem artifact storage and per-project authorization for Depot.
//!
//! This crate provides:
//! - The on-disk layout (`<root>/<project>/versions/<version>/files/<file>`)
//! - Atomic artifact writes via temp-file-plus-rename
//! - Per-(project, version) write serialization
//! - Bearer-token authorization backed by `readers.txt` / `writers.txt`
//! - The composed service consumed by the HTTP layer

pub mod access;
pub mod error;
pub mod layout;
pub mod locks;
pub mod service;
pub mod store;

pub use access::{AccessGate, TokenListCache};
pub use error::{StoreError, StoreResult};
pub use layout::Layout;
pub use service::ArtifactService;
pub use store::{ArtifactStore, ByteStream};
