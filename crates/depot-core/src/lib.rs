//! Core domain types and shared logic for Depot.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Validated name segments (project, version, filename)
//! - Access capabilities and their backing list files
//! - Application configuration

pub mod capability;
pub mod config;
pub mod error;
pub mod name;

pub use capability::Capability;
pub use error::{Error, Result};
pub use name::{FileName, ProjectName, VersionName};

/// Name of the directory holding a project's versions.
pub const VERSIONS_DIR: &str = "versions";

/// Name of the directory holding a version's artifact files.
pub const FILES_DIR: &str = "files";
