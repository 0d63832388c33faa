//! The composed artifact service.
//!
//! Every operation authorizes before touching storage: `write` for
//! uploads and version creation, `read` for downloads and listings. A
//! denied check is `Forbidden` without any storage access. A project the
//! gate cannot find surfaces as plain `NotFound`, so unauthorized callers
//! cannot distinguish "project does not exist" from "exists but denies".

use crate::access::AccessGate;
use crate::error::{StoreError, StoreResult};
use crate::layout::Layout;
use crate::store::{ArtifactStore, ByteStream};
use bytes::Bytes;
use depot_core::{Capability, FileName, ProjectName, VersionName};
use std::path::PathBuf;

/// Authorization gate plus artifact store, exposed as one operation set.
pub struct ArtifactService {
    gate: AccessGate,
    store: ArtifactStore,
}

impl ArtifactService {
    /// Create a service rooted at the given state directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let layout = Layout::new(root);
        Self {
            gate: AccessGate::new(layout.clone()),
            store: ArtifactStore::new(layout),
        }
    }

    /// Check `capability` for `token` on `project`, mapping denial to
    /// `Forbidden` and hiding project existence from unauthorized callers.
    pub async fn authorize(
        &self,
        project: &ProjectName,
        token: Option<&str>,
        capability: Capability,
    ) -> StoreResult<()> {
        match self.gate.check(project, token, capability).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(StoreError::Forbidden),
            Err(StoreError::ProjectNotFound(p)) => Err(StoreError::NotFound(p)),
            Err(e) => Err(e),
        }
    }

    /// Create or open a version (write capability).
    pub async fn create_or_open_version(
        &self,
        project: &ProjectName,
        version: &VersionName,
        token: Option<&str>,
    ) -> StoreResult<()> {
        self.authorize(project, token, Capability::Write).await?;
        self.store.create_or_open_version(project, version).await
    }

    /// Upload an artifact (write capability).
    pub async fn put_file(
        &self,
        project: &ProjectName,
        version: &VersionName,
        file: &FileName,
        token: Option<&str>,
        content: Bytes,
    ) -> StoreResult<()> {
        self.authorize(project, token, Capability::Write).await?;
        self.store.put_file(project, version, file, content).await
    }

    /// Download an artifact's full content (read capability).
    pub async fn get_file(
        &self,
        project: &ProjectName,
        version: &VersionName,
        file: &FileName,
        token: Option<&str>,
    ) -> StoreResult<Bytes> {
        self.authorize(project, token, Capability::Read).await?;
        self.store.get_file(project, version, file).await
    }

    /// Open an artifact for streaming download (read capability).
    /// Returns the byte stream and the content length.
    pub async fn get_file_stream(
        &self,
        project: &ProjectName,
        version: &VersionName,
        file: &FileName,
        token: Option<&str>,
    ) -> StoreResult<(ByteStream, u64)> {
        self.authorize(project, token, Capability::Read).await?;
        self.store.get_file_stream(project, version, file).await
    }

    /// Enumerate versions (read capability).
    pub async fn list_versions(
        &self,
        project: &ProjectName,
        token: Option<&str>,
    ) -> StoreResult<Vec<String>> {
        self.authorize(project, token, Capability::Read).await?;
        self.store.list_versions(project).await
    }

    /// Enumerate a version's files (read capability).
    pub async fn list_files(
        &self,
        project: &ProjectName,
        version: &VersionName,
        token: Option<&str>,
    ) -> StoreResult<Vec<String>> {
        self.authorize(project, token, Capability::Read).await?;
        self.store.list_files(project, version).await
    }
}
