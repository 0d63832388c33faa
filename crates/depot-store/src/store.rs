//! Filesystem artifact store.
//!
//! Writes go to a dot-prefixed temp file in the target directory, are
//! fsynced, then renamed into place. Readers therefore see an artifact
//! either fully absent or fully present with its final content, never in
//! between. Temp names start with `.`, which no valid artifact name can,
//! so they never collide with real files and are excluded from listings.

use crate::error::{StoreError, StoreResult};
use crate::layout::Layout;
use crate::locks::VersionLocks;
use bytes::Bytes;
use depot_core::{FileName, ProjectName, VersionName};
use futures::Stream;
use std::path::Path;
use std::pin::Pin;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::instrument;
use uuid::Uuid;

/// Chunk size for streaming reads (64 KiB).
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// A stream of artifact content bytes.
pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// Filesystem-backed artifact store.
pub struct ArtifactStore {
    layout: Layout,
    locks: VersionLocks,
}

impl ArtifactStore {
    /// Create a store over the given layout.
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            locks: VersionLocks::new(),
        }
    }

    /// Ensure the version's `files` directory exists. Idempotent.
    #[instrument(skip(self), fields(project = %project, version = %version))]
    pub async fn create_or_open_version(
        &self,
        project: &ProjectName,
        version: &VersionName,
    ) -> StoreResult<()> {
        fs::create_dir_all(self.layout.files_dir(project, version)).await?;
        Ok(())
    }

    /// Write an artifact atomically.
    ///
    /// The caller supplies the full content up front, so no network I/O
    /// happens while the per-version lock is held: the hold spans only the
    /// local temp write and the rename. Overwriting an existing filename
    /// replaces its content in one step.
    #[instrument(
        skip(self, content),
        fields(project = %project, version = %version, file = %file, size = content.len())
    )]
    pub async fn put_file(
        &self,
        project: &ProjectName,
        version: &VersionName,
        file: &FileName,
        content: Bytes,
    ) -> StoreResult<()> {
        self.create_or_open_version(project, version).await?;

        let final_path = self.layout.file_path(project, version, file);
        let temp_path = self
            .layout
            .files_dir(project, version)
            .join(format!(".{}.tmp", Uuid::new_v4()));

        let _guard = self.locks.acquire(project, version).await;

        let result: StoreResult<()> = async {
            let mut f = fs::File::create(&temp_path).await?;
            f.write_all(&content).await?;
            f.sync_all().await?;
            drop(f);
            fs::rename(&temp_path, &final_path).await?;
            Ok(())
        }
        .await;

        if result.is_err() {
            // Best-effort cleanup; the target is untouched either way.
            let _ = fs::remove_file(&temp_path).await;
        }
        result
    }

    /// Read an artifact's full content.
    #[instrument(skip(self), fields(project = %project, version = %version, file = %file))]
    pub async fn get_file(
        &self,
        project: &ProjectName,
        version: &VersionName,
        file: &FileName,
    ) -> StoreResult<Bytes> {
        let path = self.layout.file_path(project, version, file);
        self.require_regular_file(&path, file).await?;
        let data = fs::read(&path).await.map_err(|e| self.map_read_err(e, file))?;
        Ok(Bytes::from(data))
    }

    /// Open an artifact for streaming, returning the stream and its size.
    #[instrument(skip(self), fields(project = %project, version = %version, file = %file))]
    pub async fn get_file_stream(
        &self,
        project: &ProjectName,
        version: &VersionName,
        file: &FileName,
    ) -> StoreResult<(ByteStream, u64)> {
        let path = self.layout.file_path(project, version, file);
        let f = fs::File::open(&path)
            .await
            .map_err(|e| self.map_read_err(e, file))?;
        // Size comes from the opened handle, not a path stat: a concurrent
        // rename can swap the inode behind the path, and the declared size
        // must describe the content the stream will actually read.
        let meta = f.metadata().await?;
        if !meta.is_file() {
            return Err(StoreError::NotFound(file.to_string()));
        }
        let size = meta.len();

        let stream = async_stream::try_stream! {
            let mut f = f;
            let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
            loop {
                let n = f.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                yield Bytes::copy_from_slice(&buf[..n]);
            }
        };

        Ok((Box::pin(stream), size))
    }

    /// Enumerate a project's versions, sorted and deduplicated.
    ///
    /// A project with no `versions` directory yet lists as empty; a missing
    /// project directory is `ProjectNotFound`.
    #[instrument(skip(self), fields(project = %project))]
    pub async fn list_versions(&self, project: &ProjectName) -> StoreResult<Vec<String>> {
        match fs::metadata(self.layout.project_dir(project)).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(StoreError::ProjectNotFound(project.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::ProjectNotFound(project.to_string()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        }

        match read_dir_names(&self.layout.versions_dir(project), EntryKind::Dir).await {
            Ok(names) => Ok(names),
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Enumerate a version's files, sorted and deduplicated.
    #[instrument(skip(self), fields(project = %project, version = %version))]
    pub async fn list_files(
        &self,
        project: &ProjectName,
        version: &VersionName,
    ) -> StoreResult<Vec<String>> {
        match read_dir_names(&self.layout.files_dir(project, version), EntryKind::File).await {
            Ok(names) => Ok(names),
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Err(
                StoreError::NotFound(format!("{project}/{version}")),
            ),
            Err(e) => Err(e),
        }
    }

    /// Stat a path, requiring an existing regular file. Returns its size.
    async fn require_regular_file(&self, path: &Path, file: &FileName) -> StoreResult<u64> {
        match fs::metadata(path).await {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Err(StoreError::NotFound(file.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(file.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn map_read_err(&self, e: std::io::Error, file: &FileName) -> StoreError {
        if e.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound(file.to_string())
        } else {
            StoreError::Io(e)
        }
    }
}

enum EntryKind {
    Dir,
    File,
}

/// List a directory's entries of the given kind, skipping dotfiles
/// (in-flight temp files), sorted lexicographically and deduplicated.
async fn read_dir_names(dir: &Path, kind: EntryKind) -> StoreResult<Vec<String>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        let wanted = match kind {
            EntryKind::Dir => file_type.is_dir(),
            EntryKind::File => file_type.is_file(),
        };
        if !wanted {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }
    names.sort();
    names.dedup();
    Ok(names)
}
