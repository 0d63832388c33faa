//! Access-list loading, caching, and authorization decisions.
//!
//! Access lists are administrator-edited text files (`readers.txt` /
//! `writers.txt`), one bearer token per line, blank lines ignored. Edits
//! must take effect on the next request without a restart, so each lookup
//! re-stats the backing file and re-reads it only when its modification
//! signal (mtime + size) has changed. Invalidation is always lazy; there
//! is no background refresh task.

use crate::error::{StoreError, StoreResult};
use crate::layout::Layout;
use depot_core::{Capability, ProjectName};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::instrument;

/// Last-observed modification signal of a list file.
///
/// `None` means the file did not exist at the last observation. Size is
/// included alongside mtime to catch rewrites within mtime granularity.
type FileSignal = Option<(SystemTime, u64)>;

#[derive(Clone)]
struct CacheEntry {
    signal: FileSignal,
    tokens: Arc<HashSet<String>>,
}

/// Cache of parsed access lists keyed by (project, capability).
pub struct TokenListCache {
    layout: Layout,
    entries: RwLock<HashMap<(ProjectName, Capability), CacheEntry>>,
}

impl TokenListCache {
    /// Create a cache over the given layout.
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The token set for a project and capability, as of the current state
    /// of the backing file.
    ///
    /// A project directory that exists but lacks the list file yields an
    /// empty set (deny-by-default). A missing project directory is
    /// `ProjectNotFound`; an unreadable existing list file is
    /// `ListUnreadable`.
    #[instrument(skip(self), fields(project = %project, capability = %capability))]
    pub async fn tokens(
        &self,
        project: &ProjectName,
        capability: Capability,
    ) -> StoreResult<Arc<HashSet<String>>> {
        let project_dir = self.layout.project_dir(project);
        match fs::metadata(&project_dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(StoreError::ProjectNotFound(project.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::ProjectNotFound(project.to_string()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        }

        let list_path = self.layout.access_list(project, capability);
        let signal = stat_signal(&list_path).await?;

        let key = (project.clone(), capability);
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&key) {
                if entry.signal == signal {
                    return Ok(entry.tokens.clone());
                }
            }
        }

        // Signal changed (or first lookup): re-read and re-parse. If the
        // file changes between the stat above and the read here, the stale
        // signal simply forces another re-read on the next lookup.
        let tokens = Arc::new(read_token_list(project, &list_path).await?);
        tracing::debug!(
            project = %project,
            capability = %capability,
            count = tokens.len(),
            "access list (re)loaded"
        );

        let entry = CacheEntry {
            signal,
            tokens: tokens.clone(),
        };
        self.entries.write().await.insert(key, entry);
        Ok(tokens)
    }
}

/// Stat the list file for its modification signal.
async fn stat_signal(path: &Path) -> StoreResult<FileSignal> {
    match fs::metadata(path).await {
        Ok(meta) => {
            // Platforms without mtime support fall back to UNIX_EPOCH so the
            // size component still invalidates on growth/shrink.
            let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            Ok(Some((mtime, meta.len())))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::Io(e)),
    }
}

/// Read and parse a token list file. A missing file is an empty list.
async fn read_token_list(project: &ProjectName, path: &Path) -> StoreResult<HashSet<String>> {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        // Deleted between stat and read: treat as an empty list, same as
        // a file that never existed.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => {
            return Err(StoreError::ListUnreadable {
                project: project.to_string(),
                source: e,
            });
        }
    };

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

/// Authorization decisions over current access-list state.
pub struct AccessGate {
    lists: TokenListCache,
}

impl AccessGate {
    /// Create a gate over the given layout.
    pub fn new(layout: Layout) -> Self {
        Self {
            lists: TokenListCache::new(layout),
        }
    }

    /// Whether `token` currently grants `capability` on `project`.
    ///
    /// A missing or empty token denies without consulting the list. Cache
    /// errors propagate unchanged; callers treat them as denial with a
    /// distinguishable error, never as an implicit allow.
    pub async fn check(
        &self,
        project: &ProjectName,
        token: Option<&str>,
        capability: Capability,
    ) -> StoreResult<bool> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Ok(false),
        };
        let tokens = self.lists.tokens(project, capability).await?;
        Ok(tokens.contains(token))
    }
}
