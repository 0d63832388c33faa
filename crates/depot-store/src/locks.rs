//! Per-(project, version) write serialization.
//!
//! The lock table is process-local and created on demand; it does not
//! persist across restarts and does not coordinate with other processes
//! sharing the state directory (single-process assumption). Entries are
//! kept for the life of the process; a distinct (project, version) pair
//! costs one `Arc<Mutex>`, which is acceptable at this scale.

use depot_core::{ProjectName, VersionName};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Table of per-version write locks.
#[derive(Default)]
pub struct VersionLocks {
    inner: Mutex<HashMap<(ProjectName, VersionName), Arc<Mutex<()>>>>,
}

impl VersionLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the write lock for (project, version), waiting if another
    /// writer currently holds it. Writes to other keys are unaffected.
    pub async fn acquire(
        &self,
        project: &ProjectName,
        version: &VersionName,
    ) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.inner.lock().await;
            table
                .entry((project.clone(), version.clone()))
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn key() -> (ProjectName, VersionName) {
        (
            ProjectName::new("acme").unwrap(),
            VersionName::new("v1").unwrap(),
        )
    }

    #[tokio::test]
    async fn same_key_serializes() {
        let locks = Arc::new(VersionLocks::new());
        let (p, v) = key();

        let guard = locks.acquire(&p, &v).await;

        let locks2 = locks.clone();
        let (p2, v2) = key();
        let waiter = tokio::spawn(async move {
            let _guard = locks2.acquire(&p2, &v2).await;
        });

        // The second acquire must not complete while the first is held.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should acquire after release")
            .unwrap();
    }

    #[tokio::test]
    async fn different_versions_do_not_contend() {
        let locks = VersionLocks::new();
        let p = ProjectName::new("acme").unwrap();
        let v1 = VersionName::new("v1").unwrap();
        let v2 = VersionName::new("v2").unwrap();

        let _g1 = locks.acquire(&p, &v1).await;
        // Must not block.
        let _g2 = tokio::time::timeout(Duration::from_millis(200), locks.acquire(&p, &v2))
            .await
            .expect("distinct versions must lock independently");
    }
}
