//! Concurrency and atomicity tests for the artifact store.

use bytes::Bytes;
use depot_core::{FileName, ProjectName, VersionName};
use depot_store::{ArtifactStore, Layout, StoreError};
use std::sync::Arc;

fn store(root: &std::path::Path) -> Arc<ArtifactStore> {
    Arc::new(ArtifactStore::new(Layout::new(root)))
}

fn names() -> (ProjectName, VersionName) {
    (
        ProjectName::new("acme").unwrap(),
        VersionName::new("v1").unwrap(),
    )
}

#[tokio::test]
async fn concurrent_writes_to_distinct_files_both_succeed() {
    let temp = tempfile::tempdir().unwrap();
    let store = store(temp.path());
    let (p, v) = names();

    let mut tasks = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        let (p, v) = (p.clone(), v.clone());
        tasks.push(tokio::spawn(async move {
            let file = FileName::new(format!("part-{i}.bin")).unwrap();
            let content = Bytes::from(vec![i as u8; 64 * 1024]);
            store.put_file(&p, &v, &file, content).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let files = store.list_files(&p, &v).await.unwrap();
    assert_eq!(files.len(), 8);
    for i in 0..8u8 {
        let file = FileName::new(format!("part-{i}.bin")).unwrap();
        let got = store.get_file(&p, &v, &file).await.unwrap();
        assert_eq!(got, Bytes::from(vec![i; 64 * 1024]));
    }
}

#[tokio::test]
async fn concurrent_writes_to_same_file_leave_exactly_one_content() {
    let temp = tempfile::tempdir().unwrap();
    let store = store(temp.path());
    let (p, v) = names();
    let file = FileName::new("app.bin").unwrap();

    let a = Bytes::from(vec![b'A'; 512 * 1024]);
    let b = Bytes::from(vec![b'B'; 512 * 1024]);

    let t1 = {
        let (store, p, v, file, a) = (store.clone(), p.clone(), v.clone(), file.clone(), a.clone());
        tokio::spawn(async move { store.put_file(&p, &v, &file, a).await })
    };
    let t2 = {
        let (store, p, v, file, b) = (store.clone(), p.clone(), v.clone(), file.clone(), b.clone());
        tokio::spawn(async move { store.put_file(&p, &v, &file, b).await })
    };
    t1.await.unwrap().unwrap();
    t2.await.unwrap().unwrap();

    let got = store.get_file(&p, &v, &file).await.unwrap();
    assert!(
        got == a || got == b,
        "final content must be exactly one writer's content"
    );
}

#[tokio::test]
async fn readers_never_observe_partial_content() {
    let temp = tempfile::tempdir().unwrap();
    let store = store(temp.path());
    let (p, v) = names();
    let file = FileName::new("app.bin").unwrap();

    let a = Bytes::from(vec![b'A'; 256 * 1024]);
    let b = Bytes::from(vec![b'B'; 256 * 1024]);

    let writer = {
        let (store, p, v, file) = (store.clone(), p.clone(), v.clone(), file.clone());
        let (a, b) = (a.clone(), b.clone());
        tokio::spawn(async move {
            for i in 0..20 {
                let content = if i % 2 == 0 { a.clone() } else { b.clone() };
                store.put_file(&p, &v, &file, content).await.unwrap();
            }
        })
    };

    let reader = {
        let (store, p, v, file) = (store.clone(), p.clone(), v.clone(), file.clone());
        let (a, b) = (a.clone(), b.clone());
        tokio::spawn(async move {
            let start = tokio::time::Instant::now();
            while start.elapsed().as_secs() < 5 {
                match store.get_file(&p, &v, &file).await {
                    Ok(got) => {
                        assert!(
                            got == a || got == b,
                            "observed a partial or mixed artifact ({} bytes)",
                            got.len()
                        );
                    }
                    Err(StoreError::NotFound(_)) => {}
                    Err(e) => panic!("unexpected read error: {e}"),
                }
                tokio::task::yield_now().await;
            }
        })
    };

    writer.await.unwrap();
    reader.abort();
    let _ = reader.await;

    let got = store.get_file(&p, &v, &file).await.unwrap();
    assert!(got == a || got == b);
}

#[tokio::test]
async fn streamed_size_matches_streamed_bytes_under_overwrites() {
    use futures::TryStreamExt;

    let temp = tempfile::tempdir().unwrap();
    let store = store(temp.path());
    let (p, v) = names();
    let file = FileName::new("app.bin").unwrap();

    let small = Bytes::from_static(b"tiny-pre");
    let large = Bytes::from(vec![b'L'; 512 * 1024]);
    store.put_file(&p, &v, &file, small.clone()).await.unwrap();

    let writer = {
        let (store, p, v, file) = (store.clone(), p.clone(), v.clone(), file.clone());
        let (small, large) = (small.clone(), large.clone());
        tokio::spawn(async move {
            for i in 0..50 {
                let content = if i % 2 == 0 { large.clone() } else { small.clone() };
                store.put_file(&p, &v, &file, content).await.unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    // The declared size and the streamed content must always describe the
    // same artifact, even when an overwrite renames over the path between
    // opening and reading.
    while !writer.is_finished() {
        let (stream, size) = store.get_file_stream(&p, &v, &file).await.unwrap();
        let chunks: Vec<Bytes> = stream.try_collect().await.unwrap();
        let streamed: usize = chunks.iter().map(Bytes::len).sum();
        assert_eq!(
            streamed as u64, size,
            "declared size must match the bytes the stream yields"
        );
        tokio::task::yield_now().await;
    }
    writer.await.unwrap();
}

#[tokio::test]
async fn listings_are_sorted_and_match_directory_contents() {
    let temp = tempfile::tempdir().unwrap();
    let store = store(temp.path());
    let p = ProjectName::new("acme").unwrap();

    for (v, f) in [("2.0", "b.txt"), ("1.0", "a.txt"), ("1.0", "c.txt")] {
        let version = VersionName::new(v).unwrap();
        let file = FileName::new(f).unwrap();
        store
            .put_file(&p, &version, &file, Bytes::from_static(b"x"))
            .await
            .unwrap();
    }

    assert_eq!(store.list_versions(&p).await.unwrap(), ["1.0", "2.0"]);
    let v1 = VersionName::new("1.0").unwrap();
    assert_eq!(store.list_files(&p, &v1).await.unwrap(), ["a.txt", "c.txt"]);
}
