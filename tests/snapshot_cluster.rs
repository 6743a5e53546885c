// tests/snapshot_cluster.rs

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use ci_status::errors::ScanError;
use ci_status::fs::mock::MockFileSystem;
use ci_status::tekton::{PipelineRun, RunStatus, condition};
use ci_status::types::{ResourceKind, RunReference};
use ci_status::watch::{ClusterWatch, ResourceWatcher, SnapshotCluster, WatchContext, WatchEvent};
use ci_status_test_utils::builders::PipelineRunBuilder;
use ci_status_test_utils::{init_tracing, with_timeout};

const POLL: Duration = Duration::from_millis(10);

fn reference() -> RunReference {
    RunReference::new("ci", "build-42")
}

fn mock_cluster() -> (MockFileSystem, SnapshotCluster) {
    let fs = MockFileSystem::new();
    let cluster = SnapshotCluster::with_fs("/snapshots", Arc::new(fs.clone()), POLL);
    (fs, cluster)
}

#[test]
fn snapshot_path_layout() {
    let (_, cluster) = mock_cluster();
    assert_eq!(
        cluster.snapshot_path(ResourceKind::PipelineRun, &reference()),
        std::path::PathBuf::from("/snapshots/pipelinerun/ci/build-42.json")
    );
}

#[tokio::test]
async fn missing_snapshot_opens_nothing() {
    init_tracing();
    let (fs, cluster) = mock_cluster();
    // A directory at the object path is not a snapshot.
    fs.add_file("/snapshots/pipelinerun/ci/build-42.json/nested", "{}");

    let stream = cluster.open(ResourceKind::PipelineRun, &reference()).await.unwrap();
    assert!(stream.is_none());
}

#[tokio::test]
async fn content_changes_are_forwarded_once_each() {
    init_tracing();
    let (fs, cluster) = mock_cluster();
    let path = cluster.snapshot_path(ResourceKind::PipelineRun, &reference());
    let running = PipelineRunBuilder::new("ci", "build-42").running().json();
    fs.add_file(&path, running.to_string());

    let mut stream = cluster
        .open(ResourceKind::PipelineRun, &reference())
        .await
        .unwrap()
        .expect("snapshot present");

    let first = with_timeout(stream.recv()).await;
    assert!(matches!(first, Some(WatchEvent::Applied(ref v)) if *v == running));

    // Unchanged content is not re-sent.
    tokio::time::sleep(POLL * 5).await;
    assert!(stream.try_recv().is_err());

    let done = PipelineRunBuilder::new("ci", "build-42").succeeded().json();
    fs.add_file(&path, done.to_string());
    let second = with_timeout(stream.recv()).await;
    assert!(matches!(second, Some(WatchEvent::Applied(ref v)) if *v == done));
}

#[tokio::test]
async fn removed_snapshot_ends_with_an_error_event() {
    init_tracing();
    let (fs, cluster) = mock_cluster();
    let path = cluster.snapshot_path(ResourceKind::PipelineRun, &reference());
    fs.add_file(&path, PipelineRunBuilder::new("ci", "build-42").running().json().to_string());

    let mut stream = cluster
        .open(ResourceKind::PipelineRun, &reference())
        .await
        .unwrap()
        .unwrap();
    with_timeout(stream.recv()).await;

    fs.remove_file(&path);

    let event = with_timeout(stream.recv()).await;
    assert!(matches!(event, Some(WatchEvent::Error(ref e)) if e.contains("removed")));
    assert!(with_timeout(stream.recv()).await.is_none());
}

#[tokio::test]
async fn unparsable_snapshot_fails_the_wait() {
    init_tracing();
    let (fs, cluster) = mock_cluster();
    let path = cluster.snapshot_path(ResourceKind::PipelineRun, &reference());
    fs.add_file(&path, "{ not json");

    let watcher = ResourceWatcher::new(Arc::new(cluster));
    let handle = watcher.get_watch("pipelinerun", &reference()).await.unwrap().unwrap();
    let err = with_timeout(handle.wait::<PipelineRun>(&WatchContext::new(CancellationToken::new())))
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::Transport { ref error } if error.contains("parsing")));
}

#[tokio::test]
async fn real_files_are_watched_until_terminal() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let cluster = SnapshotCluster::new(dir.path(), POLL);
    let path = cluster.snapshot_path(ResourceKind::PipelineRun, &reference());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        PipelineRunBuilder::new("ci", "build-42").running().json().to_string(),
    )
    .unwrap();

    let watcher = ResourceWatcher::new(Arc::new(cluster));
    let handle = watcher.get_watch("pipelinerun", &reference()).await.unwrap().unwrap();

    let writer = {
        let path = path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let done = PipelineRunBuilder::new("ci", "build-42").cancelled().json();
            std::fs::write(&path, done.to_string()).unwrap();
        })
    };

    let run: PipelineRun =
        with_timeout(handle.wait(&WatchContext::new(CancellationToken::new())))
            .await
            .unwrap();
    writer.await.unwrap();

    assert_eq!(condition(&run.status.conditions).0, RunStatus::Cancelled);
}
