// tests/watcher.rs

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use ci_status::errors::ScanError;
use ci_status::tekton::{PipelineRun, RunStatus, TaskRun, condition};
use ci_status::types::{ResourceKind, RunReference};
use ci_status::watch::{ResourceWatcher, WatchContext, WatchEvent};
use ci_status_test_utils::builders::PipelineRunBuilder;
use ci_status_test_utils::fake_cluster::{FakeCluster, Step};
use ci_status_test_utils::{init_tracing, with_timeout};

fn reference() -> RunReference {
    RunReference::new("default", "pod-test-1-1")
}

fn watcher(cluster: &FakeCluster) -> ResourceWatcher {
    ResourceWatcher::new(Arc::new(cluster.clone()))
}

#[tokio::test]
async fn unknown_kind_yields_no_watch() {
    init_tracing();
    let cluster = FakeCluster::always(Step::Events(Vec::new()));

    let handle = watcher(&cluster).get_watch("deployment", &reference()).await.unwrap();

    assert!(handle.is_none());
    assert_eq!(cluster.open_count(), 0, "cluster must not be asked for unknown kinds");
}

#[tokio::test]
async fn missing_resource_yields_no_watch() {
    init_tracing();
    let cluster = FakeCluster::always(Step::Missing);

    let handle = watcher(&cluster).get_watch("pipelinerun", &reference()).await.unwrap();

    assert!(handle.is_none());
    assert_eq!(cluster.opens(), vec![(ResourceKind::PipelineRun, reference())]);
}

#[tokio::test]
async fn open_failure_is_a_transport_error() {
    init_tracing();
    let cluster = FakeCluster::always(Step::OpenError("connection refused".into()));

    let err = watcher(&cluster)
        .get_watch("pipelinerun", &reference())
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::Transport { .. }), "got {err:?}");
}

#[tokio::test]
async fn kind_names_are_case_insensitive() {
    init_tracing();
    let cluster = FakeCluster::always(Step::EventsThenHang(Vec::new()));

    let handle = watcher(&cluster)
        .get_watch("PipelineRuns", &reference())
        .await
        .unwrap()
        .expect("watch opened");

    assert_eq!(handle.kind(), ResourceKind::PipelineRun);
    assert_eq!(handle.reference(), &reference());
}

#[tokio::test]
async fn wait_skips_non_terminal_states() {
    init_tracing();
    let running = PipelineRunBuilder::new("default", "pod-test-1-1").running().json();
    let done = PipelineRunBuilder::new("default", "pod-test-1-1")
        .cancelled()
        .message("PipelineRun \"pod-test-1-1\" was cancelled")
        .json();
    let cluster = FakeCluster::always(Step::EventsThenHang(vec![
        WatchEvent::Applied(running.clone()),
        WatchEvent::Applied(running),
        WatchEvent::Applied(done),
    ]));

    let handle = watcher(&cluster)
        .get_watch("pipelinerun", &reference())
        .await
        .unwrap()
        .unwrap();
    let ctx = WatchContext::new(CancellationToken::new());
    let run: PipelineRun = with_timeout(handle.wait(&ctx)).await.unwrap();

    assert_eq!(run.metadata.name, "pod-test-1-1");
    assert_eq!(condition(&run.status.conditions).0, RunStatus::Cancelled);
}

#[tokio::test]
async fn cancelled_context_ends_the_wait() {
    init_tracing();
    let running = PipelineRunBuilder::new("default", "pod-test-1-1").running().json();
    let cluster = FakeCluster::always(Step::EventsThenHang(vec![WatchEvent::Applied(running)]));

    let handle = watcher(&cluster)
        .get_watch("pipelinerun", &reference())
        .await
        .unwrap()
        .unwrap();

    let token = CancellationToken::new();
    let ctx = WatchContext::new(token.clone());
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    let err = with_timeout(handle.wait::<PipelineRun>(&ctx)).await.unwrap_err();
    canceller.await.unwrap();

    assert_eq!(err, ScanError::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn deadline_ends_the_wait_with_timeout() {
    init_tracing();
    let cluster = FakeCluster::always(Step::EventsThenHang(Vec::new()));
    let handle = watcher(&cluster)
        .get_watch("pipelinerun", &reference())
        .await
        .unwrap()
        .unwrap();

    let timeout = Duration::from_secs(60 * 60);
    let ctx = WatchContext::with_timeout(CancellationToken::new(), timeout);
    let started = tokio::time::Instant::now();

    let err = handle.wait::<PipelineRun>(&ctx).await.unwrap_err();

    assert_eq!(err, ScanError::Timeout { timeout });
    assert!(started.elapsed() >= timeout);
}

#[tokio::test]
async fn closed_stream_is_a_transport_error() {
    init_tracing();
    let running = PipelineRunBuilder::new("default", "p").running().json();
    let cluster = FakeCluster::always(Step::Events(vec![WatchEvent::Applied(running)]));

    let handle = watcher(&cluster).get_watch("pipelinerun", &reference()).await.unwrap().unwrap();
    let ctx = WatchContext::new(CancellationToken::new());
    let err = with_timeout(handle.wait::<PipelineRun>(&ctx)).await.unwrap_err();

    assert!(matches!(err, ScanError::Transport { .. }), "got {err:?}");
}

#[tokio::test]
async fn stream_error_event_is_a_transport_error() {
    init_tracing();
    let cluster = FakeCluster::always(Step::EventsThenHang(vec![WatchEvent::Error(
        "too old resource version".into(),
    )]));

    let handle = watcher(&cluster).get_watch("pipelinerun", &reference()).await.unwrap().unwrap();
    let ctx = WatchContext::new(CancellationToken::new());
    let err = with_timeout(handle.wait::<PipelineRun>(&ctx)).await.unwrap_err();

    assert_eq!(
        err,
        ScanError::Transport {
            error: "too old resource version".into()
        }
    );
}

#[tokio::test]
async fn undecodable_object_is_a_decode_error() {
    init_tracing();
    let bogus = serde_json::json!({ "metadata": "not an object" });
    let cluster = FakeCluster::always(Step::EventsThenHang(vec![WatchEvent::Applied(bogus)]));

    let handle = watcher(&cluster).get_watch("pipelinerun", &reference()).await.unwrap().unwrap();
    let ctx = WatchContext::new(CancellationToken::new());
    let err = with_timeout(handle.wait::<PipelineRun>(&ctx)).await.unwrap_err();

    assert!(matches!(err, ScanError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn waiting_for_the_wrong_kind_is_a_decode_error() {
    init_tracing();
    let cluster = FakeCluster::always(Step::EventsThenHang(Vec::new()));

    let handle = watcher(&cluster).get_watch("pipelinerun", &reference()).await.unwrap().unwrap();
    let ctx = WatchContext::new(CancellationToken::new());
    let err = with_timeout(handle.wait::<TaskRun>(&ctx)).await.unwrap_err();

    assert!(matches!(err, ScanError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn task_runs_can_be_watched_too() {
    init_tracing();
    let task_run = serde_json::json!({
        "metadata": { "name": "build-42-compile", "namespace": "ci" },
        "status": {
            "conditions": [{ "type": "Succeeded", "status": "False", "reason": "TaskRunTimeout" }],
            "podName": "build-42-compile-pod"
        }
    });
    let cluster = FakeCluster::always(Step::EventsThenHang(vec![WatchEvent::Applied(task_run)]));

    let reference = RunReference::new("ci", "build-42-compile");
    let handle = watcher(&cluster).get_watch("taskrun", &reference).await.unwrap().unwrap();
    let ctx = WatchContext::new(CancellationToken::new());
    let run: TaskRun = with_timeout(handle.wait(&ctx)).await.unwrap();

    let (status, reason) = condition(&run.status.conditions);
    assert_eq!(status, RunStatus::Failed);
    assert_eq!(reason, "Pipeline timeout");
}
