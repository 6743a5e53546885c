// tests/dispatch.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use ci_status::engine::{DispatchSummary, Dispatcher, RuntimeEvent};
use ci_status::types::RunReference;
use ci_status::watch::WatchEvent;
use ci_status_test_utils::builders::PipelineRunBuilder;
use ci_status_test_utils::fake_cluster::{FakeCluster, Step};
use ci_status_test_utils::recording::RecordingNotifier;
use ci_status_test_utils::{init_tracing, scanner, with_timeout};

fn finished(name: &str) -> Step {
    let done = PipelineRunBuilder::new("ci", name).succeeded().json();
    Step::EventsThenHang(vec![WatchEvent::Applied(done)])
}

fn hanging() -> Step {
    let running = PipelineRunBuilder::new("ci", "slow").running().json();
    Step::EventsThenHang(vec![WatchEvent::Applied(running)])
}

#[tokio::test]
async fn each_request_gets_its_own_scan() {
    init_tracing();
    let cluster = FakeCluster::new(vec![finished("a"), finished("b")], Step::Missing);
    let notifier = RecordingNotifier::new();
    let (tx, rx) = mpsc::channel(8);
    let dispatcher = Dispatcher::new(
        scanner(Arc::new(cluster.clone()), Arc::new(notifier.clone())),
        rx,
    );

    tx.send(RuntimeEvent::pipeline_run(RunReference::new("ci", "a")))
        .await
        .unwrap();
    tx.send(RuntimeEvent::pipeline_run(RunReference::new("ci", "b")))
        .await
        .unwrap();
    drop(tx);

    let summary = with_timeout(dispatcher.run()).await;

    assert_eq!(
        summary,
        DispatchSummary {
            succeeded: 2,
            failed: 0,
            ignored: 0
        }
    );
    assert_eq!(notifier.reports().len(), 2);
    assert_eq!(cluster.open_count(), 2);
}

#[tokio::test]
async fn unsupervised_kinds_are_ignored() {
    init_tracing();
    let cluster = FakeCluster::always(finished("a"));
    let (tx, rx) = mpsc::channel(8);
    let dispatcher = Dispatcher::new(
        scanner(Arc::new(cluster.clone()), Arc::new(RecordingNotifier::new())),
        rx,
    );

    for kind in ["taskrun", "deployment"] {
        tx.send(RuntimeEvent::ScanRequested {
            kind: kind.to_string(),
            reference: RunReference::new("ci", "a"),
        })
        .await
        .unwrap();
    }
    drop(tx);

    let summary = with_timeout(dispatcher.run()).await;

    assert_eq!(summary.ignored, 2);
    assert_eq!(summary.succeeded, 0);
    assert_eq!(cluster.open_count(), 0);
}

#[tokio::test]
async fn slow_scan_does_not_block_others() {
    init_tracing();
    // First open hangs forever, second finishes immediately.
    let cluster = FakeCluster::new(vec![hanging(), finished("fast")], Step::Missing);
    let notifier = RecordingNotifier::new();
    let (tx, rx) = mpsc::channel(8);
    let dispatcher = Dispatcher::new(
        scanner(Arc::new(cluster.clone()), Arc::new(notifier.clone())),
        rx,
    );
    let shutdown = dispatcher.shutdown_token();
    let handle = tokio::spawn(dispatcher.run());

    tx.send(RuntimeEvent::pipeline_run(RunReference::new("ci", "slow")))
        .await
        .unwrap();
    tx.send(RuntimeEvent::pipeline_run(RunReference::new("ci", "fast")))
        .await
        .unwrap();

    with_timeout(async {
        while notifier.reports().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert_eq!(notifier.reports()[0].name, "fast");

    shutdown.cancel();
    let summary = with_timeout(handle).await.unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1, "slow scan ends cancelled");
}

#[tokio::test]
async fn shutdown_event_cancels_in_flight_scans() {
    init_tracing();
    let cluster = FakeCluster::always(hanging());
    let (tx, rx) = mpsc::channel(8);
    let dispatcher = Dispatcher::new(
        scanner(Arc::new(cluster.clone()), Arc::new(RecordingNotifier::new())),
        rx,
    );
    let handle = tokio::spawn(dispatcher.run());

    tx.send(RuntimeEvent::pipeline_run(RunReference::new("ci", "slow")))
        .await
        .unwrap();
    with_timeout(async {
        while cluster.open_count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    tx.send(RuntimeEvent::ShutdownRequested).await.unwrap();
    let summary = with_timeout(handle).await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(cluster.open_count(), 1, "cancelled scans are not retried");
}
