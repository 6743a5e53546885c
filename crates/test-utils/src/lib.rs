pub mod builders;
pub mod fake_cluster;
pub mod recording;

use std::sync::{Arc, Once};
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use ci_status::engine::{PipelineRunSupervisor, RetryPolicy, Scanner};
use ci_status::notify::Notifier;
use ci_status::watch::{ClusterWatch, ResourceWatcher};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Scanner over `cluster` reporting to `notifier`, default retry policy and a
/// one-hour deadline.
pub fn scanner(cluster: Arc<dyn ClusterWatch>, notifier: Arc<dyn Notifier>) -> Scanner {
    scanner_with(cluster, notifier, RetryPolicy::default(), Duration::from_secs(3600))
}

pub fn scanner_with(
    cluster: Arc<dyn ClusterWatch>,
    notifier: Arc<dyn Notifier>,
    retry: RetryPolicy,
    timeout: Duration,
) -> Scanner {
    let supervisor = PipelineRunSupervisor::new(ResourceWatcher::new(cluster), notifier);
    Scanner::new(supervisor, retry, timeout)
}
