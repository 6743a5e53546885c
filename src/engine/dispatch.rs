// src/engine/dispatch.rs

use std::str::FromStr;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::engine::scan::Scanner;
use crate::engine::RuntimeEvent;
use crate::errors::ScanError;
use crate::tekton::StatusReport;
use crate::types::{ResourceKind, RunReference};

/// Counts of finished scans, returned when the dispatcher stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Events whose kind has no supervisor.
    pub ignored: usize,
}

/// Turns incoming [`RuntimeEvent`]s into concurrent scans.
///
/// Every accepted event gets its own task and its own child cancellation
/// token; scans share nothing but the [`Scanner`] (read-only).
pub struct Dispatcher {
    scanner: Scanner,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    shutdown: CancellationToken,
}

impl Dispatcher {
    pub fn new(scanner: Scanner, event_rx: mpsc::Receiver<RuntimeEvent>) -> Self {
        Self {
            scanner,
            event_rx,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token cancelled on shutdown; cancelling it from outside has the same
    /// effect as sending [`RuntimeEvent::ShutdownRequested`].
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Main event loop.
    ///
    /// Runs until the event channel closes or shutdown is requested, then
    /// waits for in-flight scans (which observe the cancelled token on
    /// shutdown) and returns the tally.
    pub async fn run(mut self) -> DispatchSummary {
        info!("dispatcher started");

        let mut summary = DispatchSummary::default();
        let mut scans: JoinSet<(RunReference, Result<StatusReport, ScanError>)> = JoinSet::new();

        loop {
            let event = tokio::select! {
                event = self.event_rx.recv() => event,
                Some(joined) = scans.join_next(), if !scans.is_empty() => {
                    record(&mut summary, joined);
                    continue;
                }
                _ = self.shutdown.cancelled() => {
                    info!("shutdown token cancelled");
                    break;
                }
            };

            let Some(event) = event else {
                info!("runtime event channel closed; draining scans");
                break;
            };

            debug!(?event, "dispatcher received event");

            match event {
                RuntimeEvent::ScanRequested { kind, reference } => {
                    if !is_supervised(&kind) {
                        warn!(%kind, %reference, "no supervisor for kind; ignoring event");
                        summary.ignored += 1;
                        continue;
                    }
                    let scanner = self.scanner.clone();
                    let token = self.shutdown.child_token();
                    scans.spawn(async move {
                        let result = scanner.scan(token, &reference).await;
                        (reference, result)
                    });
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested; cancelling in-flight scans");
                    self.shutdown.cancel();
                    break;
                }
            }
        }

        while let Some(joined) = scans.join_next().await {
            record(&mut summary, joined);
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            ignored = summary.ignored,
            "dispatcher exiting"
        );
        summary
    }
}

fn is_supervised(kind: &str) -> bool {
    matches!(ResourceKind::from_str(kind), Ok(ResourceKind::PipelineRun))
}

fn record(
    summary: &mut DispatchSummary,
    joined: Result<(RunReference, Result<StatusReport, ScanError>), tokio::task::JoinError>,
) {
    match joined {
        Ok((reference, Ok(report))) => {
            summary.succeeded += 1;
            debug!(%reference, status = %report.status, "scan succeeded");
        }
        Ok((reference, Err(err))) => {
            summary.failed += 1;
            error!(
                %reference,
                label = err.as_label(),
                error = %err,
                "scan failed"
            );
        }
        Err(join_err) => {
            summary.failed += 1;
            error!(error = %join_err, "scan task panicked or was aborted");
        }
    }
}
