// src/engine/scan.rs

//! Retry wrapper around one supervision cycle.
//!
//! ```text
//! scan(token, reference)
//!
//! ctx = token + deadline(timeout)
//! for attempt in 1..=attempts {
//!   ├─► supervise(ctx, reference)
//!   │     ├─ Ok                  ─► return report
//!   │     ├─ Err(non-retryable)  ─► return error   (Cancelled, Timeout)
//!   │     └─ Err(retryable)      ─► remember error
//!   └─► sleep(delay) unless last attempt (aborted by ctx)
//! }
//! return last error
//! ```

use std::time::Duration;

use tracing::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::engine::retry::RetryPolicy;
use crate::engine::supervisor::PipelineRunSupervisor;
use crate::errors::ScanError;
use crate::tekton::StatusReport;
use crate::types::RunReference;
use crate::watch::WatchContext;

/// Entry point invoked once per triggering event.
#[derive(Debug, Clone)]
pub struct Scanner {
    supervisor: PipelineRunSupervisor,
    retry: RetryPolicy,
    timeout: Duration,
}

impl Scanner {
    pub fn new(supervisor: PipelineRunSupervisor, retry: RetryPolicy, timeout: Duration) -> Self {
        Self {
            supervisor,
            retry,
            timeout,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Supervise `reference` until it terminates, retrying transient
    /// failures.
    ///
    /// Attempts run strictly one after another. Cancelling `token` aborts the
    /// current attempt and the whole sequence.
    pub async fn scan(
        &self,
        token: CancellationToken,
        reference: &RunReference,
    ) -> Result<StatusReport, ScanError> {
        let ctx = WatchContext::with_timeout(token, self.timeout);
        let attempts = self.retry.attempts().max(1);

        debug!(%reference, "scan start");

        let mut attempt = 0;
        let result = loop {
            attempt += 1;

            let err = match self.supervisor.supervise(&ctx, reference).await {
                Ok(report) => break Ok(report),
                Err(err) => err,
            };

            if !err.is_retryable() {
                break Err(err);
            }
            if attempt >= attempts {
                warn!(
                    %reference,
                    attempt,
                    error = %err,
                    "scan attempts exhausted"
                );
                break Err(err);
            }

            debug!(
                %reference,
                attempt,
                delay = ?self.retry.delay(),
                label = err.as_label(),
                error = %err,
                "scan attempt failed; retrying"
            );

            tokio::select! {
                biased;
                done = ctx.done() => break Err(done),
                _ = tokio::time::sleep(self.retry.delay()) => {}
            }
        };

        debug!(%reference, attempt, ok = result.is_ok(), "scan stop");
        result
    }
}
