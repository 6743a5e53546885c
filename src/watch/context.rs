// src/watch/context.rs

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::ScanError;

/// Cancellation signal plus optional deadline for a blocking wait.
#[derive(Debug, Clone)]
pub struct WatchContext {
    token: CancellationToken,
    deadline: Option<(Instant, Duration)>,
}

impl WatchContext {
    /// Context without a deadline.
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Context that expires `timeout` from now. A deadline past the end of
    /// the clock means no deadline.
    pub fn with_timeout(token: CancellationToken, timeout: Duration) -> Self {
        Self {
            token,
            deadline: Instant::now().checked_add(timeout).map(|at| (at, timeout)),
        }
    }

    /// Resolves with the error that ended the context: `Cancelled` when the
    /// token fires, `Timeout` when the deadline passes. Pending forever
    /// otherwise.
    pub async fn done(&self) -> ScanError {
        match self.deadline {
            Some((deadline, timeout)) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => ScanError::Cancelled,
                    _ = tokio::time::sleep_until(deadline) => ScanError::Timeout { timeout },
                }
            }
            None => {
                self.token.cancelled().await;
                ScanError::Cancelled
            }
        }
    }
}
