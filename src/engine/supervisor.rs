// src/engine/supervisor.rs

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::ScanError;
use crate::notify::Notifier;
use crate::tekton::{PipelineRun, Resource, StatusReport};
use crate::types::RunReference;
use crate::watch::{ResourceWatcher, WatchContext};

/// Runs one observation cycle of a pipeline run.
///
/// A cycle is: open a watch, block until the run terminates, derive the
/// [`StatusReport`], hand it to the notifier. The supervisor never retries;
/// errors go back to the caller untouched.
#[derive(Clone)]
pub struct PipelineRunSupervisor {
    watcher: ResourceWatcher,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for PipelineRunSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineRunSupervisor")
            .field("watcher", &self.watcher)
            .finish_non_exhaustive()
    }
}

impl PipelineRunSupervisor {
    pub fn new(watcher: ResourceWatcher, notifier: Arc<dyn Notifier>) -> Self {
        Self { watcher, notifier }
    }

    pub async fn supervise(
        &self,
        ctx: &WatchContext,
        reference: &RunReference,
    ) -> Result<StatusReport, ScanError> {
        let kind = PipelineRun::KIND;

        // Opening and notifying honor the context the same way the wait does.
        let opened = tokio::select! {
            biased;
            err = ctx.done() => return Err(err),
            opened = self.watcher.get_watch(kind.as_str(), reference) => opened?,
        };
        let handle = opened.ok_or_else(|| ScanError::NotFound {
            kind,
            reference: reference.clone(),
        })?;

        debug!(%reference, "waiting for pipeline run to terminate");
        let run: PipelineRun = handle.wait(ctx).await?;

        let report = StatusReport::from_pipeline_run(&run);
        info!(
            %reference,
            status = %report.status,
            reason = %report.reason,
            tasks = report.tasks.as_ref().map_or(0, |t| t.len()),
            "pipeline run finished"
        );

        tokio::select! {
            biased;
            err = ctx.done() => return Err(err),
            notified = self.notifier.notify(&report) => notified?,
        }
        Ok(report)
    }
}
