// src/tekton/report.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tekton::condition::{condition, RunStatus};
use crate::tekton::model::{PipelineRun, Resource};
use crate::tekton::tasks::{get_tasks, TaskSummary};
use crate::types::ResourceKind;

/// Derived status of one run, built once per completed watch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
    pub status: RunStatus,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// `None` until the run has produced task runs.
    pub tasks: Option<Vec<TaskSummary>>,
    pub start_time: Option<DateTime<Utc>>,
    pub completion_time: Option<DateTime<Utc>>,
}

impl StatusReport {
    pub fn from_pipeline_run(run: &PipelineRun) -> Self {
        let (status, reason) = condition(run.conditions());
        let message = run
            .conditions()
            .first()
            .and_then(|c| c.message.clone())
            .filter(|m| !m.is_empty());

        Self {
            kind: PipelineRun::KIND,
            namespace: run.metadata.namespace.clone(),
            name: run.metadata.name.clone(),
            status,
            reason,
            message,
            tasks: get_tasks(run).map(|t| t.into_inner()),
            start_time: run.status.start_time,
            completion_time: run.status.completion_time,
        }
    }

    /// Scope this report is published under, e.g. `pipelinerun.failed`.
    pub fn scope(&self) -> String {
        format!("{}.{}", self.kind, self.status.as_str().to_lowercase())
    }
}
