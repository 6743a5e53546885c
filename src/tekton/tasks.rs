// src/tekton/tasks.rs

//! Task timeline of a pipeline run.
//!
//! Ordering goes through the small [`TaskOrder`] contract so the same stable
//! sort can be reused on any indexable task collection.

use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tekton::condition::{condition, RunStatus};
use crate::tekton::model::PipelineRun;

/// One task of a run, as reported to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    /// Pipeline task name (task-run name when the pipeline task is unnamed).
    pub name: String,
    pub task_run: String,
    pub status: RunStatus,
    pub reason: String,
    pub start_time: Option<DateTime<Utc>>,
    /// `None` while the task is still running or has not started.
    pub completion_time: Option<DateTime<Utc>>,
    pub duration_secs: Option<i64>,
}

impl TaskSummary {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            task_run: name.clone(),
            name,
            status: RunStatus::NoCondition,
            reason: String::new(),
            start_time: None,
            completion_time: None,
            duration_secs: None,
        }
    }

    pub fn with_times(
        mut self,
        start_time: Option<DateTime<Utc>>,
        completion_time: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_time = start_time;
        self.completion_time = completion_time;
        self.duration_secs = match (start_time, completion_time) {
            (Some(start), Some(end)) => Some((end - start).num_seconds()),
            _ => None,
        };
        self
    }
}

/// Ordering contract: length, pairwise less-than, swap.
pub trait TaskOrder {
    fn len(&self) -> usize;

    fn less(&self, i: usize, j: usize) -> bool;

    fn swap(&mut self, i: usize, j: usize);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stable insertion sort driven only by [`TaskOrder`].
///
/// Elements move left only past strictly greater neighbours, so equal keys
/// keep their input order.
pub fn stable_sort<T: TaskOrder + ?Sized>(data: &mut T) {
    for i in 1..data.len() {
        let mut j = i;
        while j > 0 && data.less(j, j - 1) {
            data.swap(j, j - 1);
            j -= 1;
        }
    }
}

/// Ordered collection of task summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tasks(Vec<TaskSummary>);

impl Tasks {
    pub fn new(tasks: Vec<TaskSummary>) -> Self {
        Self(tasks)
    }

    /// Sort in place by start time; unknown start times first.
    pub fn sort(&mut self) {
        stable_sort(self);
    }

    pub fn into_inner(self) -> Vec<TaskSummary> {
        self.0
    }
}

impl TaskOrder for Tasks {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn less(&self, i: usize, j: usize) -> bool {
        match (self.0[i].start_time, self.0[j].start_time) {
            (None, Some(_)) => true,
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.0.swap(i, j);
    }
}

impl Deref for Tasks {
    type Target = [TaskSummary];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Tasks {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<TaskSummary>> for Tasks {
    fn from(tasks: Vec<TaskSummary>) -> Self {
        Self(tasks)
    }
}

/// Build the ordered task timeline of a run.
///
/// Returns `None` when the run has no task-run sub-statuses yet, so callers
/// can tell "not started" apart from "no tasks".
pub fn get_tasks(run: &PipelineRun) -> Option<Tasks> {
    let task_runs = run.status.task_runs.as_ref()?;
    if task_runs.is_empty() {
        return None;
    }

    let summaries = task_runs
        .iter()
        .map(|(task_run, entry)| {
            let name = if entry.pipeline_task_name.is_empty() {
                task_run.clone()
            } else {
                entry.pipeline_task_name.clone()
            };

            let mut summary = TaskSummary::new(name);
            summary.task_run = task_run.clone();

            match &entry.status {
                Some(status) => {
                    let (state, reason) = condition(&status.conditions);
                    summary.status = state;
                    summary.reason = reason;
                    summary.with_times(status.start_time, status.completion_time)
                }
                None => summary,
            }
        })
        .collect::<Vec<_>>();

    let mut tasks = Tasks::new(summaries);
    tasks.sort();
    Some(tasks)
}
