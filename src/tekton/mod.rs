// src/tekton/mod.rs

//! Tekton resource model and the pure status derivation built on it.
//!
//! - [`model`] holds the subset of `PipelineRun` / `TaskRun` we read.
//! - [`condition`] maps a condition list to a displayable status and reason.
//! - [`tasks`] extracts and orders the task timeline of a run.
//! - [`report`] assembles the [`StatusReport`] handed to notifiers.
//!
//! Nothing in here performs IO.

pub mod condition;
pub mod model;
pub mod report;
pub mod tasks;

pub use condition::{condition, is_terminated, RunStatus};
pub use model::{
    Condition, ConditionStatus, ObjectMeta, PipelineRun, PipelineRunStatus,
    PipelineRunTaskRunStatus, Resource, TaskRun, TaskRunStatus,
};
pub use report::StatusReport;
pub use tasks::{get_tasks, stable_sort, TaskOrder, TaskSummary, Tasks};
