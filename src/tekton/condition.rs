// src/tekton/condition.rs

//! Condition list → (status, reason).
//!
//! Only the first condition is looked at; Tekton keeps the `Succeeded`
//! condition at index 0.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tekton::model::{Condition, ConditionStatus};

pub const REASON_PIPELINE_CANCELLED: &str = "Pipeline cancelled";
pub const REASON_PIPELINE_TIMEOUT: &str = "Pipeline timeout";

const CANCELLED_REASONS: [&str; 2] = ["PipelineRunCancelled", "TaskRunCancelled"];
const TIMEOUT_REASONS: [&str; 2] = ["PipelineRunTimeout", "TaskRunTimeout"];

/// Normalized status of a run or task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    Succeeded,
    Failed,
    Cancelled,
    Running,
    /// No condition reported yet.
    #[serde(rename = "---")]
    NoCondition,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Succeeded => "Succeeded",
            RunStatus::Failed => "Failed",
            RunStatus::Cancelled => "Cancelled",
            RunStatus::Running => "Running",
            RunStatus::NoCondition => "---",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::Cancelled
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the displayable status and reason from a condition list.
///
/// Never fails: an unrecognized `False` reason is reported as `Failed` with
/// the raw reason.
pub fn condition(conditions: &[Condition]) -> (RunStatus, String) {
    let Some(primary) = conditions.first() else {
        return (RunStatus::NoCondition, String::new());
    };

    match primary.status {
        ConditionStatus::True => (RunStatus::Succeeded, String::new()),
        ConditionStatus::Unknown => (RunStatus::Running, String::new()),
        ConditionStatus::False => {
            let reason = primary.reason.as_str();
            if CANCELLED_REASONS.contains(&reason) {
                (RunStatus::Cancelled, REASON_PIPELINE_CANCELLED.to_string())
            } else if TIMEOUT_REASONS.contains(&reason) {
                (RunStatus::Failed, REASON_PIPELINE_TIMEOUT.to_string())
            } else {
                (RunStatus::Failed, primary.reason.clone())
            }
        }
    }
}

/// True once the primary condition has left `Unknown`.
pub fn is_terminated(conditions: &[Condition]) -> bool {
    conditions
        .first()
        .is_some_and(|c| c.status != ConditionStatus::Unknown)
}
