#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ci_status::config::{ConfigFile, HookConfig, RawConfigFile};
use ci_status::tekton::{
    Condition, ConditionStatus, ObjectMeta, PipelineRun, PipelineRunTaskRunStatus, TaskRunStatus,
};

/// Builder for `PipelineRun` objects as a watch would deliver them.
pub struct PipelineRunBuilder {
    run: PipelineRun,
}

impl PipelineRunBuilder {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            run: PipelineRun {
                metadata: ObjectMeta {
                    name: name.to_string(),
                    namespace: namespace.to_string(),
                },
                ..Default::default()
            },
        }
    }

    pub fn condition(mut self, status: ConditionStatus, reason: &str) -> Self {
        self.run.status.conditions.push(Condition::new(status, reason));
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        if let Some(c) = self.run.status.conditions.first_mut() {
            c.message = Some(message.to_string());
        }
        self
    }

    pub fn running(self) -> Self {
        self.condition(ConditionStatus::Unknown, "Running")
    }

    pub fn succeeded(self) -> Self {
        self.condition(ConditionStatus::True, "Succeeded")
    }

    pub fn cancelled(self) -> Self {
        self.condition(ConditionStatus::False, "PipelineRunCancelled")
    }

    pub fn times(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.run.status.start_time = start;
        self.run.status.completion_time = end;
        self
    }

    /// Add a task run entry keyed by `task_run`.
    pub fn task(
        mut self,
        task_run: &str,
        pipeline_task: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        let status = TaskRunStatus {
            conditions: vec![Condition::new(
                if end.is_some() {
                    ConditionStatus::True
                } else {
                    ConditionStatus::Unknown
                },
                "",
            )],
            pod_name: Some(format!("{task_run}-pod")),
            start_time: start,
            completion_time: end,
        };
        self.run
            .status
            .task_runs
            .get_or_insert_with(BTreeMap::new)
            .insert(
                task_run.to_string(),
                PipelineRunTaskRunStatus {
                    pipeline_task_name: pipeline_task.to_string(),
                    status: Some(status),
                },
            );
        self
    }

    /// Mark the run as having an empty (but present) task-run map.
    pub fn empty_tasks(mut self) -> Self {
        self.run.status.task_runs = Some(BTreeMap::new());
        self
    }

    pub fn build(self) -> PipelineRun {
        self.run
    }

    pub fn json(self) -> serde_json::Value {
        serde_json::to_value(self.run).expect("pipeline run serializes")
    }
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn timeout(mut self, minutes: u64) -> Self {
        self.config.timeout = minutes;
        self
    }

    pub fn listen(mut self, listen: &str) -> Self {
        self.config.listen = listen.to_string();
        self
    }

    pub fn with_hook(mut self, url: &str, scope: &str) -> Self {
        self.config.hooks.push(HookConfig {
            url: url.to_string(),
            scope: scope.to_string(),
        });
        self
    }

    pub fn retry(mut self, delay_secs: u64, attempts: u32) -> Self {
        self.config.retry.delay_secs = delay_secs;
        self.config.retry.attempts = attempts;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
