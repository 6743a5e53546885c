// src/engine/mod.rs

//! Supervision engine.
//!
//! This module ties together:
//! - the per-run supervision cycle ([`supervisor`])
//! - the retry policy and the scan loop wrapping one cycle ([`retry`], [`scan`])
//! - the dispatcher turning incoming events into concurrent scans
//!   ([`dispatch`])

use crate::types::RunReference;

/// Events flowing into the dispatcher from triggers, signals, etc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// A run should be observed until it terminates.
    ScanRequested {
        kind: String,
        reference: RunReference,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

impl RuntimeEvent {
    pub fn pipeline_run(reference: RunReference) -> Self {
        RuntimeEvent::ScanRequested {
            kind: crate::types::ResourceKind::PipelineRun.to_string(),
            reference,
        }
    }
}

pub mod dispatch;
pub mod retry;
pub mod scan;
pub mod supervisor;

pub use dispatch::{DispatchSummary, Dispatcher};
pub use retry::RetryPolicy;
pub use scan::Scanner;
pub use supervisor::PipelineRunSupervisor;
