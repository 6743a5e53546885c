// src/notify/mod.rs

//! Delivery of status reports.
//!
//! The supervisor talks to a [`Notifier`] instead of a concrete sink. The
//! binary uses [`HookNotifier`], which fans a report out to the configured
//! subscribers whose scope matches.

pub mod hook;
pub mod scope;

pub use hook::{HookNotifier, LogTransport, Subscriber, Transport};
pub use scope::ScopeFilter;

use crate::errors::ScanError;
use crate::tekton::StatusReport;
use crate::types::BoxFuture;

/// Receives every fully built [`StatusReport`].
pub trait Notifier: Send + Sync {
    fn notify<'a>(&'a self, report: &'a StatusReport) -> BoxFuture<'a, Result<(), ScanError>>;
}
