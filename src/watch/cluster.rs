// src/watch/cluster.rs

//! Seam to the cluster's watch capability.
//!
//! The crate never talks to an API server itself. A [`ClusterWatch`]
//! implementation opens a stream of untyped objects for one resource and the
//! [`ResourceWatcher`](super::ResourceWatcher) decodes and interprets them.

use std::fmt;

use tokio::sync::mpsc;

use crate::errors::ScanError;
use crate::types::{BoxFuture, ResourceKind, RunReference};

/// One item on a watch stream.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// Current state of the object (added or modified).
    Applied(serde_json::Value),
    /// The stream broke; no further events follow.
    Error(String),
}

/// Receiving half of an open watch stream.
pub type WatchStream = mpsc::Receiver<WatchEvent>;

/// External capability: open a watch on a single resource.
pub trait ClusterWatch: Send + Sync + fmt::Debug {
    /// Open a watch on `kind` `reference`.
    ///
    /// Returns `Ok(None)` when the resource does not exist. Implementations
    /// should emit the current state first, then every change.
    fn open<'a>(
        &'a self,
        kind: ResourceKind,
        reference: &'a RunReference,
    ) -> BoxFuture<'a, Result<Option<WatchStream>, ScanError>>;
}
