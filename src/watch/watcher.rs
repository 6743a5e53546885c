// src/watch/watcher.rs

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::errors::ScanError;
use crate::tekton::{condition, is_terminated, Resource};
use crate::types::{ResourceKind, RunReference};
use crate::watch::cluster::{ClusterWatch, WatchEvent, WatchStream};
use crate::watch::context::WatchContext;

/// Opens watches through a [`ClusterWatch`] capability.
#[derive(Debug, Clone)]
pub struct ResourceWatcher {
    cluster: Arc<dyn ClusterWatch>,
}

impl ResourceWatcher {
    pub fn new(cluster: Arc<dyn ClusterWatch>) -> Self {
        Self { cluster }
    }

    /// Open a watch on the given resource.
    ///
    /// Returns `Ok(None)` for kinds we cannot watch and for resources that do
    /// not exist. Neither is an error: there is simply nothing to watch yet.
    pub async fn get_watch(
        &self,
        kind: &str,
        reference: &RunReference,
    ) -> Result<Option<WatchHandle>, ScanError> {
        let kind = match ResourceKind::from_str(kind) {
            Ok(kind) => kind,
            Err(reason) => {
                debug!(%reference, %reason, "not a watchable kind");
                return Ok(None);
            }
        };

        let Some(events) = self.cluster.open(kind, reference).await? else {
            debug!(%kind, %reference, "resource not found");
            return Ok(None);
        };

        Ok(Some(WatchHandle {
            kind,
            reference: reference.clone(),
            events,
        }))
    }
}

/// An open watch on one resource.
///
/// Dropping the handle closes the stream.
pub struct WatchHandle {
    kind: ResourceKind,
    reference: RunReference,
    events: WatchStream,
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("kind", &self.kind)
            .field("reference", &self.reference)
            .finish_non_exhaustive()
    }
}

impl WatchHandle {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn reference(&self) -> &RunReference {
        &self.reference
    }

    /// Block until the resource reaches a terminal condition.
    ///
    /// Ends early with `Cancelled` or `Timeout` when `ctx` is done, with
    /// `Transport` when the stream fails or closes, and with `Decode` when an
    /// object does not match `T`.
    pub async fn wait<T: Resource>(mut self, ctx: &WatchContext) -> Result<T, ScanError> {
        if T::KIND != self.kind {
            return Err(ScanError::Decode {
                error: format!("watch is on a {} but a {} was expected", self.kind, T::KIND),
            });
        }

        loop {
            let event = tokio::select! {
                biased;
                err = ctx.done() => return Err(err),
                event = self.events.recv() => event,
            };

            let value = match event {
                Some(WatchEvent::Applied(value)) => value,
                Some(WatchEvent::Error(error)) => return Err(ScanError::Transport { error }),
                None => return Err(ScanError::transport("watch stream closed")),
            };

            let object: T = serde_json::from_value(value).map_err(|e| ScanError::Decode {
                error: e.to_string(),
            })?;

            if is_terminated(object.conditions()) {
                debug!(kind = %self.kind, reference = %self.reference, "resource terminated");
                return Ok(object);
            }

            let (status, _) = condition(object.conditions());
            debug!(
                kind = %self.kind,
                reference = %self.reference,
                %status,
                "resource not terminal yet"
            );
        }
    }
}
