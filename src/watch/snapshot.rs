// src/watch/snapshot.rs

//! File-backed [`ClusterWatch`].
//!
//! Objects are read from `<root>/<kind>/<namespace>/<name>.json`, the output
//! of e.g. `kubectl get pipelinerun <name> -o json`. Each open watch polls its
//! file and forwards a new state whenever the content changes, so a capture
//! refreshed by an external process behaves like a live watch.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::ScanError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::{BoxFuture, ResourceKind, RunReference};
use crate::watch::cluster::{ClusterWatch, WatchEvent, WatchStream};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct SnapshotCluster {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    poll_interval: Duration,
}

impl SnapshotCluster {
    /// Snapshot cluster over the real filesystem.
    pub fn new(root: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self::with_fs(root, Arc::new(RealFileSystem), poll_interval)
    }

    pub fn with_fs(
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            root: root.into(),
            fs,
            poll_interval,
        }
    }

    /// Location of the captured object for `kind` `reference`.
    pub fn snapshot_path(&self, kind: ResourceKind, reference: &RunReference) -> PathBuf {
        self.root
            .join(kind.as_str())
            .join(&reference.namespace)
            .join(format!("{}.json", reference.name))
    }
}

impl ClusterWatch for SnapshotCluster {
    fn open<'a>(
        &'a self,
        kind: ResourceKind,
        reference: &'a RunReference,
    ) -> BoxFuture<'a, Result<Option<WatchStream>, ScanError>> {
        Box::pin(async move {
            let path = self.snapshot_path(kind, reference);
            if !self.fs.is_file(&path) {
                debug!(?path, "no snapshot for resource");
                return Ok(None);
            }

            info!(%kind, %reference, ?path, "watching snapshot");

            let (tx, rx) = mpsc::channel(16);
            tokio::spawn(poll_snapshot(
                Arc::clone(&self.fs),
                path,
                self.poll_interval,
                tx,
            ));
            Ok(Some(rx))
        })
    }
}

/// Poll one snapshot file until the receiver goes away or the file breaks.
async fn poll_snapshot(
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    poll_interval: Duration,
    tx: mpsc::Sender<WatchEvent>,
) {
    let mut last: Option<String> = None;

    loop {
        let event = match read_snapshot(fs.as_ref(), &path, last.as_deref()) {
            Ok(None) => None,
            Ok(Some((content, value))) => {
                last = Some(content);
                Some(WatchEvent::Applied(value))
            }
            Err(error) => {
                let _ = tx.send(WatchEvent::Error(error)).await;
                break;
            }
        };

        if let Some(event) = event {
            if tx.send(event).await.is_err() {
                break;
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(poll_interval) => {}
            _ = tx.closed() => break,
        }
    }

    debug!(?path, "snapshot poller finished");
}

/// Read and parse the snapshot if it changed since `last`.
fn read_snapshot(
    fs: &dyn FileSystem,
    path: &Path,
    last: Option<&str>,
) -> Result<Option<(String, serde_json::Value)>, String> {
    if !fs.exists(path) {
        return Err(format!("snapshot {:?} was removed", path));
    }

    let content = fs.read_to_string(path).map_err(|e| format!("{e:#}"))?;
    if last == Some(content.as_str()) {
        return Ok(None);
    }

    let value = serde_json::from_str(&content)
        .map_err(|e| format!("parsing snapshot {:?}: {}", path, e))?;
    Ok(Some((content, value)))
}
