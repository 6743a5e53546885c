// src/watch/mod.rs

//! Resource watching.
//!
//! This module is responsible for:
//! - The [`ClusterWatch`] seam through which object streams are opened.
//! - Blocking until a watched resource terminates, honoring cancellation and
//!   deadlines carried by a [`WatchContext`].
//! - A file-backed [`SnapshotCluster`] for offline use.
//!
//! It does **not** interpret the final state beyond "terminal or not"; that
//! is the job of [`crate::tekton`].

pub mod cluster;
pub mod context;
pub mod snapshot;
pub mod watcher;

pub use cluster::{ClusterWatch, WatchEvent, WatchStream};
pub use context::WatchContext;
pub use snapshot::{SnapshotCluster, DEFAULT_POLL_INTERVAL};
pub use watcher::{ResourceWatcher, WatchHandle};
