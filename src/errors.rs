// src/errors.rs

//! Crate-wide error types.
//!
//! - [`CiStatusError`] covers the application edge: configuration, IO,
//!   dispatching.
//! - [`ScanError`] is the typed failure of one observation cycle. The scan
//!   loop uses [`ScanError::is_retryable`] to decide whether another attempt
//!   makes sense.

use std::time::Duration;

use thiserror::Error;

use crate::types::{ResourceKind, RunReference};

#[derive(Error, Debug)]
pub enum CiStatusError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CiStatusError>;

/// Failure of a single watch/supervise cycle.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The watched resource does not exist (yet).
    #[error("{kind} {reference} not found")]
    NotFound {
        kind: ResourceKind,
        reference: RunReference,
    },

    /// The watch stream failed or closed before a terminal state was seen.
    #[error("watch transport error: {error}")]
    Transport { error: String },

    /// An object received on the watch stream could not be decoded.
    #[error("cannot decode watched object: {error}")]
    Decode { error: String },

    /// The notification collaborator refused the report.
    #[error("notification failed: {error}")]
    Notify { error: String },

    /// The caller cancelled the scan.
    #[error("scan cancelled")]
    Cancelled,

    /// The scan deadline elapsed before the resource terminated.
    #[error("timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

impl ScanError {
    /// Short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ScanError::NotFound { .. } => "scan_not_found",
            ScanError::Transport { .. } => "scan_transport",
            ScanError::Decode { .. } => "scan_decode",
            ScanError::Notify { .. } => "scan_notify",
            ScanError::Cancelled => "scan_cancelled",
            ScanError::Timeout { .. } => "scan_timeout",
        }
    }

    /// Whether another attempt may succeed.
    ///
    /// Cancellation and deadline expiry end the whole scan; everything else
    /// is treated as transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ScanError::Cancelled | ScanError::Timeout { .. })
    }

    pub fn transport(error: impl std::fmt::Display) -> Self {
        ScanError::Transport {
            error: error.to_string(),
        }
    }
}
