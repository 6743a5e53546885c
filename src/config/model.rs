// src/config/model.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::RetryPolicy;
use crate::watch::DEFAULT_POLL_INTERVAL;

pub const DEFAULT_TIMEOUT_MINUTES: u64 = 60;
pub const DEFAULT_LISTEN: &str = ":8080";
/// One year.
pub const MAX_TIMEOUT_MINUTES: u64 = 365 * 24 * 60;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// timeout = 60
/// listen = ":8080"
///
/// [[hooks]]
/// url = "https://ci.example.com/hooks/status"
/// scope = "pipelinerun.*"
///
/// [retry]
/// delay_secs = 3
/// attempts = 5
/// ```
///
/// All keys are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Scan deadline in minutes. `0` means "use the default".
    #[serde(default)]
    pub timeout: u64,

    /// Listen address for the (external) API server. Empty means default.
    #[serde(default)]
    pub listen: String,

    /// Subscribers notified of terminal run states.
    #[serde(default)]
    pub hooks: Vec<HookConfig>,

    #[serde(default)]
    pub retry: RetrySection,

    #[serde(default)]
    pub snapshot: SnapshotSection,
}

/// `[[hooks]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HookConfig {
    pub url: String,

    /// Glob over report scopes (`<kind>.<status>`). Empty matches all.
    #[serde(default)]
    pub scope: String,
}

/// `[retry]` section: fixed-delay retry of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetrySection {
    #[serde(default = "default_retry_delay_secs")]
    pub delay_secs: u64,

    #[serde(default = "default_retry_attempts")]
    pub attempts: u32,
}

fn default_retry_delay_secs() -> u64 {
    3
}

fn default_retry_attempts() -> u32 {
    5
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            delay_secs: default_retry_delay_secs(),
            attempts: default_retry_attempts(),
        }
    }
}

/// `[snapshot]` section, used by the file-backed cluster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SnapshotSection {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

impl Default for SnapshotSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Validated configuration with defaults applied.
///
/// Built once at startup and shared read-only. Construct it through
/// `ConfigFile::try_from(raw)`, which also validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigFile {
    timeout_minutes: u64,
    listen: String,
    hooks: Vec<HookConfig>,
    retry: RetrySection,
    snapshot: SnapshotSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        let timeout_minutes = match raw.timeout {
            0 => DEFAULT_TIMEOUT_MINUTES,
            t => t,
        };
        let listen = match raw.listen.trim() {
            "" => DEFAULT_LISTEN.to_string(),
            l => l.to_string(),
        };
        Self {
            timeout_minutes,
            listen,
            hooks: raw.hooks,
            retry: raw.retry,
            snapshot: raw.snapshot,
        }
    }

    /// Deadline of one scan.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_minutes.saturating_mul(60))
    }

    pub fn timeout_minutes(&self) -> u64 {
        self.timeout_minutes
    }

    pub fn listen(&self) -> &str {
        &self.listen
    }

    pub fn hooks(&self) -> &[HookConfig] {
        &self.hooks
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(Duration::from_secs(self.retry.delay_secs), self.retry.attempts)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.snapshot.poll_interval_ms)
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}
