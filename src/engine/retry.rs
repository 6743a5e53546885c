// src/engine/retry.rs

use std::time::Duration;

/// Fixed-delay, bounded retry. No backoff, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    delay: Duration,
    attempts: u32,
}

impl RetryPolicy {
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(3);
    pub const DEFAULT_ATTEMPTS: u32 = 5;

    pub fn new(delay: Duration, attempts: u32) -> Self {
        Self { delay, attempts }
    }

    /// Pause between two attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Total number of attempts, the first one included.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY, Self::DEFAULT_ATTEMPTS)
    }
}
