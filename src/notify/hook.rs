// src/notify/hook.rs

//! Webhook-style fan-out.
//!
//! How a payload actually travels to a subscriber URL is up to the
//! [`Transport`]; the crate ships only [`LogTransport`].

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::HookConfig;
use crate::errors::ScanError;
use crate::notify::scope::ScopeFilter;
use crate::notify::Notifier;
use crate::tekton::StatusReport;
use crate::types::BoxFuture;

/// Sends a serialized report to one subscriber URL.
pub trait Transport: Send + Sync + fmt::Debug {
    fn deliver<'a>(&'a self, url: &'a str, payload: &'a serde_json::Value)
        -> BoxFuture<'a, Result<()>>;
}

/// Transport that only logs what would be delivered.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

impl Transport for LogTransport {
    fn deliver<'a>(
        &'a self,
        url: &'a str,
        payload: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            info!(%url, %payload, "status report");
            Ok(())
        })
    }
}

/// A subscriber endpoint and the scopes it wants.
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub url: String,
    pub scope: ScopeFilter,
}

impl Subscriber {
    pub fn new(url: impl Into<String>, scope: &str) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            scope: ScopeFilter::new(scope)?,
        })
    }
}

/// Notifier delivering each report to every subscriber whose scope matches.
#[derive(Debug, Clone)]
pub struct HookNotifier {
    subscribers: Vec<Subscriber>,
    transport: Arc<dyn Transport>,
}

impl HookNotifier {
    pub fn new(subscribers: Vec<Subscriber>, transport: Arc<dyn Transport>) -> Self {
        Self {
            subscribers,
            transport,
        }
    }

    /// Build from the `[[hooks]]` entries of a validated config.
    pub fn from_hooks(hooks: &[HookConfig], transport: Arc<dyn Transport>) -> Result<Self> {
        let subscribers = hooks
            .iter()
            .map(|h| Subscriber::new(h.url.clone(), &h.scope))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(subscribers, transport))
    }

    pub fn subscribers(&self) -> &[Subscriber] {
        &self.subscribers
    }
}

impl Notifier for HookNotifier {
    fn notify<'a>(&'a self, report: &'a StatusReport) -> BoxFuture<'a, Result<(), ScanError>> {
        Box::pin(async move {
            let scope = report.scope();
            let payload = serde_json::to_value(report).map_err(|e| ScanError::Notify {
                error: e.to_string(),
            })?;

            for sub in self.subscribers.iter().filter(|s| s.scope.matches(&scope)) {
                debug!(url = %sub.url, %scope, "delivering status report");
                // One broken subscriber must not hold back the others.
                if let Err(err) = self.transport.deliver(&sub.url, &payload).await {
                    warn!(
                        url = %sub.url,
                        %scope,
                        error = %err,
                        "status report delivery failed"
                    );
                }
            }
            Ok(())
        })
    }
}
