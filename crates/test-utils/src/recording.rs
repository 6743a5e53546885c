use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use ci_status::errors::ScanError;
use ci_status::notify::{Notifier, Transport};
use ci_status::tekton::StatusReport;
use ci_status::types::BoxFuture;

/// Notifier that keeps every report it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    reports: Arc<Mutex<Vec<StatusReport>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<StatusReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify<'a>(&'a self, report: &'a StatusReport) -> BoxFuture<'a, Result<(), ScanError>> {
        Box::pin(async move {
            self.reports.lock().unwrap().push(report.clone());
            Ok(())
        })
    }
}

/// Transport recording `(url, payload)` pairs; URLs in `failing` error out.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    delivered: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
    failing: Arc<HashSet<String>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(urls: &[&str]) -> Self {
        Self {
            delivered: Arc::default(),
            failing: Arc::new(urls.iter().map(|u| u.to_string()).collect()),
        }
    }

    pub fn delivered(&self) -> Vec<(String, serde_json::Value)> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.delivered().into_iter().map(|(url, _)| url).collect()
    }
}

impl Transport for RecordingTransport {
    fn deliver<'a>(
        &'a self,
        url: &'a str,
        payload: &'a serde_json::Value,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            if self.failing.contains(url) {
                return Err(anyhow!("connection refused: {url}"));
            }
            self.delivered
                .lock()
                .unwrap()
                .push((url.to_string(), payload.clone()));
            Ok(())
        })
    }
}
