// src/notify/scope.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};

/// Compiled subscriber scope, e.g. `pipelinerun.*` or `*.failed`.
///
/// An empty scope matches everything.
#[derive(Clone)]
pub struct ScopeFilter {
    raw: String,
    matcher: GlobMatcher,
}

impl fmt::Debug for ScopeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScopeFilter").field(&self.raw).finish()
    }
}

impl ScopeFilter {
    pub fn new(scope: &str) -> Result<Self> {
        let raw = match scope.trim() {
            "" => "*",
            s => s,
        };
        let matcher = Glob::new(raw)
            .with_context(|| format!("invalid scope pattern: {raw}"))?
            .compile_matcher();
        Ok(Self {
            raw: raw.to_string(),
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, scope: &str) -> bool {
        self.matcher.is_match(scope)
    }
}
