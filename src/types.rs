use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Boxed future used at the async trait seams (cluster, notifier, transport).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Namespace used when a run is referenced by bare name.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Identifies one pipeline run in the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunReference {
    pub namespace: String,
    pub name: String,
}

impl RunReference {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RunReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl FromStr for RunReference {
    type Err = String;

    /// Accepts `namespace/name` or a bare `name` (namespace `default`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (namespace, name) = match s.split_once('/') {
            Some((ns, name)) => (ns, name),
            None => (DEFAULT_NAMESPACE, s),
        };
        if namespace.is_empty() || name.is_empty() || name.contains('/') {
            return Err(format!(
                "invalid run reference: {s:?} (expected \"namespace/name\" or \"name\")"
            ));
        }
        Ok(RunReference::new(namespace, name))
    }
}

/// Resource kinds that can be watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    PipelineRun,
    TaskRun,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::PipelineRun => "pipelinerun",
            ResourceKind::TaskRun => "taskrun",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pipelinerun" | "pipelineruns" => Ok(ResourceKind::PipelineRun),
            "taskrun" | "taskruns" => Ok(ResourceKind::TaskRun),
            other => Err(format!(
                "unsupported resource kind: {other} (expected \"pipelinerun\" or \"taskrun\")"
            )),
        }
    }
}
