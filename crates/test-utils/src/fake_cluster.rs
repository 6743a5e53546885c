use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use ci_status::errors::ScanError;
use ci_status::types::{BoxFuture, ResourceKind, RunReference};
use ci_status::watch::{ClusterWatch, WatchEvent, WatchStream};

/// What the fake does for one `open` call.
#[derive(Debug, Clone)]
pub enum Step {
    /// Resource does not exist: `Ok(None)`.
    Missing,
    /// Opening the watch fails outright.
    OpenError(String),
    /// Stream delivering `events`, then closing.
    Events(Vec<WatchEvent>),
    /// Stream delivering `events`, then staying open forever.
    EventsThenHang(Vec<WatchEvent>),
}

#[derive(Debug, Default)]
struct State {
    script: VecDeque<Step>,
    opens: Vec<(ResourceKind, RunReference)>,
    // Keeps `EventsThenHang` streams open.
    parked: Vec<mpsc::Sender<WatchEvent>>,
}

/// A scripted cluster:
/// - each `open` consumes the next [`Step`], falling back to `fallback`
///   once the script is exhausted
/// - records every `open` call.
#[derive(Debug, Clone)]
pub struct FakeCluster {
    state: Arc<Mutex<State>>,
    fallback: Step,
}

impl FakeCluster {
    pub fn new(script: Vec<Step>, fallback: Step) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                script: script.into(),
                ..Default::default()
            })),
            fallback,
        }
    }

    /// Every open behaves the same way.
    pub fn always(step: Step) -> Self {
        Self::new(Vec::new(), step)
    }

    pub fn open_count(&self) -> usize {
        self.state.lock().unwrap().opens.len()
    }

    pub fn opens(&self) -> Vec<(ResourceKind, RunReference)> {
        self.state.lock().unwrap().opens.clone()
    }
}

impl ClusterWatch for FakeCluster {
    fn open<'a>(
        &'a self,
        kind: ResourceKind,
        reference: &'a RunReference,
    ) -> BoxFuture<'a, Result<Option<WatchStream>, ScanError>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.opens.push((kind, reference.clone()));
            let step = state
                .script
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone());

            match step {
                Step::Missing => Ok(None),
                Step::OpenError(error) => Err(ScanError::Transport { error }),
                Step::Events(events) => Ok(Some(preloaded(events).1)),
                Step::EventsThenHang(events) => {
                    let (tx, rx) = preloaded(events);
                    state.parked.push(tx);
                    Ok(Some(rx))
                }
            }
        })
    }
}

fn preloaded(events: Vec<WatchEvent>) -> (mpsc::Sender<WatchEvent>, WatchStream) {
    let (tx, rx) = mpsc::channel(events.len().max(1));
    for event in events {
        tx.try_send(event).expect("channel sized for all events");
    }
    (tx, rx)
}
