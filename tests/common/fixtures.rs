//! Scripted backend and event collection helpers

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use media_batch_dl::{BackendError, Event, JobConfig, MediaBackend};
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

/// What the scripted backend does for one URL
#[derive(Clone)]
pub enum Step {
    Fail(BackendError),
    Panic,
}

/// Backend whose result per URL is scripted; unscripted URLs succeed
#[derive(Default)]
pub struct ScriptedBackend {
    steps: HashMap<String, Step>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(mut self, url: &str, err: BackendError) -> Self {
        self.steps.insert(url.to_string(), Step::Fail(err));
        self
    }

    pub fn panic_on(mut self, url: &str) -> Self {
        self.steps.insert(url.to_string(), Step::Panic);
        self
    }

    /// URLs passed to the backend, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaBackend for ScriptedBackend {
    async fn download_one(&self, job: &JobConfig, url: &str) -> Result<(), BackendError> {
        assert!(job.destination().is_dir());
        self.calls.lock().unwrap().push(url.to_string());
        match self.steps.get(url) {
            None => Ok(()),
            Some(Step::Fail(e)) => Err(e.clone()),
            Some(Step::Panic) => panic!("scripted panic for {url}"),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Write a table file into a fresh temp dir
pub fn table_file(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("links.csv");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

/// Drain every event already delivered on the channel
pub fn drain_events(rx: &mut UnboundedReceiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// `completed` counts of every progress event, in order
pub fn progress_counts(events: &[Event]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Progress(p) => Some(p.completed),
            _ => None,
        })
        .collect()
}
