//! Progress and result reporting
//!
//! The batch worker runs on its own task. It talks to the context that started
//! it only through a [`Reporter`], and every method may be called from that
//! worker task. [`ChannelReporter`] forwards each call as an [`Event`] over a
//! channel so the owning context applies updates on its own task.

use tokio::sync::mpsc;

use crate::types::{BatchTally, Event, ItemOutcome, OutputKind, ProgressEvent};

/// Observer of a running batch
pub trait Reporter: Send + Sync {
    /// Batch accepted; called once before the first entry
    fn on_start(&self, _total: usize, _kind: OutputKind) {}

    /// Backend call about to start for a valid entry
    fn on_item_start(&self, _index: usize, _url: &str) {}

    /// One entry resolved; called before the matching progress tick
    fn on_item(&self, _index: usize, _entry: &str, _outcome: &ItemOutcome) {}

    /// Progress after each resolved entry
    fn on_progress(&self, progress: ProgressEvent);

    /// Final tally; called exactly once per batch
    fn on_complete(&self, tally: &BatchTally);
}

/// Reporter that marshals every call onto an unbounded channel
///
/// # Examples
///
/// ```
/// use media_batch_dl::reporter::{ChannelReporter, Reporter};
/// use media_batch_dl::{Event, ProgressEvent};
///
/// let (reporter, mut events) = ChannelReporter::channel();
/// reporter.on_progress(ProgressEvent { completed: 1, total: 2 });
///
/// assert_eq!(
///     events.try_recv().unwrap(),
///     Event::Progress(ProgressEvent { completed: 1, total: 2 })
/// );
/// ```
#[derive(Clone)]
pub struct ChannelReporter {
    tx: mpsc::UnboundedSender<Event>,
}

impl ChannelReporter {
    /// Create a reporter and the receiver the owning context drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    // send() fails only when the receiver is gone; the batch keeps running regardless
    fn send(&self, event: Event) {
        self.tx.send(event).ok();
    }
}

impl Reporter for ChannelReporter {
    fn on_start(&self, total: usize, kind: OutputKind) {
        self.send(Event::BatchStarted { total, kind });
    }

    fn on_item_start(&self, index: usize, url: &str) {
        self.send(Event::ItemStarted {
            index,
            url: url.to_string(),
        });
    }

    fn on_item(&self, index: usize, entry: &str, outcome: &ItemOutcome) {
        let event = match outcome {
            ItemOutcome::Invalid => Event::ItemSkipped {
                index,
                entry: entry.to_string(),
            },
            other => Event::ItemFinished {
                index,
                url: entry.to_string(),
                outcome: other.clone(),
            },
        };
        self.send(event);
    }

    fn on_progress(&self, progress: ProgressEvent) {
        self.send(Event::Progress(progress));
    }

    fn on_complete(&self, tally: &BatchTally) {
        self.send(Event::BatchComplete(*tally));
    }
}

/// Reporter that only writes structured log lines
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn on_item(&self, index: usize, entry: &str, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Success => tracing::info!(index, url = entry, "Item downloaded"),
            ItemOutcome::Failure(reason) => {
                tracing::warn!(index, url = entry, reason = %reason, "Item failed")
            }
            ItemOutcome::Invalid => tracing::warn!(index, entry, "Skipping invalid entry"),
        }
    }

    fn on_progress(&self, progress: ProgressEvent) {
        tracing::debug!(
            completed = progress.completed,
            total = progress.total,
            "Batch progress"
        );
    }

    fn on_complete(&self, tally: &BatchTally) {
        tracing::info!(
            succeeded = tally.succeeded,
            failed = tally.failed,
            invalid = tally.invalid,
            cancelled = tally.cancelled,
            "Batch finished"
        );
    }
}
