//! Core types and events for media-batch-dl

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Kind of file produced for every item of a batch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Audio-only output, post-processed to a fixed codec
    Audio,
    /// Combined video and audio, merged into a single container
    Video,
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputKind::Audio => write!(f, "audio"),
            OutputKind::Video => write!(f, "video"),
        }
    }
}

impl std::str::FromStr for OutputKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "audio" | "mp3" => Ok(OutputKind::Audio),
            "video" | "mp4" => Ok(OutputKind::Video),
            other => Err(Error::config(
                "kind",
                format!("unknown output kind '{other}' (expected audio or video)"),
            )),
        }
    }
}

/// Classification of a single raw entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Well-formed source reference, trimmed
    Valid(String),
    /// Empty, whitespace-only, or not an accepted prefix
    Invalid,
}

impl ValidationOutcome {
    /// Returns `true` for [`ValidationOutcome::Valid`]
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }
}

/// Result of resolving one entry of a batch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ItemOutcome {
    /// The backend produced the output file
    Success,
    /// The backend reported a failure for this item
    Failure(String),
    /// The entry was rejected by validation; no backend call was made
    Invalid,
}

/// Progress tick emitted after every resolved entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Entries resolved so far (1-based after the first tick)
    pub completed: usize,
    /// Number of entries in the batch
    pub total: usize,
}

impl ProgressEvent {
    /// Progress percentage (0.0 to 100.0)
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            return 100.0;
        }
        (self.completed as f32 / self.total as f32) * 100.0
    }
}

/// Aggregate counters of a finished batch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTally {
    /// Items downloaded successfully
    pub succeeded: usize,
    /// Items the backend failed on
    pub failed: usize,
    /// Items rejected by validation
    pub invalid: usize,
    /// Number of entries the batch was started with
    pub total: usize,
    /// Whether the run stopped early on a cancellation request
    pub cancelled: bool,
}

impl BatchTally {
    /// Tally for a batch of `total` entries with nothing resolved yet
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Number of entries resolved (`succeeded + failed + invalid`)
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed + self.invalid
    }

    /// Count one outcome
    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Success => self.succeeded += 1,
            ItemOutcome::Failure(_) => self.failed += 1,
            ItemOutcome::Invalid => self.invalid += 1,
        }
    }
}

/// Lifecycle of a batch runner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// No batch has been started
    Idle,
    /// A batch is in flight
    Running,
    /// The last batch finished (or was cancelled) and delivered its tally
    Completed,
}

impl RunState {
    pub(crate) fn to_u8(self) -> u8 {
        match self {
            RunState::Idle => 0,
            RunState::Running => 1,
            RunState::Completed => 2,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => RunState::Running,
            2 => RunState::Completed,
            _ => RunState::Idle,
        }
    }
}

/// Event emitted by the channel reporter
///
/// Events for one batch arrive in input order: every entry produces either
/// `ItemSkipped` or `ItemStarted` + `ItemFinished`, followed by `Progress`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Batch accepted and worker started
    BatchStarted {
        /// Number of entries in the batch
        total: usize,
        /// Output kind used for every item
        kind: OutputKind,
    },

    /// Entry rejected by validation
    ItemSkipped {
        /// Zero-based position in the batch
        index: usize,
        /// The raw entry as supplied
        entry: String,
    },

    /// Backend call about to start
    ItemStarted {
        /// Zero-based position in the batch
        index: usize,
        /// Normalized URL handed to the backend
        url: String,
    },

    /// Backend call finished
    ItemFinished {
        /// Zero-based position in the batch
        index: usize,
        /// Normalized URL handed to the backend
        url: String,
        /// Outcome of the call
        outcome: ItemOutcome,
    },

    /// Progress tick
    Progress(ProgressEvent),

    /// Batch finished and tally is final
    BatchComplete(BatchTally),
}
