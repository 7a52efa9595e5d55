//! Error types for media-batch-dl
//!
//! Two layers of failure exist:
//! - [`Error`] is a run-level failure. It is reported once, before a batch
//!   starts (bad destination, unreadable source, empty batch, busy runner).
//! - [`BackendError`] is an item-level failure. It is recorded in the tally and
//!   never aborts the batch.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for media-batch-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-batch-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "destination")
        key: Option<String>,
    },

    /// The batch source could not be opened or decoded
    #[error("failed to read batch source {path}: {reason}")]
    SourceRead {
        /// The source file that failed to read
        path: PathBuf,
        /// The underlying reason
        reason: String,
    },

    /// No candidate entries were found in the batch source
    #[error("no links found to download")]
    EmptyBatch,

    /// A batch is already running on this runner
    #[error("a batch is already running")]
    Busy,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// External tool could not be located or started
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// The batch worker task ended without producing a tally
    #[error("batch worker terminated abnormally: {0}")]
    Worker(String),
}

impl Error {
    /// Shorthand for a [`Error::Config`] tied to a configuration key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Shorthand for a [`Error::SourceRead`]
    pub fn source_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::SourceRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Item-level failures reported by a [`MediaBackend`](crate::backend::MediaBackend)
///
/// These are recorded as `ItemOutcome::Failure` and counted as `failed`.
/// None of them is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Network failure (timeout, DNS, connection reset, HTTP error)
    #[error("network error: {0}")]
    Network(String),

    /// The media exists but cannot be retrieved (private, removed, geo-blocked)
    #[error("media unavailable: {0}")]
    Unavailable(String),

    /// No extractor supports the given URL
    #[error("unsupported source: {0}")]
    Unsupported(String),

    /// Extraction failed for any other reason
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Post-processing (audio extraction, merge) failed
    #[error("post-processing failed: {0}")]
    PostProcess(String),

    /// The backend tool is missing or could not be executed
    #[error("backend tool error: {0}")]
    Tool(String),

    /// An unclassified fault caught at the item boundary
    #[error("unexpected backend fault: {0}")]
    Unexpected(String),
}

impl BackendError {
    /// Short machine-readable code for the failure class
    pub fn code(&self) -> &'static str {
        match self {
            BackendError::Network(_) => "network",
            BackendError::Unavailable(_) => "unavailable",
            BackendError::Unsupported(_) => "unsupported",
            BackendError::Extraction(_) => "extraction",
            BackendError::PostProcess(_) => "post_process",
            BackendError::Tool(_) => "tool",
            BackendError::Unexpected(_) => "unexpected",
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_carries_key() {
        let err = Error::config("destination", "not a directory");
        match &err {
            Error::Config { key, message } => {
                assert_eq!(key.as_deref(), Some("destination"));
                assert_eq!(message, "not a directory");
            }
            other => panic!("expected Config, got {other:?}"),
        }
        assert_eq!(err.to_string(), "configuration error: not a directory");
    }

    #[test]
    fn source_read_error_mentions_path() {
        let err = Error::source_read("/tmp/links.csv", "invalid UTF-8");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/links.csv"));
        assert!(msg.contains("invalid UTF-8"));
    }

    #[test]
    fn backend_error_codes_are_distinct() {
        let all = [
            BackendError::Network(String::new()),
            BackendError::Unavailable(String::new()),
            BackendError::Unsupported(String::new()),
            BackendError::Extraction(String::new()),
            BackendError::PostProcess(String::new()),
            BackendError::Tool(String::new()),
            BackendError::Unexpected(String::new()),
        ];
        let mut codes: Vec<_> = all.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
