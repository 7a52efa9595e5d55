//! # media-batch-dl
//!
//! Batch orchestration for media downloads driven by an external backend
//! (yt-dlp + ffmpeg).
//!
//! ## Design Philosophy
//!
//! media-batch-dl is designed to be:
//! - **Sequential and isolated** - One item at a time; a failing or panicking
//!   item never stops the batch
//! - **Sensible defaults** - MP3 at 192 kbps for audio, MP4 for video
//! - **Library-first** - The bundled CLI is a thin front end over the crate
//! - **Event-driven** - Progress is pushed to a [`Reporter`], no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use media_batch_dl::{BatchRunner, BatchSource, ChannelReporter, Config, OutputKind, prepare_batch};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let source = BatchSource::Text("https://youtu.be/abc\nnot-a-link\n".to_string());
//!     let batch = prepare_batch(&source, OutputKind::Audio, Path::new("/tmp/music"), &config)?;
//!
//!     let runner = BatchRunner::from_config(&config);
//!     let (reporter, mut events) = ChannelReporter::channel();
//!     let handle = runner.start(batch.entries, batch.job, Arc::new(reporter))?;
//!
//!     // Apply events on this task
//!     tokio::spawn(async move {
//!         while let Some(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let tally = handle.wait().await?;
//!     println!("{} succeeded, {} failed, {} invalid", tally.succeeded, tally.failed, tally.invalid);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Media retrieval backends (yt-dlp, no-op)
pub mod backend;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Per-batch backend configuration
pub mod job;
/// Progress and result reporting
pub mod reporter;
/// Sequential batch runner (decomposed into focused submodules)
pub mod runner;
/// Batch source reading (table files, pasted text)
pub mod source;
/// Core types and events
pub mod types;
/// Identifier validation
pub mod validate;

// Re-export commonly used types
pub use backend::{MediaBackend, NoOpBackend, YtDlpBackend, backend_from_config};
pub use config::{AudioConfig, Config, SourceConfig, ToolsConfig, VideoConfig};
pub use error::{BackendError, Error, Result};
pub use job::{JobConfig, PostProcess, Sanitization};
pub use reporter::{ChannelReporter, Reporter, TracingReporter};
pub use runner::{BatchHandle, BatchRunner, PreparedBatch, prepare_batch};
pub use source::BatchSource;
pub use types::{
    BatchTally, Event, ItemOutcome, OutputKind, ProgressEvent, RunState, ValidationOutcome,
};

/// Wait for a running batch, cancelling it on a termination signal.
///
/// The first SIGTERM/SIGINT (Ctrl+C elsewhere) requests cancellation: the
/// item in flight finishes and no further items start. A second signal aborts
/// the worker, killing the item in flight; the result is then [`Error::Worker`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use media_batch_dl::{BatchRunner, Config, JobConfig, OutputKind, TracingReporter};
/// use media_batch_dl::wait_with_cancel_on_signal;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::default();
///     let job = JobConfig::build(OutputKind::Video, std::path::Path::new("."), &config)?;
///     let runner = BatchRunner::from_config(&config);
///     let handle = runner.start(
///         vec!["https://youtu.be/abc".to_string()],
///         Arc::new(job),
///         Arc::new(TracingReporter),
///     )?;
///
///     let tally = wait_with_cancel_on_signal(handle).await?;
///     println!("cancelled: {}", tally.cancelled);
///     Ok(())
/// }
/// ```
pub async fn wait_with_cancel_on_signal(handle: BatchHandle) -> Result<BatchTally> {
    let mut signals = TerminationSignals::register();
    let token = handle.cancel_token();
    let abort = handle.abort_handle();
    let wait = handle.wait();
    tokio::pin!(wait);

    tokio::select! {
        result = &mut wait => return result,
        _ = signals.recv() => {
            tracing::info!("Cancelling batch; the current item will finish first (signal again to abort)");
            token.cancel();
        }
    }

    tokio::select! {
        result = &mut wait => return result,
        _ = signals.recv() => {
            tracing::warn!("Second termination signal, aborting the current item");
            abort.abort();
        }
    }

    wait.await
}

/// Termination signals, registered once so they can be awaited repeatedly
struct TerminationSignals {
    #[cfg(unix)]
    sigterm: Option<tokio::signal::unix::Signal>,
    #[cfg(unix)]
    sigint: Option<tokio::signal::unix::Signal>,
}

impl TerminationSignals {
    /// Registration may fail in restricted environments (containers, tests)
    #[cfg(unix)]
    fn register() -> Self {
        use tokio::signal::unix::{SignalKind, signal};

        let sigterm = signal(SignalKind::terminate())
            .inspect_err(|e| tracing::warn!(error = %e, "Could not register SIGTERM handler"))
            .ok();
        let sigint = signal(SignalKind::interrupt())
            .inspect_err(|e| tracing::warn!(error = %e, "Could not register SIGINT handler"))
            .ok();
        Self { sigterm, sigint }
    }

    #[cfg(not(unix))]
    fn register() -> Self {
        Self {}
    }

    /// Resolve on the next signal; never resolves if nothing can be listened for
    #[cfg(unix)]
    async fn recv(&mut self) {
        match (self.sigterm.as_mut(), self.sigint.as_mut()) {
            (Some(sigterm), Some(sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
                    _ = sigint.recv() => tracing::info!("Received SIGINT signal (Ctrl+C)"),
                }
            }
            (Some(sigterm), None) => {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            }
            (None, Some(sigint)) => {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            }
            (None, None) => {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                ctrl_c_or_pending().await;
            }
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) {
        ctrl_c_or_pending().await;
    }
}

async fn ctrl_c_or_pending() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
            std::future::pending::<()>().await;
        }
    }
}
