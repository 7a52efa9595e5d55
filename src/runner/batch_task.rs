//! Batch task execution -- the sequential per-entry loop run on the worker.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::backend::MediaBackend;
use crate::error::BackendError;
use crate::job::JobConfig;
use crate::reporter::Reporter;
use crate::types::{BatchTally, ItemOutcome, ProgressEvent, ValidationOutcome};
use crate::validate::validate;

/// Everything one batch run owns, moved into the worker task.
pub(super) struct BatchTaskContext {
    pub(super) entries: Vec<String>,
    pub(super) job: Arc<JobConfig>,
    pub(super) backend: Arc<dyn MediaBackend>,
    pub(super) reporter: Arc<dyn Reporter>,
    pub(super) cancel_token: CancellationToken,
}

/// Process every entry in order and return the final tally.
///
/// Phases per entry:
/// 1. Stop if cancellation was requested
/// 2. Validate; invalid entries never reach the backend
/// 3. Call the backend; any failure or panic stays local to the entry
/// 4. Report the outcome, then the progress tick
pub(super) async fn run_batch_task(ctx: BatchTaskContext) -> BatchTally {
    let total = ctx.entries.len();
    let mut tally = BatchTally::new(total);

    tracing::info!(
        total,
        kind = %ctx.job.kind(),
        destination = %ctx.job.destination().display(),
        backend = ctx.backend.name(),
        "Batch started"
    );
    ctx.reporter.on_start(total, ctx.job.kind());

    for (index, raw) in ctx.entries.iter().enumerate() {
        if ctx.cancel_token.is_cancelled() {
            tracing::info!(processed = index, total, "Batch cancelled");
            tally.cancelled = true;
            break;
        }

        let (entry, outcome) = resolve_entry(&ctx, index, raw).await;
        tally.record(&outcome);

        ctx.reporter.on_item(index, &entry, &outcome);
        ctx.reporter.on_progress(ProgressEvent {
            completed: index + 1,
            total,
        });
    }

    tracing::info!(
        succeeded = tally.succeeded,
        failed = tally.failed,
        invalid = tally.invalid,
        cancelled = tally.cancelled,
        "Batch complete"
    );
    ctx.reporter.on_complete(&tally);

    tally
}

/// Resolve one entry, returning the normalized entry text and its outcome.
async fn resolve_entry(ctx: &BatchTaskContext, index: usize, raw: &str) -> (String, ItemOutcome) {
    let url = match validate(raw) {
        ValidationOutcome::Valid(url) => url,
        ValidationOutcome::Invalid => {
            let entry = raw.trim().to_string();
            tracing::warn!(index, entry = %entry, "Skipping invalid entry");
            return (entry, ItemOutcome::Invalid);
        }
    };

    tracing::info!(index, url = %url, "Downloading");
    ctx.reporter.on_item_start(index, &url);

    let outcome = match download_isolated(ctx.backend.as_ref(), &ctx.job, &url).await {
        Ok(()) => {
            tracing::info!(index, url = %url, "Download complete");
            ItemOutcome::Success
        }
        Err(e) => {
            tracing::warn!(index, url = %url, code = e.code(), error = %e, "Download failed");
            ItemOutcome::Failure(e.to_string())
        }
    };

    (url, outcome)
}

/// Call the backend, downgrading a panic inside it to [`BackendError::Unexpected`].
pub(super) async fn download_isolated(
    backend: &dyn MediaBackend,
    job: &JobConfig,
    url: &str,
) -> Result<(), BackendError> {
    match AssertUnwindSafe(backend.download_one(job, url))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(url, backend = backend.name(), error = %message, "Backend panicked");
            Err(BackendError::Unexpected(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "backend panicked".to_string()
    }
}
