//! Pre-run checks performed before a batch is handed to the runner.

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::job::JobConfig;
use crate::source::BatchSource;
use crate::types::OutputKind;

/// Entries and configuration ready to pass to [`BatchRunner::start`](super::BatchRunner::start)
#[derive(Clone, Debug)]
pub struct PreparedBatch {
    /// Raw candidates in source order
    pub entries: Vec<String>,
    /// Shared configuration for every item
    pub job: Arc<JobConfig>,
}

/// Build the job and read the source, rejecting runs that cannot start
///
/// Checks run in this order, so the operator sees the most fundamental
/// problem first:
/// 1. destination directory ([`Error::Config`])
/// 2. source readability ([`Error::SourceRead`])
/// 3. at least one candidate ([`Error::EmptyBatch`])
pub fn prepare_batch(
    source: &BatchSource,
    kind: OutputKind,
    destination: &Path,
    config: &Config,
) -> Result<PreparedBatch> {
    let job = JobConfig::build(kind, destination, config)?;
    let entries = source.read(&config.source)?;
    if entries.is_empty() {
        return Err(Error::EmptyBatch);
    }

    tracing::debug!(entries = entries.len(), %kind, "Batch prepared");
    Ok(PreparedBatch {
        entries,
        job: Arc::new(job),
    })
}
