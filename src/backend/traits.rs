//! Trait for media retrieval backends

use async_trait::async_trait;

use crate::error::BackendError;
use crate::job::JobConfig;

/// Trait for retrieving and converting a single media item
///
/// Implementations wrap an external tool or service. The batch runner calls
/// [`download_one`](MediaBackend::download_one) once per valid entry, strictly
/// sequentially, with the same [`JobConfig`] for the whole batch.
///
/// # Examples
///
/// ```no_run
/// use media_batch_dl::backend::{MediaBackend, YtDlpBackend};
/// use media_batch_dl::{Config, JobConfig, OutputKind};
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = YtDlpBackend::from_path().expect("yt-dlp not found in PATH");
/// let job = JobConfig::build(OutputKind::Audio, Path::new("downloads"), &Config::default())?;
///
/// if let Err(e) = backend.download_one(&job, "https://youtu.be/dQw4w9WgXcQ").await {
///     eprintln!("failed: {e}");
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Retrieve `url` into the job's destination
    ///
    /// # Errors
    ///
    /// Ordinary failure modes (bad URL, geo-block, network timeout, format
    /// unavailable, post-processing failure) are returned as [`BackendError`].
    /// Implementations must not panic for them.
    async fn download_one(&self, job: &JobConfig, url: &str) -> Result<(), BackendError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
