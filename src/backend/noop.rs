//! No-op backend for graceful degradation

use async_trait::async_trait;

use super::traits::MediaBackend;
use crate::error::BackendError;
use crate::job::JobConfig;

/// Backend used when no yt-dlp executable is available
///
/// Every call fails with [`BackendError::Tool`], so a batch still runs to
/// completion and reports each valid entry as failed.
///
/// # Examples
///
/// ```
/// use media_batch_dl::backend::{MediaBackend, NoOpBackend};
/// use media_batch_dl::{Config, JobConfig, OutputKind};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = std::env::temp_dir();
/// let job = JobConfig::build(OutputKind::Video, &dir, &Config::default())?;
///
/// let result = NoOpBackend.download_one(&job, "https://youtu.be/a").await;
/// assert!(result.is_err());
/// # Ok(())
/// # }
/// ```
pub struct NoOpBackend;

#[async_trait]
impl MediaBackend for NoOpBackend {
    async fn download_one(&self, _job: &JobConfig, _url: &str) -> Result<(), BackendError> {
        Err(BackendError::Tool(
            "downloading requires the yt-dlp executable. \
             Configure ytdlp_path in config or ensure yt-dlp is in PATH."
                .into(),
        ))
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, OutputKind};

    #[tokio::test]
    async fn every_call_reports_missing_tool() {
        let dir = tempfile::tempdir().unwrap();
        let job = JobConfig::build(OutputKind::Audio, dir.path(), &Config::default()).unwrap();

        let err = NoOpBackend
            .download_one(&job, "https://youtu.be/a")
            .await
            .unwrap_err();
        match err {
            BackendError::Tool(msg) => assert!(msg.contains("yt-dlp")),
            other => panic!("expected Tool error, got {other:?}"),
        }
        assert_eq!(NoOpBackend.name(), "noop");
    }
}
