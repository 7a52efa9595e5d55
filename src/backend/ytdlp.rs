//! CLI-based backend using the external yt-dlp executable

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::parser::{ExitStatus, parse_download_output};
use super::traits::MediaBackend;
use crate::error::BackendError;
use crate::job::JobConfig;

/// Backend that runs `yt-dlp` once per item
///
/// The executable path is fixed at construction. Every call spawns a fresh
/// process with [`JobConfig::to_args`] followed by the URL, so no state is
/// carried between items.
///
/// # Examples
///
/// ```no_run
/// use media_batch_dl::backend::YtDlpBackend;
/// use std::path::PathBuf;
///
/// // Create with explicit path
/// let backend = YtDlpBackend::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let backend = YtDlpBackend::from_path().expect("yt-dlp not found in PATH");
/// ```
pub struct YtDlpBackend {
    binary_path: PathBuf,
}

impl YtDlpBackend {
    /// Create a backend with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find yt-dlp in PATH
    ///
    /// Returns `None` if the binary cannot be found.
    pub fn from_path() -> Option<Self> {
        which::which("yt-dlp").ok().map(Self::new)
    }

    /// Path of the executable this backend runs
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }
}

#[async_trait]
impl MediaBackend for YtDlpBackend {
    async fn download_one(&self, job: &JobConfig, url: &str) -> Result<(), BackendError> {
        let args = job.to_args();
        tracing::debug!(
            binary = %self.binary_path.display(),
            ?args,
            url,
            "Running yt-dlp"
        );

        let mut command = Command::new(&self.binary_path);
        command
            .args(&args)
            .arg("--")
            .arg(url)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        // Own process group: a terminal Ctrl-C must reach only the runner, not the item in flight
        #[cfg(unix)]
        command.process_group(0);

        let output = command
            .output()
            .await
            .map_err(|e| {
                BackendError::Tool(format!(
                    "failed to execute {}: {}",
                    self.binary_path.display(),
                    e
                ))
            })?;

        parse_download_output(
            &output.stdout,
            &output.stderr,
            ExitStatus::from(output.status),
        )
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}
