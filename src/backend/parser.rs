//! Parser for yt-dlp failure output

use std::str;

use crate::error::BackendError;

/// Exit status of an external command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The command exited successfully (exit code 0)
    Success,
    /// The command exited with a non-zero exit code (or was killed)
    Failure(Option<i32>),
}

impl ExitStatus {
    /// Returns `true` if the exit status represents success
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if status.success() {
            Self::Success
        } else {
            Self::Failure(status.code())
        }
    }
}

const POST_PROCESS_MARKERS: &[&str] = &[
    "postprocessing:",
    "ffmpeg not found",
    "ffprobe and ffmpeg not found",
    "conversion failed",
    "error opening output",
];

const UNSUPPORTED_MARKERS: &[&str] = &["unsupported url", "is not a valid url", "no video formats found"];

const UNAVAILABLE_MARKERS: &[&str] = &[
    "video unavailable",
    "private video",
    "this video has been removed",
    "available in your country",
    "geo restricted",
    "geo-restricted",
    "members-only",
    "sign in to confirm",
    "this live event will begin",
    "requested format is not available",
];

const NETWORK_MARKERS: &[&str] = &[
    "unable to download webpage",
    "unable to download video data",
    "http error",
    "timed out",
    "connection reset",
    "connection refused",
    "name or service not known",
    "temporary failure in name resolution",
    "getaddrinfo failed",
    "network is unreachable",
];

/// Turn the outcome of a yt-dlp invocation into a `Result`
///
/// A zero exit status is success regardless of output. Otherwise the most
/// relevant error line is classified by substring markers, checked in the
/// order post-processing, unsupported, unavailable, network; anything else is
/// an extraction error.
pub fn parse_download_output(
    stdout: &[u8],
    stderr: &[u8],
    exit_status: ExitStatus,
) -> Result<(), BackendError> {
    if exit_status.is_success() {
        return Ok(());
    }

    let error_output = str::from_utf8(stderr).unwrap_or_default();
    let output = str::from_utf8(stdout).unwrap_or_default();

    let message = error_message(error_output)
        .or_else(|| error_message(output))
        .unwrap_or_else(|| match exit_status {
            ExitStatus::Failure(Some(code)) => format!("yt-dlp exited with status {code}"),
            _ => "yt-dlp terminated without an exit code".to_string(),
        });

    Err(classify(message))
}

/// Classify a single yt-dlp error message
pub fn classify(message: String) -> BackendError {
    let lower = message.to_lowercase();
    let has = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

    if has(POST_PROCESS_MARKERS) {
        BackendError::PostProcess(message)
    } else if has(UNSUPPORTED_MARKERS) {
        BackendError::Unsupported(message)
    } else if has(UNAVAILABLE_MARKERS) {
        BackendError::Unavailable(message)
    } else if has(NETWORK_MARKERS) {
        BackendError::Network(message)
    } else {
        BackendError::Extraction(message)
    }
}

/// Last `ERROR:` line, or the last non-empty line if none is tagged
fn error_message(output: &str) -> Option<String> {
    let lines: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .find_map(|l| l.strip_prefix("ERROR:"))
        .map(|l| l.trim().to_string())
        .or_else(|| lines.last().map(|l| l.to_string()))
}
