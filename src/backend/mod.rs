//! Media retrieval backends
//!
//! The batch runner never retrieves or transcodes anything itself; it calls a
//! [`MediaBackend`] once per valid entry.
//!
//! - [`YtDlpBackend`]: runs the external `yt-dlp` executable
//! - [`NoOpBackend`]: stand-in when yt-dlp is unavailable; every item fails
//!
//! Use [`backend_from_config`] to pick one from [`ToolsConfig`].

mod noop;
mod parser;
mod traits;
mod ytdlp;

use std::sync::Arc;

pub use noop::NoOpBackend;
pub use parser::{ExitStatus, classify, parse_download_output};
pub use traits::MediaBackend;
pub use ytdlp::YtDlpBackend;

use crate::config::ToolsConfig;

/// Select the backend described by the tool configuration
///
/// An explicit `ytdlp_path` wins; otherwise PATH is searched when
/// `search_path` is enabled. Falls back to [`NoOpBackend`].
pub fn backend_from_config(tools: &ToolsConfig) -> Arc<dyn MediaBackend> {
    let backend: Arc<dyn MediaBackend> = if let Some(ref path) = tools.ytdlp_path {
        Arc::new(YtDlpBackend::new(path.clone()))
    } else if tools.search_path {
        YtDlpBackend::from_path()
            .map(|b| Arc::new(b) as Arc<dyn MediaBackend>)
            .unwrap_or_else(|| Arc::new(NoOpBackend))
    } else {
        Arc::new(NoOpBackend)
    };

    tracing::info!(backend = backend.name(), "Media backend initialized");
    backend
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn explicit_path_selects_ytdlp() {
        let tools = ToolsConfig {
            ytdlp_path: Some(PathBuf::from("/opt/yt-dlp")),
            ffmpeg_location: None,
            search_path: false,
        };
        assert_eq!(backend_from_config(&tools).name(), "yt-dlp");
    }

    #[test]
    fn disabled_search_without_path_selects_noop() {
        let tools = ToolsConfig {
            ytdlp_path: None,
            ffmpeg_location: None,
            search_path: false,
        };
        assert_eq!(backend_from_config(&tools).name(), "noop");
    }

    #[test]
    fn path_search_matches_which() {
        let tools = ToolsConfig {
            ytdlp_path: None,
            ffmpeg_location: None,
            search_path: true,
        };
        let expected = if which::which("yt-dlp").is_ok() {
            "yt-dlp"
        } else {
            "noop"
        };
        assert_eq!(backend_from_config(&tools).name(), expected);
    }
}
