//! Per-batch backend configuration
//!
//! A [`JobConfig`] is built once per run from the output kind and the
//! destination directory and then shared read-only by every item.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::OutputKind;

/// Format selector for audio-only downloads
pub const AUDIO_FORMAT: &str = "bestaudio/best";

/// Format selector for video downloads (best pair, falling back to best single stream)
pub const VIDEO_FORMAT: &str = "bestvideo*+bestaudio/best";

/// Output name derived from the retrieved item's title; extension is chosen by the backend
pub const TITLE_TEMPLATE: &str = "%(title)s";

/// Post-processing applied by the backend after retrieval
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostProcess {
    /// Extract the audio track and transcode it
    ExtractAudio {
        /// Target codec (e.g. "mp3")
        codec: String,
        /// Target quality in kbps (e.g. "192")
        quality: String,
    },
    /// Merge separate streams into one container
    MergeOutput {
        /// Target container (e.g. "mp4")
        container: String,
    },
}

/// Filename sanitization flags handed to the backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sanitization {
    /// Restrict names to ASCII and replace spaces/special characters
    pub restrict_filenames: bool,
    /// Strip characters that are invalid on Windows filesystems
    pub windows_filenames: bool,
}

impl Default for Sanitization {
    fn default() -> Self {
        Self {
            restrict_filenames: true,
            windows_filenames: true,
        }
    }
}

/// Immutable backend configuration for one batch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    kind: OutputKind,
    destination: PathBuf,
    format: String,
    output_template: PathBuf,
    sanitization: Sanitization,
    post_process: PostProcess,
    ffmpeg_location: Option<PathBuf>,
}

impl JobConfig {
    /// Build the configuration for a batch
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] with key `destination` if `destination` does not
    /// exist or is not a directory. This is the only I/O performed.
    pub fn build(kind: OutputKind, destination: &Path, config: &Config) -> Result<Self> {
        check_destination(destination)?;

        let (format, post_process) = match kind {
            OutputKind::Audio => (
                AUDIO_FORMAT,
                PostProcess::ExtractAudio {
                    codec: config.audio.codec.clone(),
                    quality: config.audio.quality.clone(),
                },
            ),
            OutputKind::Video => (
                VIDEO_FORMAT,
                PostProcess::MergeOutput {
                    container: config.video.container.clone(),
                },
            ),
        };

        Ok(Self {
            kind,
            destination: destination.to_path_buf(),
            format: format.to_string(),
            output_template: destination.join(TITLE_TEMPLATE),
            sanitization: Sanitization::default(),
            post_process,
            ffmpeg_location: config.tools.ffmpeg_location.clone(),
        })
    }

    /// Output kind of the batch
    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    /// Destination directory
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Backend format selector
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Directory-qualified output naming template
    pub fn output_template(&self) -> &Path {
        &self.output_template
    }

    /// Filename sanitization flags
    pub fn sanitization(&self) -> Sanitization {
        self.sanitization
    }

    /// Post-processing directive
    pub fn post_process(&self) -> &PostProcess {
        &self.post_process
    }

    /// ffmpeg directory handed to the backend, if any
    pub fn ffmpeg_location(&self) -> Option<&Path> {
        self.ffmpeg_location.as_deref()
    }

    /// Re-check that the destination still exists
    pub fn ensure_destination(&self) -> Result<()> {
        check_destination(&self.destination)
    }

    /// Render the configuration as yt-dlp command-line arguments (URL not included)
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--format".into(),
            self.format.clone().into(),
            "--output".into(),
            self.output_template.clone().into_os_string(),
            "--no-playlist".into(),
        ];

        if self.sanitization.restrict_filenames {
            args.push("--restrict-filenames".into());
        }
        if self.sanitization.windows_filenames {
            args.push("--windows-filenames".into());
        }

        if let Some(ffmpeg) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.clone().into_os_string());
        }

        match &self.post_process {
            PostProcess::ExtractAudio { codec, quality } => {
                args.push("--extract-audio".into());
                args.push("--audio-format".into());
                args.push(codec.into());
                args.push("--audio-quality".into());
                args.push(format!("{quality}K").into());
            }
            PostProcess::MergeOutput { container } => {
                args.push("--merge-output-format".into());
                args.push(container.into());
            }
        }

        args
    }
}

fn check_destination(destination: &Path) -> Result<()> {
    if destination.as_os_str().is_empty() {
        return Err(Error::config(
            "destination",
            "no destination directory selected",
        ));
    }
    if !destination.is_dir() {
        return Err(Error::config(
            "destination",
            format!(
                "destination '{}' does not exist or is not a directory",
                destination.display()
            ),
        ));
    }
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn args_as_strings(job: &JobConfig) -> Vec<String> {
        job.to_args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn no_ffmpeg_config() -> Config {
        let mut config = Config::default();
        config.tools.ffmpeg_location = None;
        config
    }

    #[test]
    fn audio_job_extracts_mp3_at_192() {
        let dir = tempfile::tempdir().unwrap();
        let job = JobConfig::build(OutputKind::Audio, dir.path(), &no_ffmpeg_config()).unwrap();

        assert_eq!(job.kind(), OutputKind::Audio);
        assert_eq!(job.format(), AUDIO_FORMAT);
        assert_eq!(
            job.post_process(),
            &PostProcess::ExtractAudio {
                codec: "mp3".into(),
                quality: "192".into()
            }
        );
        assert_eq!(job.output_template(), dir.path().join("%(title)s"));
        assert!(job.sanitization().restrict_filenames);
        assert!(job.sanitization().windows_filenames);
    }

    #[test]
    fn video_job_merges_into_mp4() {
        let dir = tempfile::tempdir().unwrap();
        let job = JobConfig::build(OutputKind::Video, dir.path(), &no_ffmpeg_config()).unwrap();

        assert_eq!(job.format(), VIDEO_FORMAT);
        assert_eq!(
            job.post_process(),
            &PostProcess::MergeOutput {
                container: "mp4".into()
            }
        );
    }

    #[test]
    fn missing_destination_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = JobConfig::build(OutputKind::Audio, &missing, &Config::default()).unwrap_err();
        assert!(
            matches!(err, Error::Config { ref key, .. } if key.as_deref() == Some("destination"))
        );
    }

    #[test]
    fn file_destination_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(JobConfig::build(OutputKind::Video, &file, &Config::default()).is_err());
    }

    #[test]
    fn empty_destination_is_config_error() {
        let err =
            JobConfig::build(OutputKind::Video, Path::new(""), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("no destination"));
    }

    #[test]
    fn ensure_destination_detects_removed_directory() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        std::fs::create_dir(&dest).unwrap();
        let job = JobConfig::build(OutputKind::Audio, &dest, &Config::default()).unwrap();
        job.ensure_destination().unwrap();

        std::fs::remove_dir(&dest).unwrap();
        assert!(job.ensure_destination().is_err());
    }

    #[test]
    fn audio_args_include_extraction_and_sanitization() {
        let dir = tempfile::tempdir().unwrap();
        let job = JobConfig::build(OutputKind::Audio, dir.path(), &no_ffmpeg_config()).unwrap();
        let args = args_as_strings(&job);

        let pos = args.iter().position(|a| a == "--format").unwrap();
        assert_eq!(args[pos + 1], "bestaudio/best");
        assert!(args.contains(&"--extract-audio".to_string()));
        let pos = args.iter().position(|a| a == "--audio-format").unwrap();
        assert_eq!(args[pos + 1], "mp3");
        let pos = args.iter().position(|a| a == "--audio-quality").unwrap();
        assert_eq!(args[pos + 1], "192K");
        assert!(args.contains(&"--restrict-filenames".to_string()));
        assert!(args.contains(&"--windows-filenames".to_string()));
        assert!(!args.contains(&"--ffmpeg-location".to_string()));
        assert!(!args.contains(&"--merge-output-format".to_string()));
    }

    #[test]
    fn args_request_single_item_with_buffered_output() {
        let dir = tempfile::tempdir().unwrap();
        let job = JobConfig::build(OutputKind::Video, dir.path(), &no_ffmpeg_config()).unwrap();
        let args = args_as_strings(&job);

        assert!(args.contains(&"--no-playlist".to_string()));
        // Output is collected once the process exits, so line-flushed progress is not requested
        assert!(!args.contains(&"--newline".to_string()));
    }

    #[test]
    fn video_args_force_merge_container() {
        let dir = tempfile::tempdir().unwrap();
        let job = JobConfig::build(OutputKind::Video, dir.path(), &no_ffmpeg_config()).unwrap();
        let args = args_as_strings(&job);

        let pos = args.iter().position(|a| a == "--merge-output-format").unwrap();
        assert_eq!(args[pos + 1], "mp4");
        assert!(!args.contains(&"--extract-audio".to_string()));
    }

    #[test]
    fn ffmpeg_location_is_forwarded() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.tools.ffmpeg_location = Some(PathBuf::from("/opt/ffmpeg/bin"));
        let job = JobConfig::build(OutputKind::Video, dir.path(), &config).unwrap();
        let args = args_as_strings(&job);

        let pos = args.iter().position(|a| a == "--ffmpeg-location").unwrap();
        assert_eq!(args[pos + 1], "/opt/ffmpeg/bin");
    }
}
