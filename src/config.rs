//! Configuration types for media-batch-dl
//!
//! Everything here is plain data, built once at startup and passed by value or
//! `Arc` into the components that need it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// External tool paths (yt-dlp, ffmpeg)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Directory containing ffmpeg/ffprobe (yt-dlp uses PATH if None)
    #[serde(default = "default_ffmpeg_location")]
    pub ffmpeg_location: Option<PathBuf>,

    /// Whether to search PATH for yt-dlp if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            ffmpeg_location: default_ffmpeg_location(),
            search_path: true,
        }
    }
}

/// Audio post-processing settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Target codec for audio extraction (default: "mp3")
    #[serde(default = "default_audio_codec")]
    pub codec: String,

    /// Target quality/bitrate in kbps (default: "192")
    #[serde(default = "default_audio_quality")]
    pub quality: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            codec: default_audio_codec(),
            quality: default_audio_quality(),
        }
    }
}

/// Video merge settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Container forced during the video+audio merge (default: "mp4")
    #[serde(default = "default_merge_container")]
    pub container: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            container: default_merge_container(),
        }
    }
}

/// Batch source parsing settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Field delimiter for table files (default: ',')
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

/// Main configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// External tool locations
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Video output settings
    #[serde(default)]
    pub video: VideoConfig,

    /// Batch source settings
    #[serde(default)]
    pub source: SourceConfig,
}

impl Config {
    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(
                "config",
                format!("failed to read config file '{}': {}", path.display(), e),
            )
        })?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the backend cannot act on
    pub fn validate(&self) -> Result<()> {
        if self.audio.codec.trim().is_empty() {
            return Err(Error::config("audio.codec", "audio codec must not be empty"));
        }
        if self.audio.quality.trim().is_empty() {
            return Err(Error::config(
                "audio.quality",
                "audio quality must not be empty",
            ));
        }
        if self.video.container.trim().is_empty() {
            return Err(Error::config(
                "video.container",
                "merge container must not be empty",
            ));
        }
        if !self.source.delimiter.is_ascii() {
            return Err(Error::config(
                "source.delimiter",
                format!("delimiter '{}' is not a single-byte character", self.source.delimiter),
            ));
        }
        Ok(())
    }
}

/// ffmpeg bundled next to the running executable (`<exe dir>/ffmpeg/bin`)
///
/// Returns `None` when the directory does not exist, leaving discovery to
/// yt-dlp's own PATH lookup.
pub fn bundled_ffmpeg_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent()?.join("ffmpeg").join("bin");
    dir.is_dir().then_some(dir)
}

fn default_ffmpeg_location() -> Option<PathBuf> {
    bundled_ffmpeg_dir()
}

fn default_true() -> bool {
    true
}

fn default_audio_codec() -> String {
    "mp3".to_string()
}

fn default_audio_quality() -> String {
    "192".to_string()
}

fn default_merge_container() -> String {
    "mp4".to_string()
}

fn default_delimiter() -> char {
    ','
}
