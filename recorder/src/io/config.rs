//! Recorder configuration stored in `screen-recorder.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::{CaptureOptions, DEFAULT_FILE_NAME};

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "screen-recorder.toml";

/// Recorder configuration (TOML).
///
/// Missing fields default to values that record the primary X display and the
/// default audio source with `ffmpeg` and download into the working directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RecorderConfig {
    /// Capture the screen.
    pub video: bool,

    /// Capture system audio.
    pub audio: bool,

    /// Directory the finished recording is written to.
    pub output_dir: PathBuf,

    /// File name of the finished recording.
    pub file_name: String,

    /// Size of each read from the capture command's stdout.
    pub chunk_size_bytes: usize,

    /// How long to wait for the capture command to exit after asking it to stop.
    pub stop_timeout_secs: u64,

    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Command that writes an encoded WebM stream to stdout until it receives
    /// `q` on stdin.
    ///
    /// When unset, an `ffmpeg` command is built from the requested tracks:
    /// X11 screen grab for video, PulseAudio default source for audio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
            output_dir: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
            chunk_size_bytes: 64 * 1024,
            stop_timeout_secs: 10,
            capture: CaptureConfig::default(),
        }
    }
}

impl RecorderConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.capture_options().requests_any_track() {
            return Err(anyhow!("at least one of video or audio must be enabled"));
        }
        if self.file_name.trim().is_empty() {
            return Err(anyhow!("file_name must not be empty"));
        }
        if self.file_name.contains(['/', '\\']) {
            return Err(anyhow!("file_name must not contain path separators"));
        }
        if self.chunk_size_bytes == 0 {
            return Err(anyhow!("chunk_size_bytes must be > 0"));
        }
        if self.stop_timeout_secs == 0 {
            return Err(anyhow!("stop_timeout_secs must be > 0"));
        }
        if let Some(command) = &self.capture.command
            && command.first().is_none_or(|program| program.trim().is_empty())
        {
            return Err(anyhow!("capture.command must be a non-empty array"));
        }
        Ok(())
    }

    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            video: self.video,
            audio: self.audio,
        }
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RecorderConfig::default()`.
pub fn load_config(path: &Path) -> Result<RecorderConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = RecorderConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RecorderConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &RecorderConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, RecorderConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("screen-recorder.toml");
        let cfg = RecorderConfig {
            audio: false,
            file_name: "demo.webm".to_string(),
            ..RecorderConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("screen-recorder.toml");
        fs::write(&path, "audio = false\n[capture]\ncommand = [\"cat\"]\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert!(!cfg.audio);
        assert!(cfg.video);
        assert_eq!(cfg.capture.command, Some(vec!["cat".to_string()]));
        assert_eq!(cfg.file_name, DEFAULT_FILE_NAME);
    }

    #[test]
    fn rejects_config_without_tracks() {
        let cfg = RecorderConfig {
            video: false,
            audio: false,
            ..RecorderConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("video or audio"));
    }

    #[test]
    fn rejects_file_name_with_separator() {
        let cfg = RecorderConfig {
            file_name: "../escape.webm".to_string(),
            ..RecorderConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn default_config_leaves_command_to_capture_options() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("screen-recorder.toml");
        write_config(&path, &RecorderConfig::default()).expect("write");
        let written = fs::read_to_string(&path).expect("read");
        assert!(!written.contains("command"));
        assert_eq!(load_config(&path).expect("load").capture.command, None);
    }

    #[test]
    fn rejects_empty_capture_command() {
        let cfg = RecorderConfig {
            capture: CaptureConfig {
                command: Some(Vec::new()),
            },
            ..RecorderConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("capture.command"));
    }
}
