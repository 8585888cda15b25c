//! Shared value types for recording sessions.
//!
//! These types carry no behaviour beyond simple accessors and are shared by
//! the pure session logic, the capture backends and the download step.

use serde::{Deserialize, Serialize};

/// Container format produced by capture backends.
pub const MIME_TYPE: &str = "video/webm";

/// File name used when a recording is downloaded without an explicit name.
pub const DEFAULT_FILE_NAME: &str = "recorded-video.webm";

/// Which tracks a capture should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    pub video: bool,
    pub audio: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
        }
    }
}

impl CaptureOptions {
    /// At least one track must be requested for a capture to make sense.
    pub fn requests_any_track(&self) -> bool {
        self.video || self.audio
    }
}

/// An assembled recording: the ordered chunks delivered while recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    pub mime_type: &'static str,
    pub chunks: Vec<Vec<u8>>,
}

impl Recording {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            mime_type: MIME_TYPE,
            chunks,
        }
    }

    /// Total size in bytes.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenated bytes of every chunk.
    pub fn bytes(&self) -> Vec<u8> {
        self.chunks.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_concatenates_chunks_in_order() {
        let recording = Recording::new(vec![b"ab".to_vec(), b"cde".to_vec()]);
        assert_eq!(recording.len(), 5);
        assert_eq!(recording.bytes(), b"abcde");
        assert_eq!(recording.mime_type, "video/webm");
    }

    #[test]
    fn capture_options_default_to_both_tracks() {
        let options = CaptureOptions::default();
        assert!(options.video && options.audio);
        assert!(
            !CaptureOptions {
                video: false,
                audio: false
            }
            .requests_any_track()
        );
    }
}
