//! Orchestration for the record toggle.
//!
//! [`ScreenRecorder`] couples a [`CaptureBackend`] with the pure
//! [`RecordingSession`]: starting opens a capture stream, polling moves
//! delivered chunks into the session, and stopping ends the stream and
//! downloads the assembled recording.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, error, info, instrument, warn};

use crate::core::button::{ButtonAction, ButtonView};
use crate::core::session::RecordingSession;
use crate::core::types::{CaptureOptions, Recording};
use crate::io::capture::{CaptureBackend, CaptureStream};
use crate::io::config::RecorderConfig;
use crate::io::download::download;

/// Result of a button click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Capture is running.
    Started,
    /// The capture could not be opened; the recorder is still idle.
    StartFailed,
    /// Capture ended and the recording was written to this path.
    Stopped(PathBuf),
}

pub struct ScreenRecorder<B: CaptureBackend> {
    backend: B,
    options: CaptureOptions,
    output_dir: PathBuf,
    file_name: String,
    session: RecordingSession,
    stream: Option<B::Stream>,
}

impl<B: CaptureBackend> ScreenRecorder<B> {
    pub fn new(
        backend: B,
        options: CaptureOptions,
        output_dir: impl Into<PathBuf>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            options,
            output_dir: output_dir.into(),
            file_name: file_name.into(),
            session: RecordingSession::new(),
            stream: None,
        }
    }

    pub fn from_config(backend: B, cfg: &RecorderConfig) -> Self {
        Self::new(
            backend,
            cfg.capture_options(),
            cfg.output_dir.clone(),
            cfg.file_name.clone(),
        )
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_recording()
    }

    /// Open a capture and enter the recording phase.
    ///
    /// Failures to open the capture are logged and swallowed; the recorder
    /// stays idle and `false` is returned.
    #[instrument(skip_all)]
    pub fn start_recording(&mut self) -> bool {
        if let Err(err) = self.session.start(self.options) {
            warn!(%err, "start ignored");
            return false;
        }
        match self.backend.open(&self.options) {
            Ok(stream) => {
                self.stream = Some(stream);
                info!("recording started");
                true
            }
            Err(err) => {
                self.session.abort();
                error!(err = %format!("{err:#}"), "error starting media recording");
                false
            }
        }
    }

    /// Move chunks delivered by the capture into the session.
    ///
    /// Returns how many chunks were kept (empty chunks are dropped).
    pub fn poll(&mut self) -> Result<usize> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(0);
        };
        let chunks = stream.poll_chunks().context("poll capture stream")?;
        Ok(self.accept(chunks))
    }

    /// End the capture and download the recording.
    #[instrument(skip_all, fields(output_dir = %self.output_dir.display(), file_name = %self.file_name))]
    pub fn stop_recording(&mut self) -> Result<PathBuf> {
        if let Some(stream) = self.stream.take() {
            match stream.stop() {
                Ok(trailing) => {
                    self.accept(trailing);
                }
                Err(err) => {
                    self.session.abort();
                    return Err(err).context("stop capture stream");
                }
            }
        }
        let recording = self.session.stop().context("stop recording")?;
        debug!(chunks = recording.chunks.len(), bytes = recording.len(), "recording assembled");
        download(&recording, &self.output_dir, &self.file_name)
    }

    /// Everything recorded so far, including chunks not yet polled.
    pub fn screen_recording(&mut self) -> Result<Recording> {
        self.poll()?;
        Ok(self.session.recording())
    }

    /// Handle a click on the toggle button.
    pub fn toggle(&mut self) -> Result<ToggleOutcome> {
        match self.button().action() {
            ButtonAction::Start => Ok(if self.start_recording() {
                ToggleOutcome::Started
            } else {
                ToggleOutcome::StartFailed
            }),
            ButtonAction::Stop => self.stop_recording().map(ToggleOutcome::Stopped),
        }
    }

    pub fn button(&self) -> ButtonView {
        ButtonView::for_state(self.is_recording())
    }

    fn accept(&mut self, chunks: Vec<Vec<u8>>) -> usize {
        let mut kept = 0;
        for chunk in chunks {
            if self.session.push_chunk(chunk) {
                kept += 1;
            }
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedCapture;
    use std::fs;

    fn recorder(backend: ScriptedCapture, dir: &std::path::Path) -> ScreenRecorder<ScriptedCapture> {
        ScreenRecorder::new(backend, CaptureOptions::default(), dir, "out.webm")
    }

    #[test]
    fn start_failure_is_swallowed() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut rec = recorder(ScriptedCapture::failing("permission denied"), temp.path());
        assert!(!rec.start_recording());
        assert!(!rec.is_recording());
        assert_eq!(rec.button().title, "Start Recording");
    }

    #[test]
    fn stop_downloads_polled_and_trailing_chunks() {
        let temp = tempfile::tempdir().expect("tempdir");
        let backend = ScriptedCapture::new(vec![b"ab".to_vec(), Vec::new(), b"cd".to_vec()])
            .with_trailing(vec![b"ef".to_vec()]);
        let mut rec = recorder(backend, temp.path());

        assert!(rec.start_recording());
        assert_eq!(rec.poll().expect("poll"), 2);
        let path = rec.stop_recording().expect("stop");

        assert_eq!(fs::read(path).expect("read"), b"abcdef");
        assert!(!rec.is_recording());
    }

    #[test]
    fn stop_without_start_errors() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut rec = recorder(ScriptedCapture::new(Vec::new()), temp.path());
        let err = rec.stop_recording().unwrap_err();
        assert!(format!("{err:#}").contains("no recording is in progress"));
    }

    #[test]
    fn screen_recording_includes_unpolled_chunks() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut rec = recorder(ScriptedCapture::new(vec![b"xy".to_vec()]), temp.path());
        rec.start_recording();
        let snapshot = rec.screen_recording().expect("snapshot");
        assert_eq!(snapshot.bytes(), b"xy");
        assert_eq!(snapshot.mime_type, "video/webm");
    }

    #[test]
    fn backend_receives_configured_options() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = RecorderConfig {
            audio: false,
            output_dir: temp.path().to_path_buf(),
            ..RecorderConfig::default()
        };
        let mut rec = ScreenRecorder::from_config(ScriptedCapture::new(Vec::new()), &cfg);
        rec.start_recording();
        assert_eq!(
            rec.backend().opened(),
            vec![CaptureOptions {
                video: true,
                audio: false
            }]
        );
    }
}
