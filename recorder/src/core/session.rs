//! Recording session state machine.
//!
//! Tracks whether a recording is in progress and accumulates the media
//! chunks delivered by the capture stream. Holds no handles and performs no
//! I/O; the orchestration layer feeds it chunks and decides what to do with
//! the finished [`Recording`].

use std::fmt;

use crate::core::types::{CaptureOptions, Recording};

/// Current phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording { options: CaptureOptions },
}

/// Invalid transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    AlreadyRecording,
    NotRecording,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AlreadyRecording => write!(f, "a recording is already in progress"),
            SessionError::NotRecording => write!(f, "no recording is in progress"),
        }
    }
}

impl std::error::Error for SessionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSession {
    state: SessionState,
    chunks: Vec<Vec<u8>>,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            chunks: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, SessionState::Recording { .. })
    }

    /// Enter the recording phase. Chunks from a previous session are dropped.
    pub fn start(&mut self, options: CaptureOptions) -> Result<(), SessionError> {
        if self.is_recording() {
            return Err(SessionError::AlreadyRecording);
        }
        self.chunks.clear();
        self.state = SessionState::Recording { options };
        Ok(())
    }

    /// Accept a chunk from the capture stream.
    ///
    /// Returns `true` if the chunk was stored. Empty chunks and chunks that
    /// arrive while idle are ignored.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) -> bool {
        if !self.is_recording() || chunk.is_empty() {
            return false;
        }
        self.chunks.push(chunk);
        true
    }

    /// Leave the recording phase and return everything collected.
    pub fn stop(&mut self) -> Result<Recording, SessionError> {
        if !self.is_recording() {
            return Err(SessionError::NotRecording);
        }
        self.state = SessionState::Idle;
        Ok(self.recording())
    }

    /// Return to idle, discarding collected chunks.
    pub fn abort(&mut self) {
        self.state = SessionState::Idle;
        self.chunks.clear();
    }

    /// Snapshot of the chunks collected so far, in any phase.
    pub fn recording(&self) -> Recording {
        Recording::new(self.chunks.clone())
    }
}
