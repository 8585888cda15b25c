//! Test-only capture backend that replays scripted chunks.

use std::cell::RefCell;

use anyhow::{Result, anyhow};

use crate::core::types::CaptureOptions;
use crate::io::capture::{CaptureBackend, CaptureStream};

/// Backend whose streams deliver a fixed list of chunks.
///
/// Every call to [`CaptureBackend::open`] is recorded so tests can assert on
/// the options the recorder passed through.
#[derive(Debug, Default)]
pub struct ScriptedCapture {
    chunks: Vec<Vec<u8>>,
    trailing: Vec<Vec<u8>>,
    open_error: Option<String>,
    opened: RefCell<Vec<CaptureOptions>>,
}

impl ScriptedCapture {
    /// Streams deliver `chunks` on their first poll.
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks,
            ..Self::default()
        }
    }

    /// Every `open` fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            open_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Chunks handed back by `stop`, after everything polled.
    pub fn with_trailing(mut self, trailing: Vec<Vec<u8>>) -> Self {
        self.trailing = trailing;
        self
    }

    /// Options passed to each `open`, in call order.
    pub fn opened(&self) -> Vec<CaptureOptions> {
        self.opened.borrow().clone()
    }
}

impl CaptureBackend for ScriptedCapture {
    type Stream = ScriptedStream;

    fn open(&self, options: &CaptureOptions) -> Result<ScriptedStream> {
        self.opened.borrow_mut().push(*options);
        if let Some(message) = &self.open_error {
            return Err(anyhow!("{message}"));
        }
        Ok(ScriptedStream {
            pending: self.chunks.clone(),
            trailing: self.trailing.clone(),
        })
    }
}

#[derive(Debug)]
pub struct ScriptedStream {
    pending: Vec<Vec<u8>>,
    trailing: Vec<Vec<u8>>,
}

impl CaptureStream for ScriptedStream {
    fn poll_chunks(&mut self) -> Result<Vec<Vec<u8>>> {
        Ok(std::mem::take(&mut self.pending))
    }

    fn stop(mut self) -> Result<Vec<Vec<u8>>> {
        let mut rest = std::mem::take(&mut self.pending);
        rest.append(&mut self.trailing);
        Ok(rest)
    }
}
