//! Capture backend abstraction.
//!
//! The [`CaptureBackend`] trait decouples recording orchestration from the
//! actual screen grabber. [`CommandCapture`] spawns an external command that
//! streams encoded media on stdout; tests use scripted backends that hand
//! out predetermined chunks without spawning processes.

use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, error, info, instrument, warn};
use wait_timeout::ChildExt;

use crate::core::types::CaptureOptions;
use crate::io::config::RecorderConfig;

/// Environment variable telling the capture command whether to grab video.
pub const VIDEO_ENV: &str = "SCREEN_RECORDER_VIDEO";
/// Environment variable telling the capture command whether to grab audio.
pub const AUDIO_ENV: &str = "SCREEN_RECORDER_AUDIO";

/// Something that can open a live capture.
pub trait CaptureBackend {
    type Stream: CaptureStream;

    /// Begin capturing with the requested tracks.
    fn open(&self, options: &CaptureOptions) -> Result<Self::Stream>;
}

/// A live capture delivering media chunks.
pub trait CaptureStream {
    /// Chunks that arrived since the last poll. Never blocks.
    fn poll_chunks(&mut self) -> Result<Vec<Vec<u8>>>;

    /// Stop every track and return the chunks that arrived after the last poll.
    fn stop(self) -> Result<Vec<Vec<u8>>>;
}

/// Backend that spawns a capture command and reads its stdout.
#[derive(Debug, Clone)]
pub struct CommandCapture {
    /// Explicit command line. `None` runs [`ffmpeg_command`] for the
    /// requested tracks.
    pub command: Option<Vec<String>>,
    pub chunk_size_bytes: usize,
    pub stop_timeout: Duration,
}

impl CommandCapture {
    pub fn from_config(cfg: &RecorderConfig) -> Self {
        Self {
            command: cfg.capture.command.clone(),
            chunk_size_bytes: cfg.chunk_size_bytes,
            stop_timeout: cfg.stop_timeout(),
        }
    }

    /// Command line to spawn for `options`.
    pub fn argv(&self, options: &CaptureOptions) -> Vec<String> {
        match &self.command {
            Some(command) => command.clone(),
            None => ffmpeg_command(options),
        }
    }
}

/// `ffmpeg` invocation that grabs the requested tracks and muxes them into a
/// WebM stream on stdout.
///
/// Video comes from the X11 display `:0.0`, audio from the PulseAudio
/// default source. A track that was not requested gets neither an input nor
/// a codec.
pub fn ffmpeg_command(options: &CaptureOptions) -> Vec<String> {
    let mut argv = vec!["ffmpeg", "-loglevel", "error"];
    if options.video {
        argv.extend(["-f", "x11grab", "-i", ":0.0"]);
    }
    if options.audio {
        argv.extend(["-f", "pulse", "-i", "default"]);
    }
    if options.video {
        argv.extend(["-c:v", "libvpx"]);
    }
    if options.audio {
        argv.extend(["-c:a", "libopus"]);
    }
    argv.extend(["-f", "webm", "pipe:1"]);
    argv.into_iter().map(ToString::to_string).collect()
}

impl CaptureBackend for CommandCapture {
    type Stream = CommandStream;

    #[instrument(skip_all, fields(video = options.video, audio = options.audio))]
    fn open(&self, options: &CaptureOptions) -> Result<CommandStream> {
        if !options.requests_any_track() {
            bail!("capture requires at least one of video or audio");
        }
        let argv = self.argv(options);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| anyhow!("capture command is empty"))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .env(VIDEO_ENV, options.video.to_string())
            .env(AUDIO_ENV, options.audio.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        debug!(program = %program, "spawning capture command");
        let mut child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) => {
                error!(err = %e, program = %program, "failed to spawn capture command");
                return Err(e).with_context(|| format!("spawn capture command {program}"));
            }
        };

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("stdout was not piped"))?;
        let (sender, receiver) = mpsc::channel();
        let chunk_size = self.chunk_size_bytes.max(1);
        let reader = thread::spawn(move || forward_chunks(stdout, chunk_size, &sender));

        info!(pid = child.id(), "capture started");
        Ok(CommandStream {
            child,
            receiver,
            reader,
            stop_timeout: self.stop_timeout,
        })
    }
}

/// Live capture backed by a child process.
#[derive(Debug)]
pub struct CommandStream {
    child: Child,
    receiver: Receiver<Vec<u8>>,
    reader: JoinHandle<Result<()>>,
    stop_timeout: Duration,
}

impl CaptureStream for CommandStream {
    fn poll_chunks(&mut self) -> Result<Vec<Vec<u8>>> {
        Ok(self.receiver.try_iter().collect())
    }

    #[instrument(skip_all, fields(pid = self.child.id()))]
    fn stop(mut self) -> Result<Vec<Vec<u8>>> {
        // Closing stdin after `q` asks ffmpeg-style encoders to finalize the container.
        if let Some(mut stdin) = self.child.stdin.take()
            && let Err(e) = stdin.write_all(b"q\n")
        {
            debug!(err = %e, "capture command no longer reads stdin");
        }

        let waited = match self.child.wait_timeout(self.stop_timeout) {
            Ok(waited) => waited,
            Err(e) => {
                error!(err = %e, "waiting for capture command failed, killing");
                self.abandon();
                return Err(e).context("wait for capture command");
            }
        };
        let status = match waited {
            Some(status) => status,
            None => {
                warn!(
                    timeout_secs = self.stop_timeout.as_secs(),
                    "capture command did not stop in time, killing"
                );
                self.child.kill().context("kill capture command")?;
                self.child.wait().context("wait capture command after kill")?
            }
        };
        if !status.success() {
            warn!(exit_code = ?status.code(), "capture command exited unsuccessfully");
        }

        match self.reader.join() {
            Ok(result) => result.context("read capture output")?,
            Err(_) => return Err(anyhow!("capture reader thread panicked")),
        }

        // The reader has exited, so its sender is gone and this drains to the end.
        let trailing: Vec<Vec<u8>> = self.receiver.iter().collect();
        debug!(chunks = trailing.len(), "capture stopped");
        Ok(trailing)
    }
}

impl CommandStream {
    /// Kill the child and reap it along with the reader thread.
    ///
    /// Errors are logged, not returned: the caller is already failing.
    fn abandon(mut self) {
        if let Err(e) = self.child.kill() {
            warn!(err = %e, "kill capture command");
        }
        if let Err(e) = self.child.wait() {
            warn!(err = %e, "reap capture command");
        }
        drop(self.receiver);
        if self.reader.join().is_err() {
            warn!("capture reader thread panicked");
        }
    }
}

fn forward_chunks<R: Read>(mut reader: R, chunk_size: usize, sender: &Sender<Vec<u8>>) -> Result<()> {
    let mut buf = vec![0u8; chunk_size];
    loop {
        let n = reader.read(&mut buf).context("read capture stdout")?;
        if n == 0 {
            return Ok(());
        }
        if sender.send(buf[..n].to_vec()).is_err() {
            // Receiver dropped: nobody wants the rest of the stream.
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_chunks_splits_by_size() {
        let (sender, receiver) = mpsc::channel();
        forward_chunks(&b"abcdefg"[..], 3, &sender).expect("forward");
        drop(sender);
        let chunks: Vec<Vec<u8>> = receiver.iter().collect();
        assert_eq!(chunks.concat(), b"abcdefg");
        assert!(chunks.iter().all(|chunk| chunk.len() <= 3));
    }

    #[test]
    fn open_rejects_no_tracks() {
        let backend = CommandCapture {
            command: Some(vec!["true".to_string()]),
            chunk_size_bytes: 16,
            stop_timeout: Duration::from_secs(1),
        };
        let err = backend
            .open(&CaptureOptions {
                video: false,
                audio: false,
            })
            .unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn open_reports_missing_program() {
        let backend = CommandCapture {
            command: Some(vec!["screen-recorder-no-such-program".to_string()]),
            chunk_size_bytes: 16,
            stop_timeout: Duration::from_secs(1),
        };
        let err = backend.open(&CaptureOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("spawn capture command"));
    }

    #[cfg(unix)]
    #[test]
    fn command_stream_collects_stdout() {
        let backend = CommandCapture {
            command: Some(vec![
                "sh".to_string(),
                "-c".to_string(),
                "printf 'media:%s:%s' \"$SCREEN_RECORDER_VIDEO\" \"$SCREEN_RECORDER_AUDIO\""
                    .to_string(),
            ]),
            chunk_size_bytes: 4,
            stop_timeout: Duration::from_secs(5),
        };
        let mut stream = backend
            .open(&CaptureOptions {
                video: true,
                audio: false,
            })
            .expect("open");
        let mut chunks = stream.poll_chunks().expect("poll");
        chunks.extend(stream.stop().expect("stop"));
        assert_eq!(chunks.concat(), b"media:true:false");
    }

    #[cfg(unix)]
    #[test]
    fn stop_kills_command_that_ignores_stdin() {
        let backend = CommandCapture {
            command: Some(vec!["sleep".to_string(), "30".to_string()]),
            chunk_size_bytes: 16,
            stop_timeout: Duration::from_millis(200),
        };
        let stream = backend.open(&CaptureOptions::default()).expect("open");
        let trailing = stream.stop().expect("stop");
        assert!(trailing.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn abandon_kills_command_and_joins_reader() {
        let backend = CommandCapture {
            command: Some(vec!["sleep".to_string(), "30".to_string()]),
            chunk_size_bytes: 16,
            stop_timeout: Duration::from_secs(30),
        };
        let stream = backend.open(&CaptureOptions::default()).expect("open");
        let started = std::time::Instant::now();
        stream.abandon();
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    fn ffmpeg_inputs(options: CaptureOptions) -> Vec<String> {
        let argv = ffmpeg_command(&options);
        argv.windows(2)
            .filter(|pair| pair[0] == "-f")
            .map(|pair| pair[1].clone())
            .collect()
    }

    #[test]
    fn ffmpeg_command_grabs_screen_and_audio_by_default() {
        let argv = ffmpeg_command(&CaptureOptions::default());
        assert_eq!(ffmpeg_inputs(CaptureOptions::default()), ["x11grab", "pulse", "webm"]);
        assert!(argv.iter().any(|arg| arg == "-c:v"));
        assert!(argv.iter().any(|arg| arg == "-c:a"));
        assert_eq!(argv.last().map(String::as_str), Some("pipe:1"));
    }

    #[test]
    fn ffmpeg_command_without_audio_has_no_audio_input() {
        let options = CaptureOptions {
            video: true,
            audio: false,
        };
        assert_eq!(ffmpeg_inputs(options), ["x11grab", "webm"]);
        assert!(!ffmpeg_command(&options).iter().any(|arg| arg == "-c:a"));
    }

    #[test]
    fn ffmpeg_command_without_video_skips_screen_grab() {
        let options = CaptureOptions {
            video: false,
            audio: true,
        };
        assert_eq!(ffmpeg_inputs(options), ["pulse", "webm"]);
        assert!(!ffmpeg_command(&options).iter().any(|arg| arg == "-c:v"));
    }

    #[test]
    fn configured_command_overrides_ffmpeg() {
        let mut backend = CommandCapture::from_config(&RecorderConfig::default());
        assert_eq!(backend.argv(&CaptureOptions::default())[0], "ffmpeg");

        backend.command = Some(vec!["my-grabber".to_string(), "--fast".to_string()]);
        let options = CaptureOptions {
            video: false,
            audio: true,
        };
        assert_eq!(backend.argv(&options), ["my-grabber", "--fast"]);
    }
}
