//! Screen recording toggle CLI.
//!
//! `screen-recorder record` starts a capture, waits for Enter (or a fixed
//! duration), then writes the recording into the configured output
//! directory. `ccc` and `button` expose the class-name resolver and the
//! toggle button markup for scripting.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use screen_recorder::core::button::ButtonView;
use screen_recorder::core::class_names::resolve;
use screen_recorder::core::token::Token;
use screen_recorder::exit_codes;
use screen_recorder::io::capture::CommandCapture;
use screen_recorder::io::config::{
    DEFAULT_CONFIG_PATH, RecorderConfig, load_config, write_config,
};
use screen_recorder::logging;
use screen_recorder::recorder::ScreenRecorder;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(
    name = "screen-recorder",
    version,
    about = "Screen recording toggle and conditional class-name utilities"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve tokens into a class string. Arguments that parse as JSON are
    /// used as JSON values; anything else is plain text.
    Ccc {
        tokens: Vec<String>,
    },
    /// Print the toggle button markup.
    Button {
        /// Render the button as it looks while recording.
        #[arg(long)]
        recording: bool,
    },
    /// Record until Enter is pressed (or for a fixed duration) and save the file.
    Record {
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Stop automatically after this many seconds.
        #[arg(long)]
        duration_secs: Option<u64>,
    },
    /// Write a default config file.
    InitConfig {
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Ccc { tokens } => cmd_ccc(&tokens),
        Command::Button { recording } => cmd_button(recording),
        Command::Record {
            config,
            duration_secs,
        } => cmd_record(&config, duration_secs.map(Duration::from_secs)),
        Command::InitConfig { path, force } => cmd_init_config(&path, force),
    }
}

fn cmd_ccc(args: &[String]) -> Result<i32> {
    let tokens: Vec<Token> = args.iter().map(|arg| parse_token(arg)).collect();
    println!("{}", resolve(&tokens));
    Ok(exit_codes::OK)
}

fn cmd_button(recording: bool) -> Result<i32> {
    println!("{}", ButtonView::for_state(recording).to_html()?);
    Ok(exit_codes::OK)
}

fn cmd_record(config_path: &Path, duration: Option<Duration>) -> Result<i32> {
    let cfg = load_config(config_path)?;
    let mut recorder = ScreenRecorder::from_config(CommandCapture::from_config(&cfg), &cfg);

    if !recorder.start_recording() {
        eprintln!("could not start recording");
        return Ok(exit_codes::START_FAILED);
    }

    match duration {
        Some(duration) => {
            let deadline = Instant::now() + duration;
            while Instant::now() < deadline {
                recorder.poll()?;
                thread::sleep(POLL_INTERVAL.min(deadline.saturating_duration_since(Instant::now())));
            }
        }
        None => {
            eprintln!("recording, press Enter to stop");
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("read stdin")?;
        }
    }

    let path = recorder.stop_recording()?;
    println!("{}", path.display());
    Ok(exit_codes::OK)
}

fn cmd_init_config(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    write_config(path, &RecorderConfig::default())?;
    debug!(path = %path.display(), "wrote default config");
    Ok(exit_codes::OK)
}

/// JSON when the argument parses as JSON, otherwise the literal text.
fn parse_token(arg: &str) -> Token {
    serde_json::from_str(arg).unwrap_or_else(|_| Token::from(arg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ccc() {
        let cli = Cli::parse_from(["screen-recorder", "ccc", "a", "{\"b\":true}"]);
        assert!(matches!(cli.command, Command::Ccc { tokens } if tokens.len() == 2));
    }

    #[test]
    fn parse_record_defaults() {
        let cli = Cli::parse_from(["screen-recorder", "record"]);
        match cli.command {
            Command::Record {
                config,
                duration_secs,
            } => {
                assert_eq!(config, PathBuf::from(DEFAULT_CONFIG_PATH));
                assert_eq!(duration_secs, None);
            }
            _ => panic!("expected record"),
        }
    }

    #[test]
    fn parse_token_prefers_json() {
        assert_eq!(parse_token("0"), Token::Number(0.0));
        assert_eq!(parse_token("null"), Token::Absent);
        assert_eq!(parse_token("plain"), Token::Text("plain".to_string()));
        assert_eq!(parse_token("\"quoted\""), Token::Text("quoted".to_string()));
    }
}
