//! Diagnostic tracing for the recorder.
//!
//! Logs go to stderr so that `screen-recorder` output on stdout (class
//! strings, button markup, recording paths) stays machine-readable.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVES: &str = "warn,screen_recorder=info";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. If unset, the recorder's own `info` events (capture
/// started, recording saved) are shown and everything else is held to `warn`.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=screen_recorder=debug screen-recorder record
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
