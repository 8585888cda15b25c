//! Stable exit codes for `screen-recorder` commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid arguments, config, or an I/O error.
pub const INVALID: i32 = 1;
/// `screen-recorder record` could not open the capture.
pub const START_FAILED: i32 = 2;
