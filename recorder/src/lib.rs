//! Screen recording toggle and conditional class-name utilities.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (class-name resolution,
//!   composition helpers, the recording session state machine, the button
//!   view model). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (capture processes, config files,
//!   downloads). Isolated behind traits to enable fakes in tests.
//!
//! [`recorder`] coordinates core logic with I/O to implement the toggle.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod recorder;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::class_names::resolve;
pub use crate::core::token::Token;
