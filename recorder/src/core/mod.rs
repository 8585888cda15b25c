//! Deterministic, pure logic shared by the recorder.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod button;
pub mod class_names;
pub mod compose;
pub mod session;
pub mod token;
pub mod types;
