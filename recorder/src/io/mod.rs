//! I/O helpers for recorder commands.

pub mod capture;
pub mod config;
pub mod download;
