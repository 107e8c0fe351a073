//! Shared utilities: logging setup and time handling.

pub mod logger;
pub mod time;
