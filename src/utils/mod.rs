//! Utility functions and helpers
//!
//! Timestamp parsing/formatting and atomic file replacement.

pub mod atomic;
pub mod time;

pub use atomic::{atomic_write, atomic_write_with, cleanup_temp_files, AtomicError, AtomicResult};
pub use time::{format_timestamp, millis_between, now_utc, parse_timestamp};
