//! Output formatting for the log buffer.

pub mod console;
