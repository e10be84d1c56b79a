//! The accumulated text log and its logical states.

mod log_buffer;

pub use log_buffer::{BufferState, LINE_SEPARATOR, LogBuffer};
