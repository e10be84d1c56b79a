//! Live views that follow the log as it changes.

mod log_view;

pub use log_view::LogView;
