//! Presentation layer for outlog
//!
//! This crate contains CLI definitions, output formatters, the live log
//! view, and the interactive session.

pub mod cli;
pub mod output;
pub mod session;
pub mod view;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::console::{ConsoleFormatter, LineStyle, LogSnapshot};
pub use session::{SessionCommand, SessionRepl};
pub use view::LogView;
