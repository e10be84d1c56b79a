//! Interactive logging session.

mod repl;

pub use repl::{SessionCommand, SessionRepl, stamp_line};
