//! Interactive logging session
//!
//! Every input line is emitted to the log; a [`LogView`] attached to the
//! same logger echoes the buffer as it changes. Lines starting with `:` are
//! session commands.

use crate::output::console::{ConsoleFormatter, LineStyle};
use crate::view::LogView;
use chrono::{DateTime, Local};
use outlog_application::Logger;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

/// Commands understood inside a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Clear,
    Show,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl SessionCommand {
    /// Parse a `:command` line; `None` if the line is ordinary log text.
    ///
    /// A leading `::` escapes the colon, so `::x` is logged as `:x`.
    pub fn parse(input: &str) -> Option<Self> {
        let rest = input.strip_prefix(':')?;
        if rest.starts_with(':') {
            return None;
        }
        let command = match rest.trim() {
            "clear" | "c" => SessionCommand::Clear,
            "show" | "s" => SessionCommand::Show,
            "status" => SessionCommand::Status,
            "help" | "h" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            other => SessionCommand::Unknown(other.to_string()),
        };
        Some(command)
    }
}

/// Prefix a line with a `[HH:MM:SS]` stamp
pub fn stamp_line(line: &str, at: DateTime<Local>) -> String {
    format!("[{}] {}", at.format("%H:%M:%S"), line)
}

/// Interactive session REPL
pub struct SessionRepl {
    logger: Logger,
    style: LineStyle,
    timestamps: bool,
}

impl SessionRepl {
    /// Create a new SessionRepl
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            style: LineStyle::default(),
            timestamps: false,
        }
    }

    /// Set line decoration for the echoed log
    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    /// Set whether emitted lines get a time stamp
    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Run the interactive REPL
    pub fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = Self::history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        let (view, _subscription) = LogView::stdout(self.logger.clone())
            .with_style(self.style)
            .attach();

        self.print_welcome();
        view.render_all();

        loop {
            match rl.readline("log> ") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line.as_str());
                    if !self.handle_input(&line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Process one input line. Returns false when the session should end.
    pub fn handle_input(&self, input: &str) -> bool {
        match SessionCommand::parse(input) {
            Some(command) => self.handle_command(command),
            None => {
                let text = input.strip_prefix(':').unwrap_or(input);
                if self.timestamps {
                    self.logger.emit(&stamp_line(text, Local::now()));
                } else {
                    self.logger.emit(text);
                }
                true
            }
        }
    }

    fn handle_command(&self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Quit => {
                println!("Bye!");
                false
            }
            SessionCommand::Clear => {
                self.logger.clear();
                true
            }
            SessionCommand::Show => {
                print!(
                    "{}",
                    ConsoleFormatter::format_plain(&self.logger.buffer(), self.style)
                );
                true
            }
            SessionCommand::Status => {
                println!(
                    "{} (signal '{}', {})",
                    ConsoleFormatter::format_summary(
                        self.logger.storage_key(),
                        &self.logger.buffer()
                    ),
                    self.logger.signal_name(),
                    self.logger.store_description()
                );
                true
            }
            SessionCommand::Help => {
                self.print_help();
                true
            }
            SessionCommand::Unknown(cmd) => {
                println!("Unknown command: :{}", cmd);
                println!("Type :help for available commands");
                true
            }
        }
    }

    fn history_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("outlog").join("history.txt"))
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", ConsoleFormatter::header("outlog - Session", self.style.color));
        println!();
        println!(
            "Writing to '{}' ({})",
            self.logger.storage_key(),
            self.logger.store_description()
        );
        self.print_help();
    }

    fn print_help(&self) {
        println!();
        println!("Every line you type is appended to the log.");
        println!("Commands:");
        println!("  :clear, :c        - Clear the log");
        println!("  :show, :s         - Print the whole log");
        println!("  :status           - Show key, line count and store");
        println!("  :help, :h, :?     - Show this help");
        println!("  :quit, :exit, :q  - End the session");
        println!("  ::text            - Log a line starting with ':'");
        println!();
    }
}
