//! Live console view of the log.
//!
//! [`LogView`] listens for change signals, re-reads the buffer from the
//! logger and writes whatever was appended since its last render, so the
//! output always ends at the newest line. When the log was cleared since
//! the last render the view prints a marker and starts over.

use crate::output::console::{ConsoleFormatter, LineStyle};
use outlog_application::{BufferSnapshot, ChangeListener, Logger, Subscription};
use outlog_domain::ChangeSignal;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Rendered {
    bytes: usize,
    lines: usize,
    generation: u64,
}

impl Rendered {
    fn of(snapshot: &BufferSnapshot) -> Self {
        Self {
            bytes: snapshot.buffer.len(),
            lines: snapshot.buffer.line_count(),
            generation: snapshot.generation,
        }
    }
}

struct ViewState {
    writer: Box<dyn Write + Send>,
    rendered: Rendered,
}

/// Presentation collaborator that renders the log on every change.
pub struct LogView {
    logger: Logger,
    style: LineStyle,
    state: Mutex<ViewState>,
}

impl LogView {
    /// Create a view over `logger` writing to `writer`.
    ///
    /// The view starts at the current end of the buffer; call
    /// [`render_all`](Self::render_all) to print existing content first.
    pub fn new(logger: Logger, writer: impl Write + Send + 'static) -> Self {
        let rendered = match logger.try_snapshot() {
            Ok(snapshot) => Rendered::of(&snapshot),
            Err(_) => Rendered {
                generation: logger.generation(),
                ..Rendered::default()
            },
        };
        Self {
            logger,
            style: LineStyle::default(),
            state: Mutex::new(ViewState {
                writer: Box::new(writer),
                rendered,
            }),
        }
    }

    /// View writing to standard output.
    pub fn stdout(logger: Logger) -> Self {
        Self::new(logger, std::io::stdout())
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    /// Register the view with its logger.
    pub fn attach(self) -> (Arc<Self>, Subscription) {
        let view = Arc::new(self);
        let subscription = view.logger.subscribe_shared(view.clone());
        (view, subscription)
    }

    /// Print the whole buffer from the top.
    pub fn render_all(&self) {
        let mut state = self.lock();
        self.render_locked(&mut state, true);
    }

    /// Print what changed since the last render.
    pub fn render(&self) {
        let mut state = self.lock();
        self.render_locked(&mut state, false);
    }

    fn render_locked(&self, state: &mut ViewState, from_top: bool) {
        // Keep the last render when the store cannot be read.
        let snapshot = match self.logger.try_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Log view could not read the log: {}", e);
                return;
            }
        };
        let buffer = &snapshot.buffer;
        let previous = state.rendered;
        let mut output = String::new();

        let continued = if from_top || snapshot.generation != previous.generation {
            None
        } else {
            buffer.tail_since(previous.bytes)
        };
        let (tail, first_line) = match continued {
            Some(tail) => (tail, previous.lines + 1),
            None => {
                if !from_top && previous.bytes > 0 {
                    output.push_str(&ConsoleFormatter::cleared_marker(self.style.color));
                }
                (buffer.as_str(), 1)
            }
        };

        output.push_str(&ConsoleFormatter::format_lines(tail, first_line, self.style));
        state.rendered = Rendered::of(&snapshot);

        if output.is_empty() {
            return;
        }
        let result = state
            .writer
            .write_all(output.as_bytes())
            .and_then(|_| state.writer.flush());
        if let Err(e) = result {
            warn!("Log view write failed: {}", e);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChangeListener for LogView {
    fn on_change(&self, _signal: ChangeSignal) {
        self.render();
    }
}
