//! Console output formatter for the log buffer

use chrono::{DateTime, Utc};
use colored::Colorize;
use outlog_domain::{BufferState, LogBuffer, SignalName, StorageKey};
use serde::Serialize;

/// Line decoration options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStyle {
    /// Prefix each line with its 1-based number
    pub numbered: bool,
    /// Use terminal colors
    pub color: bool,
}

impl LineStyle {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn with_numbers(mut self, numbered: bool) -> Self {
        self.numbered = numbered;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Point-in-time JSON view of a log
#[derive(Debug, Clone, Serialize)]
pub struct LogSnapshot {
    pub key: String,
    pub signal: String,
    pub state: BufferState,
    pub line_count: usize,
    pub lines: Vec<String>,
    pub text: String,
    pub captured_at: DateTime<Utc>,
}

impl LogSnapshot {
    pub fn capture(key: &StorageKey, signal: &SignalName, buffer: &LogBuffer) -> Self {
        Self::capture_at(key, signal, buffer, Utc::now())
    }

    pub fn capture_at(
        key: &StorageKey,
        signal: &SignalName,
        buffer: &LogBuffer,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.to_string(),
            signal: signal.to_string(),
            state: buffer.state(),
            line_count: buffer.line_count(),
            lines: buffer.lines().map(str::to_string).collect(),
            text: buffer.as_str().to_string(),
            captured_at,
        }
    }
}

/// Formats log content for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the whole buffer
    ///
    /// Without numbering the text is returned exactly as stored.
    pub fn format_plain(buffer: &LogBuffer, style: LineStyle) -> String {
        if !style.numbered {
            return buffer.as_str().to_string();
        }
        Self::format_lines(buffer.as_str(), 1, style)
    }

    /// Format a run of separator-terminated lines, numbering from `first_number`
    pub fn format_lines(text: &str, first_number: usize, style: LineStyle) -> String {
        if !style.numbered {
            return text.to_string();
        }
        let mut output = String::with_capacity(text.len());
        for (offset, line) in text.lines().enumerate() {
            let number = format!("{:>5} ", first_number + offset);
            if style.color {
                output.push_str(&number.dimmed().to_string());
            } else {
                output.push_str(&number);
            }
            output.push_str(line);
            output.push('\n');
        }
        output
    }

    /// Format as JSON
    pub fn format_json(snapshot: &LogSnapshot) -> String {
        serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".to_string())
    }

    /// One-line summary, e.g. `wasm_output: 3 lines`
    pub fn format_summary(key: &StorageKey, buffer: &LogBuffer) -> String {
        match buffer.state() {
            BufferState::Empty => format!("{}: empty", key),
            BufferState::NonEmpty => {
                let count = buffer.line_count();
                let noun = if count == 1 { "line" } else { "lines" };
                format!("{}: {} {}", key, count, noun)
            }
        }
    }

    /// Marker written by live views when the log is cleared
    pub fn cleared_marker(color: bool) -> String {
        let marker = "── log cleared ──";
        if color {
            format!("{}\n", marker.yellow().bold())
        } else {
            format!("{}\n", marker)
        }
    }

    /// Section header
    pub fn header(title: &str, color: bool) -> String {
        let line = "=".repeat(48);
        if color {
            format!("{}\n{:^48}\n{}", line.cyan(), title.bold(), line.cyan())
        } else {
            format!("{}\n{:^48}\n{}", line, title, line)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn buffer(lines: &[&str]) -> LogBuffer {
        let mut buffer = LogBuffer::new();
        for line in lines {
            buffer.append_line(line);
        }
        buffer
    }

    #[test]
    fn test_plain_is_verbatim() {
        let b = buffer(&["a", "b"]);
        assert_eq!(ConsoleFormatter::format_plain(&b, LineStyle::plain()), "a\nb\n");
    }

    #[test]
    fn test_numbered_lines() {
        let b = buffer(&["a", "b"]);
        let style = LineStyle::plain().with_numbers(true);
        assert_eq!(
            ConsoleFormatter::format_plain(&b, style),
            "    1 a\n    2 b\n"
        );
        assert_eq!(
            ConsoleFormatter::format_lines("c\n", 3, style),
            "    3 c\n"
        );
    }

    #[test]
    fn test_numbered_empty_buffer() {
        let style = LineStyle::plain().with_numbers(true);
        assert_eq!(ConsoleFormatter::format_plain(&LogBuffer::new(), style), "");
    }

    #[test]
    fn test_summary() {
        let key = StorageKey::default();
        assert_eq!(
            ConsoleFormatter::format_summary(&key, &LogBuffer::new()),
            "wasm_output: empty"
        );
        assert_eq!(
            ConsoleFormatter::format_summary(&key, &buffer(&["x"])),
            "wasm_output: 1 line"
        );
        assert_eq!(
            ConsoleFormatter::format_summary(&key, &buffer(&["x", "y"])),
            "wasm_output: 2 lines"
        );
    }

    #[test]
    fn test_json_snapshot() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let snapshot = LogSnapshot::capture_at(
            &StorageKey::default(),
            &SignalName::default(),
            &buffer(&["a", "b"]),
            at,
        );
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&snapshot)).unwrap();
        assert_eq!(value["key"], "wasm_output");
        assert_eq!(value["signal"], "wasm_out_changed");
        assert_eq!(value["state"], "non_empty");
        assert_eq!(value["line_count"], 2);
        assert_eq!(value["lines"][1], "b");
        assert_eq!(value["text"], "a\nb\n");
        assert_eq!(value["captured_at"], "2026-01-02T03:04:05Z");
    }

    #[test]
    fn test_cleared_marker_plain() {
        assert_eq!(ConsoleFormatter::cleared_marker(false), "── log cleared ──\n");
    }
}
