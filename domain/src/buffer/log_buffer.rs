//! LogBuffer value object

use serde::{Deserialize, Serialize};

/// Separator written after every emitted line
pub const LINE_SEPARATOR: char = '\n';

/// Logical state of a [`LogBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferState {
    Empty,
    NonEmpty,
}

impl BufferState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BufferState::Empty => "empty",
            BufferState::NonEmpty => "non_empty",
        }
    }
}

impl std::fmt::Display for BufferState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single accumulated text log (Value Object)
///
/// Stored as one string in which every line is followed by
/// [`LINE_SEPARATOR`]. Lines are only ever appended; the only way to
/// remove content is [`LogBuffer::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogBuffer {
    text: String,
}

impl LogBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a buffer from the raw stored representation
    ///
    /// Stored text is taken verbatim, even if another writer left it
    /// without a trailing separator.
    pub fn from_stored(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Rebuild a buffer from an optional stored value; absent reads as empty
    pub fn from_optional(text: Option<String>) -> Self {
        text.map(Self::from_stored).unwrap_or_default()
    }

    /// Append `line` followed by the separator
    pub fn append_line(&mut self, line: &str) {
        self.text.reserve(line.len() + 1);
        self.text.push_str(line);
        self.text.push(LINE_SEPARATOR);
    }

    /// Reset to the empty string
    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length of the stored text in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn state(&self) -> BufferState {
        if self.is_empty() {
            BufferState::Empty
        } else {
            BufferState::NonEmpty
        }
    }

    /// Iterate over the emitted lines, without separators
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    /// Text appended since a previous snapshot of `previous_len` bytes
    ///
    /// Returns `None` when the buffer is shorter than the snapshot (it was
    /// cleared in between) or the offset is not a char boundary.
    pub fn tail_since(&self, previous_len: usize) -> Option<&str> {
        self.text.get(previous_len..)
    }
}

impl std::fmt::Display for LogBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<LogBuffer> for String {
    fn from(buffer: LogBuffer) -> Self {
        buffer.text
    }
}
