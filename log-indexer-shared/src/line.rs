//! Raw input lines.

/// One line read from a line source, before any trimming or matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based position of the line in its source.
    pub number: u64,
    /// The line text with the line terminator removed.
    pub text: String,
}

impl RawLine {
    /// Create a new raw line.
    pub fn new(number: u64, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    /// The line text with leading and trailing whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}
