//! Line-oriented output buffer with an indentation stack.

/// Accumulates disassembly text line by line.
///
/// The writer keeps a prefix of spaces that grows and shrinks with
/// `indent` / `unindent`; raw appends bypass the prefix so emitters can mix
/// whole lines with partial writes. Trailing line breaks are trimmed when
/// the buffer is serialized.
pub struct IndentedWriter {
    buffer: String,
    prefix: String,
    width: usize,
}

impl IndentedWriter {
    /// Create a writer whose indentation steps are `width` spaces wide
    #[must_use]
    pub fn new(width: usize) -> Self {
        IndentedWriter {
            buffer: String::new(),
            prefix: String::new(),
            width,
        }
    }

    /// Push one indentation level
    pub fn indent(&mut self) {
        for _ in 0..self.width {
            self.prefix.push(' ');
        }
    }

    /// Pop one indentation level
    pub fn unindent(&mut self) {
        let len = self.prefix.len().saturating_sub(self.width);
        self.prefix.truncate(len);
    }

    /// Write prefix, `text` and a line break
    pub fn append_line(&mut self, text: &str) {
        self.buffer.push_str(&self.prefix);
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    /// Write `text` verbatim, no prefix, no line break
    pub fn append(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Write the current prefix without a line break
    pub fn append_indent(&mut self) {
        self.buffer.push_str(&self.prefix);
    }

    /// Serialize the buffer, trimming trailing CR/LF
    #[must_use]
    pub fn into_string(self) -> String {
        let trimmed = self.buffer.trim_end_matches(['\r', '\n']).len();
        let mut buffer = self.buffer;
        buffer.truncate(trimmed);
        buffer
    }
}
