//! Source location tracking for playlist text
//!
//! Playlists are line oriented, so spans almost always cover one physical
//! line. Columns are 1-based character counts, offsets are byte offsets.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// First column of the given line
    pub fn line_start(offset: usize, line: u32) -> Self {
        Self::new(offset, line, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start (inclusive) to end (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Span covering `text`, which begins at byte `offset` on line `line`
    pub fn for_line(offset: usize, line: u32, text: &str) -> Self {
        let columns = text.chars().count() as u32;
        Self {
            start: Position::line_start(offset, line),
            end: Position::new(offset + text.len(), line, columns + 1),
        }
    }

    /// Span with no width pointing at the start of a line
    pub fn at_line(line: u32) -> Self {
        let pos = Position::line_start(0, line);
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn line(&self) -> u32 {
        self.start.line
    }

    /// Byte length of this span
    pub fn byte_len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    /// Source text for this span
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start.offset..self.end.offset]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Line index over playlist text, used to quote the offending line of a failed parse
#[derive(Debug, Clone)]
pub struct SourceMap {
    pub source: String,
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: String) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|&(_, ch)| ch == '\n')
                .map(|(offset, _)| offset + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Text of a line by number (1-based), without its line terminator
    pub fn get_line(&self, line_num: u32) -> Option<&str> {
        let idx = (line_num as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Format a diagnostic that quotes and underlines the offending line
    pub fn format_error(&self, line_num: u32, message: &str) -> String {
        let mut result = format!("error: {}\n  --> line {}\n", message, line_num);

        if let Some(line) = self.get_line(line_num) {
            let number = line_num.to_string();
            let padding = " ".repeat(number.len());
            let width = line.trim_end().chars().count().max(1);

            result.push_str(&format!("   {} |\n", padding));
            result.push_str(&format!("{} | {}\n", number, line));
            result.push_str(&format!("   {} | {}\n", padding, "^".repeat(width)));
        }

        result
    }
}
