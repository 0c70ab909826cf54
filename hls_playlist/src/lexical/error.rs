use crate::error::ParseErrorKind;
use crate::logging::codes::{self, Code};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Line 1 must be exactly #EXTM3U, found '{found}'")]
    MissingHeader { found: String },

    #[error("Line {line} is {length} bytes long (max {limit})")]
    LineTooLong {
        line: u32,
        length: usize,
        limit: usize,
    },

    #[error("Playlist exceeds {limit} lines")]
    TooManyLines { line: u32, limit: usize },
}

impl LexerError {
    pub fn kind(&self) -> ParseErrorKind {
        ParseErrorKind::MalformedLine
    }

    pub fn line(&self) -> u32 {
        match self {
            LexerError::MissingHeader { .. } => 1,
            LexerError::LineTooLong { line, .. } | LexerError::TooManyLines { line, .. } => *line,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            LexerError::MissingHeader { .. } => codes::lexical::MISSING_HEADER,
            LexerError::LineTooLong { .. } => codes::lexical::LINE_TOO_LONG,
            LexerError::TooManyLines { .. } => codes::lexical::TOO_MANY_LINES,
        }
    }
}
