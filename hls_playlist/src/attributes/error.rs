use crate::error::ParseErrorKind;
use crate::logging::codes::{self, Code};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttributeError {
    #[error("Unterminated quoted string in attribute '{name}'")]
    UnterminatedQuote { name: String, line: u32 },

    #[error("Duplicate attribute '{name}'")]
    DuplicateAttribute { name: String, line: u32 },

    #[error("Invalid attribute name '{name}'")]
    InvalidName { name: String, line: u32 },

    #[error("Malformed numeric value '{value}' for attribute '{name}'")]
    MalformedNumber {
        name: String,
        value: String,
        line: u32,
    },

    #[error("Malformed attribute '{text}': expected NAME=VALUE")]
    Malformed { text: String, line: u32 },

    #[error("Invalid hexadecimal sequence '{value}' for attribute '{name}'")]
    InvalidHex {
        name: String,
        value: String,
        line: u32,
    },

    #[error("Too many attributes: more than {limit}")]
    TooManyAttributes { line: u32, limit: usize },

    #[error("Quoted string in attribute '{name}' is {length} bytes long (max {limit})")]
    QuotedStringTooLong {
        name: String,
        length: usize,
        limit: usize,
        line: u32,
    },
}

impl AttributeError {
    pub fn kind(&self) -> ParseErrorKind {
        ParseErrorKind::AttributeSyntaxError
    }

    pub fn line(&self) -> u32 {
        match self {
            AttributeError::UnterminatedQuote { line, .. }
            | AttributeError::DuplicateAttribute { line, .. }
            | AttributeError::InvalidName { line, .. }
            | AttributeError::MalformedNumber { line, .. }
            | AttributeError::Malformed { line, .. }
            | AttributeError::InvalidHex { line, .. }
            | AttributeError::TooManyAttributes { line, .. }
            | AttributeError::QuotedStringTooLong { line, .. } => *line,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            AttributeError::UnterminatedQuote { .. } => codes::attributes::UNTERMINATED_QUOTE,
            AttributeError::DuplicateAttribute { .. } => codes::attributes::DUPLICATE_ATTRIBUTE,
            AttributeError::InvalidName { .. } => codes::attributes::INVALID_ATTRIBUTE_NAME,
            AttributeError::MalformedNumber { .. } => codes::attributes::MALFORMED_NUMBER,
            AttributeError::Malformed { .. } => codes::attributes::MALFORMED_ATTRIBUTE,
            AttributeError::InvalidHex { .. } => codes::attributes::INVALID_HEX_SEQUENCE,
            AttributeError::TooManyAttributes { .. }
            | AttributeError::QuotedStringTooLong { .. } => {
                codes::attributes::ATTRIBUTE_LIMIT_EXCEEDED
            }
        }
    }
}
