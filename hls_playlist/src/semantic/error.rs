use crate::attributes::AttributeError;
use crate::error::ParseErrorKind;
use crate::logging::codes::{self, Code};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SemanticError {
    #[error("Invalid duration '{value}' in {tag}")]
    InvalidDuration { tag: String, value: String, line: u32 },

    #[error("Invalid date-time '{value}'")]
    InvalidTimestamp { value: String, line: u32 },

    #[error("Unknown value '{value}' for {attribute} in {tag}")]
    UnknownEnumValue {
        tag: String,
        attribute: String,
        value: String,
        line: u32,
    },

    #[error("{tag} requires attribute {attribute}")]
    MissingRequiredAttribute {
        tag: String,
        attribute: String,
        line: u32,
    },

    #[error("{tag} requires a value")]
    MissingValue { tag: String, line: u32 },

    #[error("Unexpected value '{value}' for {tag}")]
    UnexpectedValue { tag: String, value: String, line: u32 },

    #[error("Invalid integer '{value}' in {tag}")]
    InvalidInteger { tag: String, value: String, line: u32 },

    #[error("{attribute} in {tag} must be a {expected}, found {found}")]
    WrongAttributeType {
        tag: String,
        attribute: String,
        expected: &'static str,
        found: String,
        line: u32,
    },

    #[error("Conflicting attributes in {tag}: {message}")]
    ConflictingAttributes {
        tag: String,
        message: String,
        line: u32,
    },

    #[error(transparent)]
    Attribute(#[from] AttributeError),
}

impl SemanticError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            SemanticError::InvalidDuration { .. } => ParseErrorKind::InvalidDuration,
            SemanticError::InvalidTimestamp { .. } => ParseErrorKind::InvalidTimestamp,
            SemanticError::UnknownEnumValue { .. } => ParseErrorKind::UnknownEnumValue,
            SemanticError::MissingRequiredAttribute { .. } => {
                ParseErrorKind::MissingRequiredAttribute
            }
            SemanticError::MissingValue { .. } | SemanticError::UnexpectedValue { .. } => {
                ParseErrorKind::MalformedLine
            }
            SemanticError::InvalidInteger { .. }
            | SemanticError::WrongAttributeType { .. }
            | SemanticError::ConflictingAttributes { .. } => ParseErrorKind::AttributeSyntaxError,
            SemanticError::Attribute(e) => e.kind(),
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            SemanticError::InvalidDuration { line, .. }
            | SemanticError::InvalidTimestamp { line, .. }
            | SemanticError::UnknownEnumValue { line, .. }
            | SemanticError::MissingRequiredAttribute { line, .. }
            | SemanticError::MissingValue { line, .. }
            | SemanticError::UnexpectedValue { line, .. }
            | SemanticError::InvalidInteger { line, .. }
            | SemanticError::WrongAttributeType { line, .. }
            | SemanticError::ConflictingAttributes { line, .. } => *line,
            SemanticError::Attribute(e) => e.line(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            SemanticError::InvalidDuration { .. } => codes::semantic::INVALID_DURATION,
            SemanticError::InvalidTimestamp { .. } => codes::semantic::INVALID_TIMESTAMP,
            SemanticError::UnknownEnumValue { .. } => codes::semantic::UNKNOWN_ENUM_VALUE,
            SemanticError::MissingRequiredAttribute { .. } => {
                codes::semantic::MISSING_REQUIRED_ATTRIBUTE
            }
            SemanticError::MissingValue { .. } => codes::semantic::MISSING_TAG_VALUE,
            SemanticError::UnexpectedValue { .. } => codes::semantic::UNEXPECTED_TAG_VALUE,
            SemanticError::InvalidInteger { .. } => codes::semantic::INVALID_INTEGER,
            SemanticError::WrongAttributeType { .. } => codes::semantic::WRONG_ATTRIBUTE_TYPE,
            SemanticError::ConflictingAttributes { .. } => codes::semantic::CONFLICTING_ATTRIBUTES,
            SemanticError::Attribute(e) => e.error_code(),
        }
    }
}
