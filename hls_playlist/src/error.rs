//! Failure classes shared by every parsing stage

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a fatal parse failure.
///
/// Each stage has its own error enum with richer detail; all of them map
/// onto exactly one of these kinds through their `kind()` method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseErrorKind {
    MalformedLine,
    AttributeSyntaxError,
    InvalidDuration,
    InvalidTimestamp,
    UnknownEnumValue,
    DanglingSegmentTags,
    ContentAfterEndList,
    MissingRequiredAttribute,
}

impl ParseErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ParseErrorKind::MalformedLine => "MalformedLine",
            ParseErrorKind::AttributeSyntaxError => "AttributeSyntaxError",
            ParseErrorKind::InvalidDuration => "InvalidDuration",
            ParseErrorKind::InvalidTimestamp => "InvalidTimestamp",
            ParseErrorKind::UnknownEnumValue => "UnknownEnumValue",
            ParseErrorKind::DanglingSegmentTags => "DanglingSegmentTags",
            ParseErrorKind::ContentAfterEndList => "ContentAfterEndList",
            ParseErrorKind::MissingRequiredAttribute => "MissingRequiredAttribute",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
