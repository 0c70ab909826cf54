use crate::error::ParseErrorKind;
use crate::logging::codes::{self, Code};

/// Fatal findings; anything tolerable becomes a warning on the document
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Media playlist has no #EXT-X-TARGETDURATION")]
    MissingTargetDuration,

    #[error("Segment {index} has media sequence {found}, expected {expected}")]
    NonContiguousSequence {
        index: usize,
        expected: u64,
        found: u64,
        line: Option<u32>,
    },

    #[error("Segment {sequence} has discontinuity sequence {found}, expected {expected}")]
    DiscontinuityMismatch {
        sequence: u64,
        expected: u64,
        found: u64,
        line: Option<u32>,
    },

    #[error("Segment {index} has a sequence number past 2^64-1")]
    SequenceOverflow { index: usize, line: Option<u32> },
}

impl ValidationError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ValidationError::MissingTargetDuration => ParseErrorKind::MissingRequiredAttribute,
            ValidationError::NonContiguousSequence { .. }
            | ValidationError::DiscontinuityMismatch { .. }
            | ValidationError::SequenceOverflow { .. } => ParseErrorKind::MalformedLine,
        }
    }

    /// URI line of the offending segment, when the caller supplied it
    pub fn line(&self) -> Option<u32> {
        match self {
            ValidationError::MissingTargetDuration => None,
            ValidationError::NonContiguousSequence { line, .. }
            | ValidationError::DiscontinuityMismatch { line, .. }
            | ValidationError::SequenceOverflow { line, .. } => *line,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            ValidationError::MissingTargetDuration => codes::validation::MISSING_TARGET_DURATION,
            ValidationError::NonContiguousSequence { .. } => {
                codes::validation::NON_CONTIGUOUS_SEQUENCE
            }
            ValidationError::DiscontinuityMismatch { .. } => codes::validation::DISCONTINUITY_MISMATCH,
            ValidationError::SequenceOverflow { .. } => codes::validation::SEQUENCE_OVERFLOW,
        }
    }
}
