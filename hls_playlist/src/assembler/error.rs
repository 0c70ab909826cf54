use crate::error::ParseErrorKind;
use crate::logging::codes::{self, Code};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssemblyError {
    #[error("Malformed playlist structure: {message}")]
    MalformedStructure { message: String, line: u32 },

    #[error("Segment tags starting at line {line} are not followed by a URI")]
    DanglingSegmentTags { line: u32 },

    #[error("#EXT-X-STREAM-INF at line {line} is not followed by a URI")]
    DanglingStreamInf { line: u32 },

    #[error("Content after #EXT-X-ENDLIST")]
    ContentAfterEndList { line: u32 },

    #[error("Segment '{uri}' has no #EXTINF duration")]
    MissingSegmentDuration { uri: String, line: u32 },

    #[error("Byte range for '{uri}' has no offset and does not continue a previous range")]
    UnresolvedByteRange { uri: String, line: u32 },

    #[error("Playlist exceeds {limit} segments")]
    SegmentLimitExceeded { line: u32, limit: usize },

    #[error("{tag} cannot be mixed with tags of the other playlist kind")]
    MixedPlaylistTags { tag: String, line: u32 },

    #[error("{tag} may appear only once")]
    DuplicatePlaylistTag { tag: String, line: u32 },

    #[error("Sequence number started by {tag} exceeds 2^64-1")]
    SequenceOverflow { tag: &'static str, line: u32 },
}

impl AssemblyError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            AssemblyError::DanglingSegmentTags { .. } | AssemblyError::DanglingStreamInf { .. } => {
                ParseErrorKind::DanglingSegmentTags
            }
            AssemblyError::ContentAfterEndList { .. } => ParseErrorKind::ContentAfterEndList,
            AssemblyError::MissingSegmentDuration { .. }
            | AssemblyError::UnresolvedByteRange { .. } => ParseErrorKind::MissingRequiredAttribute,
            AssemblyError::MalformedStructure { .. }
            | AssemblyError::SegmentLimitExceeded { .. }
            | AssemblyError::MixedPlaylistTags { .. }
            | AssemblyError::DuplicatePlaylistTag { .. }
            | AssemblyError::SequenceOverflow { .. } => ParseErrorKind::MalformedLine,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            AssemblyError::MalformedStructure { line, .. }
            | AssemblyError::DanglingSegmentTags { line }
            | AssemblyError::DanglingStreamInf { line }
            | AssemblyError::ContentAfterEndList { line }
            | AssemblyError::MissingSegmentDuration { line, .. }
            | AssemblyError::UnresolvedByteRange { line, .. }
            | AssemblyError::SegmentLimitExceeded { line, .. }
            | AssemblyError::MixedPlaylistTags { line, .. }
            | AssemblyError::DuplicatePlaylistTag { line, .. }
            | AssemblyError::SequenceOverflow { line, .. } => *line,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            AssemblyError::MalformedStructure { .. } => codes::assembly::MALFORMED_STRUCTURE,
            AssemblyError::DanglingSegmentTags { .. } | AssemblyError::DanglingStreamInf { .. } => {
                codes::assembly::DANGLING_SEGMENT_TAGS
            }
            AssemblyError::ContentAfterEndList { .. } => codes::assembly::CONTENT_AFTER_END_LIST,
            AssemblyError::MissingSegmentDuration { .. } => codes::assembly::MISSING_SEGMENT_DURATION,
            AssemblyError::UnresolvedByteRange { .. } => codes::assembly::UNRESOLVED_BYTE_RANGE,
            AssemblyError::SegmentLimitExceeded { .. } => codes::assembly::SEGMENT_LIMIT_EXCEEDED,
            AssemblyError::MixedPlaylistTags { .. } => codes::assembly::MIXED_PLAYLIST_TAGS,
            AssemblyError::DuplicatePlaylistTag { .. } => codes::assembly::DUPLICATE_PLAYLIST_TAG,
            AssemblyError::SequenceOverflow { .. } => codes::assembly::SEQUENCE_OVERFLOW,
        }
    }
}
