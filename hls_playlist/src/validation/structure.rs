//! Fatal document checks
//!
//! `segment_lines` holds the URI line of each segment when the document came
//! from text; it may be shorter than `doc.segments` or empty.

use super::error::ValidationError;
use crate::model::{PlaylistDocument, PlaylistKind};

pub fn check_target_duration(
    doc: &PlaylistDocument,
    _segment_lines: &[u32],
) -> Result<(), ValidationError> {
    if doc.kind == PlaylistKind::Media && doc.target_duration.is_none() {
        return Err(ValidationError::MissingTargetDuration);
    }
    Ok(())
}

/// Each segment's sequence number is the playlist's start plus its index
pub fn check_sequence_contiguity(
    doc: &PlaylistDocument,
    segment_lines: &[u32],
) -> Result<(), ValidationError> {
    for (index, segment) in doc.segments.iter().enumerate() {
        let line = segment_lines.get(index).copied();
        let expected = doc
            .media_sequence
            .checked_add(index as u64)
            .ok_or(ValidationError::SequenceOverflow { index, line })?;
        if segment.sequence != expected {
            return Err(ValidationError::NonContiguousSequence {
                index,
                expected,
                found: segment.sequence,
                line,
            });
        }
    }
    Ok(())
}

/// The discontinuity sequence moves only at `#EXT-X-DISCONTINUITY`, by one
pub fn check_discontinuity_sequence(
    doc: &PlaylistDocument,
    segment_lines: &[u32],
) -> Result<(), ValidationError> {
    let mut expected = doc.discontinuity_sequence;
    for (index, segment) in doc.segments.iter().enumerate() {
        let line = segment_lines.get(index).copied();
        if segment.discontinuity {
            expected = expected
                .checked_add(1)
                .ok_or(ValidationError::SequenceOverflow { index, line })?;
        }
        if segment.discontinuity_sequence != expected {
            return Err(ValidationError::DiscontinuityMismatch {
                sequence: segment.sequence,
                expected,
                found: segment.discontinuity_sequence,
                line,
            });
        }
    }
    Ok(())
}
