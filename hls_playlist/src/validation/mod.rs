//! Model validator
//!
//! Runs after assembly. Structural problems abort the parse; tolerance
//! issues become warnings attached to the document.

pub mod advisories;
pub mod error;
pub mod structure;

pub use error::ValidationError;

use crate::config::ValidationPreferences;
use crate::logging::codes;
use crate::model::{PlaylistDocument, ValidationWarning};
use crate::utils::Span;
use crate::{log_debug, log_error, log_success, log_warning};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct ValidationMetrics {
    pub checks_performed: usize,
    pub warnings_found: usize,
    pub duration_ms: f64,
}

/// Check `doc` and attach warnings to it
pub fn validate(
    doc: PlaylistDocument,
    preferences: &ValidationPreferences,
) -> Result<(PlaylistDocument, ValidationMetrics), ValidationError> {
    validate_with_lines(doc, &[], preferences)
}

/// [`validate`] for a document fresh from the assembler; `segment_lines[i]`
/// is the URI line of segment `i` and locates sequence errors
pub fn validate_with_lines(
    mut doc: PlaylistDocument,
    segment_lines: &[u32],
    preferences: &ValidationPreferences,
) -> Result<(PlaylistDocument, ValidationMetrics), ValidationError> {
    let start_time = Instant::now();
    let mut metrics = ValidationMetrics::default();

    log_debug!("Checking document structure", "segments" => doc.segments.len());
    let structural: [fn(&PlaylistDocument, &[u32]) -> Result<(), ValidationError>; 3] = [
        structure::check_target_duration,
        structure::check_sequence_contiguity,
        structure::check_discontinuity_sequence,
    ];
    for check in structural {
        metrics.checks_performed += 1;
        if let Err(error) = check(&doc, segment_lines) {
            match error.line() {
                Some(line) => log_error!(error.error_code(), error.to_string(), span = Span::at_line(line)),
                None => log_error!(error.error_code(), error.to_string()),
            }
            return Err(error);
        }
    }

    let mut warnings: Vec<ValidationWarning> = Vec::new();
    if preferences.warn_on_duration_overrun {
        metrics.checks_performed += 1;
        warnings.extend(advisories::check_segment_durations(&doc));
    }
    if preferences.check_version_compatibility {
        metrics.checks_performed += 1;
        warnings.extend(advisories::check_version(&doc));
    }
    if preferences.check_rendition_groups {
        metrics.checks_performed += 1;
        warnings.extend(advisories::check_rendition_groups(&doc));
    }
    metrics.checks_performed += 2;
    warnings.extend(advisories::check_vod_end_list(&doc));
    warnings.extend(advisories::check_date_range_ids(&doc));

    for warning in &warnings {
        log_warning!(warning.kind.code(), &warning.message);
    }

    metrics.warnings_found = warnings.len();
    metrics.duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    doc.warnings.extend(warnings);

    log_success!(
        codes::success::VALIDATION_COMPLETE,
        "Playlist validation completed",
        "checks" => metrics.checks_performed,
        "warnings" => metrics.warnings_found
    );

    Ok((doc, metrics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlaylistKind, SegmentTagSet, WarningKind};

    #[test]
    fn test_missing_target_duration_is_fatal() {
        let doc = PlaylistDocument::new(PlaylistKind::Media);
        let err = validate(doc, &ValidationPreferences::default()).unwrap_err();
        assert_eq!(err, ValidationError::MissingTargetDuration);
        assert_eq!(err.kind(), crate::error::ParseErrorKind::MissingRequiredAttribute);
    }

    #[test]
    fn test_warnings_attached_and_preferences_respected() {
        let mut doc = PlaylistDocument::new(PlaylistKind::Media);
        doc.target_duration = Some(4);
        doc.version = Some(3);
        doc.segments
            .push(SegmentTagSet::default().into_segment("a.ts".to_string(), 9.0, None, 0, 0));

        let (checked, metrics) = validate(doc.clone(), &ValidationPreferences::default()).unwrap();
        assert_eq!(checked.warnings.len(), 1);
        assert_eq!(checked.warnings[0].kind, WarningKind::DurationExceedsTarget);
        assert_eq!(metrics.warnings_found, 1);

        let lenient = ValidationPreferences {
            warn_on_duration_overrun: false,
            ..ValidationPreferences::default()
        };
        let (checked, _) = validate(doc, &lenient).unwrap();
        assert!(checked.warnings.is_empty());
    }

    #[test]
    fn test_sequence_error_located_at_segment_uri() {
        let mut doc = PlaylistDocument::new(PlaylistKind::Media);
        doc.target_duration = Some(10);
        for sequence in [0, 2] {
            doc.segments.push(SegmentTagSet::default().into_segment(
                format!("{}.ts", sequence),
                10.0,
                None,
                sequence,
                0,
            ));
        }

        let err = validate_with_lines(doc.clone(), &[4, 6], &ValidationPreferences::default())
            .unwrap_err();
        assert_eq!(err.line(), Some(6));
        assert_eq!(err.error_code(), codes::validation::NON_CONTIGUOUS_SEQUENCE);

        let err = validate(doc, &ValidationPreferences::default()).unwrap_err();
        assert_eq!(err.line(), None);
    }
}
