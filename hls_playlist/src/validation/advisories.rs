//! Non-fatal checks that produce document warnings

use crate::config::compile_time::validation::TARGET_DURATION_TOLERANCE;
use crate::model::{
    ClosedCaptions, KeyMethod, MediaType, PlaylistDocument, PlaylistType, ValidationWarning,
    WarningKind,
};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

fn warning(kind: WarningKind, message: String, segment: Option<u64>) -> ValidationWarning {
    ValidationWarning {
        kind,
        message,
        segment,
    }
}

pub fn check_segment_durations(doc: &PlaylistDocument) -> Vec<ValidationWarning> {
    let Some(target) = doc.target_duration else {
        return Vec::new();
    };
    let limit = target as f64 + TARGET_DURATION_TOLERANCE;

    doc.segments
        .iter()
        .filter(|s| s.duration > limit)
        .map(|s| {
            warning(
                WarningKind::DurationExceedsTarget,
                format!(
                    "Segment '{}' lasts {}s, longer than the target duration of {}s",
                    s.uri, s.duration, target
                ),
                Some(s.sequence),
            )
        })
        .collect()
}

/// Lowest `EXT-X-VERSION` the features used in `doc` allow
pub fn required_version(doc: &PlaylistDocument) -> u64 {
    let mut required = 1;
    let mut need = |version: u64| required = required.max(version);

    if doc.i_frames_only {
        need(4);
    }
    for segment in &doc.segments {
        if segment.duration.fract() != 0.0 {
            need(3);
        }
        if segment.byte_range.is_some() {
            need(4);
        }
        if segment.map.is_some() {
            need(if doc.i_frames_only { 5 } else { 6 });
        }
        for key in &segment.keys {
            if key.iv.is_some() {
                need(2);
            }
            if key.key_format.is_some()
                || key.key_format_versions.is_some()
                || key.method == KeyMethod::SampleAes
            {
                need(5);
            }
        }
    }

    required
}

pub fn check_version(doc: &PlaylistDocument) -> Vec<ValidationWarning> {
    let declared = doc.version.unwrap_or(1);
    let required = required_version(doc);
    if declared >= required {
        return Vec::new();
    }

    vec![warning(
        WarningKind::VersionTooLow,
        format!(
            "Playlist declares version {} but uses features that require version {}",
            declared, required
        ),
        None,
    )]
}

pub fn check_vod_end_list(doc: &PlaylistDocument) -> Vec<ValidationWarning> {
    if doc.playlist_type == Some(PlaylistType::Vod) && !doc.end_list {
        return vec![warning(
            WarningKind::VodWithoutEndList,
            "VOD playlist has no #EXT-X-ENDLIST".to_string(),
            None,
        )];
    }
    Vec::new()
}

pub fn check_rendition_groups(doc: &PlaylistDocument) -> Vec<ValidationWarning> {
    let declared = |media_type: MediaType, group: &str| -> bool {
        doc.renditions
            .iter()
            .any(|r| r.media_type == media_type && r.group_id == group)
    };

    let mut references: Vec<(MediaType, &str, &str)> = Vec::new();
    for variant in &doc.variants {
        let inf = &variant.stream_inf;
        let groups = [
            (MediaType::Audio, inf.audio.as_deref()),
            (MediaType::Video, inf.video.as_deref()),
            (MediaType::Subtitles, inf.subtitles.as_deref()),
            (
                MediaType::ClosedCaptions,
                match &inf.closed_captions {
                    Some(ClosedCaptions::Group(group)) => Some(group.as_str()),
                    _ => None,
                },
            ),
        ];
        for (media_type, group) in groups {
            if let Some(group) = group {
                references.push((media_type, group, variant.uri.as_str()));
            }
        }
    }
    for variant in &doc.i_frame_variants {
        if let Some(group) = variant.video.as_deref() {
            references.push((MediaType::Video, group, variant.uri.as_str()));
        }
    }

    references
        .into_iter()
        .filter(|(media_type, group, _)| !declared(*media_type, *group))
        .map(|(media_type, group, uri)| {
            warning(
                WarningKind::UndeclaredRenditionGroup,
                format!(
                    "Variant '{}' references {} group '{}' with no matching #EXT-X-MEDIA",
                    uri,
                    media_type.as_str(),
                    group
                ),
                None,
            )
        })
        .collect()
}

/// Date ranges sharing an ID must describe the same range
pub fn check_date_range_ids(doc: &PlaylistDocument) -> Vec<ValidationWarning> {
    let mut seen = HashMap::new();
    let mut warnings = Vec::new();

    for segment in &doc.segments {
        for range in &segment.date_ranges {
            let identity = (range.start_date, range.class.as_deref());
            match seen.entry(range.id.as_str()) {
                Entry::Vacant(entry) => {
                    entry.insert(identity);
                }
                Entry::Occupied(entry) if *entry.get() != identity => {
                    warnings.push(warning(
                        WarningKind::DuplicateDateRangeId,
                        format!("Date range '{}' is redefined with different attributes", range.id),
                        Some(segment.sequence),
                    ));
                }
                Entry::Occupied(_) => {}
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        KeyInfo, MapInfo, PlaylistKind, Rendition, SegmentTagSet, StreamInf, VariantStream,
    };

    fn doc_with_durations(durations: &[f64]) -> PlaylistDocument {
        let mut doc = PlaylistDocument::new(PlaylistKind::Media);
        doc.target_duration = Some(10);
        for (i, duration) in durations.iter().enumerate() {
            doc.segments.push(SegmentTagSet::default().into_segment(
                format!("{}.ts", i),
                *duration,
                None,
                i as u64,
                0,
            ));
        }
        doc
    }

    fn stream_inf(audio: Option<&str>) -> StreamInf {
        StreamInf {
            bandwidth: 1,
            average_bandwidth: None,
            codecs: None,
            resolution: None,
            frame_rate: None,
            hdcp_level: None,
            audio: audio.map(str::to_string),
            video: None,
            subtitles: None,
            closed_captions: None,
        }
    }

    #[test]
    fn test_duration_overrun_uses_tolerance() {
        let doc = doc_with_durations(&[10.0, 10.0 + TARGET_DURATION_TOLERANCE, 12.0]);
        let warnings = check_segment_durations(&doc);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].segment, Some(2));
        assert_eq!(warnings[0].kind, WarningKind::DurationExceedsTarget);
    }

    #[test]
    fn test_required_version() {
        let mut doc = doc_with_durations(&[10.0]);
        assert_eq!(required_version(&doc), 1);

        doc.segments[0].keys.push(KeyInfo {
            method: KeyMethod::Aes128,
            uri: Some("k".to_string()),
            iv: Some([0; 16]),
            key_format: None,
            key_format_versions: None,
        });
        assert_eq!(required_version(&doc), 2);

        doc.segments[0].duration = 9.5;
        assert_eq!(required_version(&doc), 3);

        doc.segments[0].map = Some(MapInfo {
            uri: "init.mp4".to_string(),
            byte_range: None,
        });
        assert_eq!(required_version(&doc), 6);
        doc.i_frames_only = true;
        assert_eq!(required_version(&doc), 5);
    }

    #[test]
    fn test_version_warning() {
        let mut doc = doc_with_durations(&[9.5]);
        assert_eq!(check_version(&doc).len(), 1);
        doc.version = Some(3);
        assert!(check_version(&doc).is_empty());
    }

    #[test]
    fn test_vod_without_end_list() {
        let mut doc = doc_with_durations(&[10.0]);
        doc.playlist_type = Some(PlaylistType::Vod);
        assert_eq!(check_vod_end_list(&doc)[0].kind, WarningKind::VodWithoutEndList);
        doc.end_list = true;
        assert!(check_vod_end_list(&doc).is_empty());
    }

    #[test]
    fn test_undeclared_rendition_group() {
        let mut doc = PlaylistDocument::new(PlaylistKind::Master);
        doc.variants.push(VariantStream {
            uri: "low.m3u8".to_string(),
            stream_inf: stream_inf(Some("aac")),
        });
        assert_eq!(check_rendition_groups(&doc).len(), 1);

        doc.renditions.push(Rendition {
            media_type: MediaType::Audio,
            uri: None,
            group_id: "aac".to_string(),
            language: None,
            assoc_language: None,
            name: "English".to_string(),
            default: false,
            autoselect: false,
            forced: false,
            instream_id: None,
            characteristics: None,
            channels: None,
        });
        assert!(check_rendition_groups(&doc).is_empty());
    }
}
