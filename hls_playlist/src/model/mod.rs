//! Structured playlist document produced by the assembler

pub mod master;
pub mod segment;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::logging::codes::{self, Code};

pub use master::{
    ClosedCaptions, HdcpLevel, IFrameVariant, MediaType, Rendition, Resolution, SessionData,
    SessionDataPayload, StreamInf, VariantStream,
};
pub use segment::{ByteRange, ByteRangeSpec, DateRange, KeyInfo, KeyMethod, MapInfo, Segment, SegmentTagSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaylistKind {
    Media,
    Master,
}

impl PlaylistKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            PlaylistKind::Media => "media",
            PlaylistKind::Master => "master",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaylistType {
    Event,
    Vod,
}

impl PlaylistType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "EVENT" => Some(PlaylistType::Event),
            "VOD" => Some(PlaylistType::Vod),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PlaylistType::Event => "EVENT",
            PlaylistType::Vod => "VOD",
        }
    }
}

/// `EXT-X-START`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartOffset {
    pub time_offset: f64,
    pub precise: bool,
}

/// A tag outside the registry, kept so it can be written back out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueTag {
    /// Name including the leading `#`
    pub name: String,
    pub value: Option<String>,
}

impl fmt::Display for OpaqueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}:{}", self.name, value),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    DurationExceedsTarget,
    VersionTooLow,
    VodWithoutEndList,
    UndeclaredRenditionGroup,
    DuplicateDateRangeId,
}

impl WarningKind {
    pub fn code(self) -> Code {
        match self {
            WarningKind::DurationExceedsTarget => codes::validation::DURATION_EXCEEDS_TARGET,
            WarningKind::VersionTooLow => codes::validation::VERSION_TOO_LOW,
            WarningKind::VodWithoutEndList => codes::validation::VOD_WITHOUT_END_LIST,
            WarningKind::UndeclaredRenditionGroup => codes::validation::UNDECLARED_RENDITION_GROUP,
            WarningKind::DuplicateDateRangeId => codes::validation::DUPLICATE_DATE_RANGE_ID,
        }
    }
}

/// Non-fatal finding attached to a validated document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub kind: WarningKind,
    pub message: String,
    /// Media sequence number of the segment concerned, if any
    pub segment: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDocument {
    pub kind: PlaylistKind,
    pub version: Option<u64>,
    pub independent_segments: bool,
    pub start: Option<StartOffset>,

    // Media playlist
    pub target_duration: Option<u64>,
    pub media_sequence: u64,
    pub discontinuity_sequence: u64,
    pub playlist_type: Option<PlaylistType>,
    pub end_list: bool,
    pub i_frames_only: bool,
    pub segments: Vec<Segment>,

    // Master playlist
    pub variants: Vec<VariantStream>,
    pub renditions: Vec<Rendition>,
    pub i_frame_variants: Vec<IFrameVariant>,
    pub session_data: Vec<SessionData>,
    pub session_keys: Vec<KeyInfo>,

    /// Unrecognized tags not attached to any segment
    pub unknown_tags: Vec<OpaqueTag>,
    pub warnings: Vec<ValidationWarning>,
}

impl PlaylistDocument {
    pub fn new(kind: PlaylistKind) -> Self {
        Self {
            kind,
            version: None,
            independent_segments: false,
            start: None,
            target_duration: None,
            media_sequence: 0,
            discontinuity_sequence: 0,
            playlist_type: None,
            end_list: false,
            i_frames_only: false,
            segments: Vec::new(),
            variants: Vec::new(),
            renditions: Vec::new(),
            i_frame_variants: Vec::new(),
            session_data: Vec::new(),
            session_keys: Vec::new(),
            unknown_tags: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_master(&self) -> bool {
        self.kind == PlaylistKind::Master
    }

    pub fn durations(&self) -> Vec<f64> {
        self.segments.iter().map(|s| s.duration).collect()
    }

    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    /// Keys in force for segment `index`: the nearest declaration at or
    /// before it. Empty if no key was ever declared.
    pub fn effective_keys(&self, index: usize) -> &[KeyInfo] {
        self.segments
            .get(..=index)
            .unwrap_or_default()
            .iter()
            .rev()
            .find(|s| !s.keys.is_empty())
            .map(|s| s.keys.as_slice())
            .unwrap_or_default()
    }

    /// Media initialization section in force for segment `index`
    pub fn effective_map(&self, index: usize) -> Option<&MapInfo> {
        self.segments
            .get(..=index)
            .unwrap_or_default()
            .iter()
            .rev()
            .find_map(|s| s.map.as_ref())
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(uri: &str, sequence: u64) -> Segment {
        SegmentTagSet::default().into_segment(uri.to_string(), 4.0, None, sequence, 0)
    }

    fn key(uri: &str) -> KeyInfo {
        KeyInfo {
            method: KeyMethod::Aes128,
            uri: Some(uri.to_string()),
            iv: None,
            key_format: None,
            key_format_versions: None,
        }
    }

    #[test]
    fn test_effective_keys_carry_forward() {
        let mut doc = PlaylistDocument::new(PlaylistKind::Media);
        doc.segments.push(segment("a.ts", 0));
        let mut second = segment("b.ts", 1);
        second.keys.push(key("k1"));
        doc.segments.push(second);
        doc.segments.push(segment("c.ts", 2));

        assert!(doc.effective_keys(0).is_empty());
        assert_eq!(doc.effective_keys(2)[0].uri.as_deref(), Some("k1"));
        assert!(doc.effective_keys(9).is_empty());
    }

    #[test]
    fn test_effective_map() {
        let mut doc = PlaylistDocument::new(PlaylistKind::Media);
        let mut first = segment("a.mp4", 0);
        first.map = Some(MapInfo {
            uri: "init.mp4".to_string(),
            byte_range: None,
        });
        doc.segments.push(first);
        doc.segments.push(segment("b.mp4", 1));

        assert_eq!(doc.effective_map(1).map(|m| m.uri.as_str()), Some("init.mp4"));
        assert_eq!(doc.total_duration(), 8.0);
    }

    #[test]
    fn test_opaque_tag_display() {
        let tag = OpaqueTag {
            name: "#EXT-X-CUE-OUT".to_string(),
            value: Some("30".to_string()),
        };
        assert_eq!(tag.to_string(), "#EXT-X-CUE-OUT:30");
    }

    #[test]
    fn test_enum_text_forms() {
        assert_eq!(KeyMethod::parse("SAMPLE-AES"), Some(KeyMethod::SampleAes));
        assert_eq!(PlaylistType::parse("vod"), None);
        assert_eq!(MediaType::ClosedCaptions.as_str(), "CLOSED-CAPTIONS");
        assert_eq!(HdcpLevel::parse("TYPE-0"), Some(HdcpLevel::Type0));
    }
}
