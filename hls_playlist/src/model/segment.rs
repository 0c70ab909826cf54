use super::OpaqueTag;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyMethod {
    None,
    Aes128,
    SampleAes,
}

impl KeyMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NONE" => Some(KeyMethod::None),
            "AES-128" => Some(KeyMethod::Aes128),
            "SAMPLE-AES" => Some(KeyMethod::SampleAes),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            KeyMethod::None => "NONE",
            KeyMethod::Aes128 => "AES-128",
            KeyMethod::SampleAes => "SAMPLE-AES",
        }
    }
}

/// Decoded `EXT-X-KEY` or `EXT-X-SESSION-KEY`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyInfo {
    pub method: KeyMethod,
    pub uri: Option<String>,
    pub iv: Option<[u8; 16]>,
    pub key_format: Option<String>,
    pub key_format_versions: Option<String>,
}

/// A fully resolved byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub length: u64,
    pub offset: u64,
}

impl ByteRange {
    /// First byte after the range
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.length)
    }
}

/// `EXT-X-BYTERANGE` as written; the offset may be implied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRangeSpec {
    pub length: u64,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapInfo {
    pub uri: String,
    pub byte_range: Option<ByteRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub id: String,
    pub class: Option<String>,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: Option<DateTime<FixedOffset>>,
    pub duration: Option<f64>,
    pub planned_duration: Option<f64>,
    pub scte35_cmd: Option<Vec<u8>>,
    pub scte35_out: Option<Vec<u8>>,
    pub scte35_in: Option<Vec<u8>>,
    pub end_on_next: bool,
    /// `X-` attributes, value text exactly as written
    pub client_attributes: Vec<(String, String)>,
}

/// One media segment: a URI and the tags that preceded it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub uri: String,
    pub duration: f64,
    pub title: Option<String>,
    pub byte_range: Option<ByteRange>,
    pub discontinuity: bool,
    /// Keys declared directly before this segment; see
    /// [`PlaylistDocument::effective_keys`](super::PlaylistDocument::effective_keys)
    pub keys: Vec<KeyInfo>,
    pub map: Option<MapInfo>,
    pub program_date_time: Option<DateTime<FixedOffset>>,
    pub date_ranges: Vec<DateRange>,
    pub unknown_tags: Vec<OpaqueTag>,
    pub sequence: u64,
    pub discontinuity_sequence: u64,
}

/// Tags collected for the next segment, in the order they arrive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentTagSet {
    pub duration: Option<f64>,
    pub title: Option<String>,
    pub byte_range: Option<ByteRangeSpec>,
    pub discontinuity: bool,
    pub keys: Vec<KeyInfo>,
    pub map: Option<MapInfo>,
    pub program_date_time: Option<DateTime<FixedOffset>>,
    pub date_ranges: Vec<DateRange>,
    pub unknown_tags: Vec<OpaqueTag>,
}

impl SegmentTagSet {
    pub fn is_empty(&self) -> bool {
        *self == SegmentTagSet::default()
    }

    /// Attach the collected tags to `uri`. The byte range must already be
    /// resolved by the caller since it depends on earlier segments.
    pub fn into_segment(
        self,
        uri: String,
        duration: f64,
        byte_range: Option<ByteRange>,
        sequence: u64,
        discontinuity_sequence: u64,
    ) -> Segment {
        Segment {
            uri,
            duration,
            title: self.title,
            byte_range,
            discontinuity: self.discontinuity,
            keys: self.keys,
            map: self.map,
            program_date_time: self.program_date_time,
            date_ranges: self.date_ranges,
            unknown_tags: self.unknown_tags,
            sequence,
            discontinuity_sequence,
        }
    }
}
