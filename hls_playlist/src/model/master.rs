use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Audio,
    Video,
    Subtitles,
    ClosedCaptions,
}

impl MediaType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "AUDIO" => Some(MediaType::Audio),
            "VIDEO" => Some(MediaType::Video),
            "SUBTITLES" => Some(MediaType::Subtitles),
            "CLOSED-CAPTIONS" => Some(MediaType::ClosedCaptions),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            MediaType::Audio => "AUDIO",
            MediaType::Video => "VIDEO",
            MediaType::Subtitles => "SUBTITLES",
            MediaType::ClosedCaptions => "CLOSED-CAPTIONS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HdcpLevel {
    Type0,
    None,
}

impl HdcpLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "TYPE-0" => Some(HdcpLevel::Type0),
            "NONE" => Some(HdcpLevel::None),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            HdcpLevel::Type0 => "TYPE-0",
            HdcpLevel::None => "NONE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClosedCaptions {
    Group(String),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u64,
    pub height: u64,
}

/// `EXT-X-MEDIA`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendition {
    pub media_type: MediaType,
    pub uri: Option<String>,
    pub group_id: String,
    pub language: Option<String>,
    pub assoc_language: Option<String>,
    pub name: String,
    pub default: bool,
    pub autoselect: bool,
    pub forced: bool,
    pub instream_id: Option<String>,
    pub characteristics: Option<String>,
    pub channels: Option<String>,
}

/// Attributes of `EXT-X-STREAM-INF`; the URI comes from the next line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInf {
    pub bandwidth: u64,
    pub average_bandwidth: Option<u64>,
    pub codecs: Option<String>,
    pub resolution: Option<Resolution>,
    pub frame_rate: Option<f64>,
    pub hdcp_level: Option<HdcpLevel>,
    pub audio: Option<String>,
    pub video: Option<String>,
    pub subtitles: Option<String>,
    pub closed_captions: Option<ClosedCaptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantStream {
    pub uri: String,
    pub stream_inf: StreamInf,
}

/// `EXT-X-I-FRAME-STREAM-INF`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IFrameVariant {
    pub uri: String,
    pub bandwidth: u64,
    pub average_bandwidth: Option<u64>,
    pub codecs: Option<String>,
    pub resolution: Option<Resolution>,
    pub hdcp_level: Option<HdcpLevel>,
    pub video: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionDataPayload {
    Value(String),
    Uri(String),
}

/// `EXT-X-SESSION-DATA`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub data_id: String,
    pub payload: SessionDataPayload,
    pub language: Option<String>,
}
