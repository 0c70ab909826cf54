//! Master playlist tags and `EXT-X-START`

use super::attrs::TagAttributes;
use super::error::SemanticError;
use crate::attributes::AttributeValue;
use crate::model::{
    ClosedCaptions, HdcpLevel, IFrameVariant, MediaType, Rendition, Resolution, SessionData,
    SessionDataPayload, StartOffset, StreamInf,
};

fn resolution(attrs: &TagAttributes<'_>) -> Result<Option<Resolution>, SemanticError> {
    Ok(attrs
        .resolution("RESOLUTION")?
        .map(|(width, height)| Resolution { width, height }))
}

pub fn decode_start(attrs: &TagAttributes<'_>) -> Result<StartOffset, SemanticError> {
    let time_offset = attrs
        .float("TIME-OFFSET")?
        .ok_or_else(|| attrs.missing("TIME-OFFSET"))?;
    let precise = attrs.flag("PRECISE")?.unwrap_or(false);
    Ok(StartOffset {
        time_offset,
        precise,
    })
}

pub fn decode_stream_inf(attrs: &TagAttributes<'_>) -> Result<StreamInf, SemanticError> {
    let closed_captions = match attrs.get("CLOSED-CAPTIONS") {
        None => None,
        Some(AttributeValue::QuotedString(group)) => Some(ClosedCaptions::Group(group.to_string())),
        Some(AttributeValue::Enumerated("NONE")) => Some(ClosedCaptions::None),
        Some(other) => return Err(attrs.unknown_value("CLOSED-CAPTIONS", &other.to_string())),
    };

    Ok(StreamInf {
        bandwidth: attrs.required_integer("BANDWIDTH")?,
        average_bandwidth: attrs.integer("AVERAGE-BANDWIDTH")?,
        codecs: attrs.quoted("CODECS")?,
        resolution: resolution(attrs)?,
        frame_rate: attrs.float("FRAME-RATE")?,
        hdcp_level: attrs.enum_value("HDCP-LEVEL", HdcpLevel::parse)?,
        audio: attrs.quoted("AUDIO")?,
        video: attrs.quoted("VIDEO")?,
        subtitles: attrs.quoted("SUBTITLES")?,
        closed_captions,
    })
}

pub fn decode_i_frame_stream_inf(attrs: &TagAttributes<'_>) -> Result<IFrameVariant, SemanticError> {
    Ok(IFrameVariant {
        uri: attrs.required_quoted("URI")?,
        bandwidth: attrs.required_integer("BANDWIDTH")?,
        average_bandwidth: attrs.integer("AVERAGE-BANDWIDTH")?,
        codecs: attrs.quoted("CODECS")?,
        resolution: resolution(attrs)?,
        hdcp_level: attrs.enum_value("HDCP-LEVEL", HdcpLevel::parse)?,
        video: attrs.quoted("VIDEO")?,
    })
}

pub fn decode_media(attrs: &TagAttributes<'_>) -> Result<Rendition, SemanticError> {
    let media_type = attrs.required_enum_value("TYPE", MediaType::parse)?;
    let uri = attrs.quoted("URI")?;
    let instream_id = attrs.quoted("INSTREAM-ID")?;
    let default = attrs.flag("DEFAULT")?;
    let autoselect = attrs.flag("AUTOSELECT")?;
    let forced = attrs.flag("FORCED")?;

    if media_type == MediaType::ClosedCaptions {
        if instream_id.is_none() {
            return Err(attrs.missing("INSTREAM-ID"));
        }
        if uri.is_some() {
            return Err(attrs.conflict("URI is not allowed for TYPE=CLOSED-CAPTIONS"));
        }
    } else if instream_id.is_some() {
        return Err(attrs.conflict("INSTREAM-ID is only allowed for TYPE=CLOSED-CAPTIONS"));
    }
    if forced.is_some() && media_type != MediaType::Subtitles {
        return Err(attrs.conflict("FORCED is only allowed for TYPE=SUBTITLES"));
    }
    if default == Some(true) && autoselect == Some(false) {
        return Err(attrs.conflict("AUTOSELECT must be YES when DEFAULT=YES"));
    }

    Ok(Rendition {
        media_type,
        uri,
        group_id: attrs.required_quoted("GROUP-ID")?,
        language: attrs.quoted("LANGUAGE")?,
        assoc_language: attrs.quoted("ASSOC-LANGUAGE")?,
        name: attrs.required_quoted("NAME")?,
        default: default.unwrap_or(false),
        autoselect: autoselect.unwrap_or(false),
        forced: forced.unwrap_or(false),
        instream_id,
        characteristics: attrs.quoted("CHARACTERISTICS")?,
        channels: attrs.quoted("CHANNELS")?,
    })
}

pub fn decode_session_data(attrs: &TagAttributes<'_>) -> Result<SessionData, SemanticError> {
    let data_id = attrs.required_quoted("DATA-ID")?;
    let payload = match (attrs.quoted("VALUE")?, attrs.quoted("URI")?) {
        (Some(value), None) => SessionDataPayload::Value(value),
        (None, Some(uri)) => SessionDataPayload::Uri(uri),
        (Some(_), Some(_)) => return Err(attrs.conflict("VALUE and URI are mutually exclusive")),
        (None, None) => return Err(attrs.missing("VALUE")),
    };

    Ok(SessionData {
        data_id,
        payload,
        language: attrs.quoted("LANGUAGE")?,
    })
}
