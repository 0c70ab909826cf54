use super::attrs::TagAttributes;
use super::error::SemanticError;
use super::{master_tags, media_tags};
use crate::config::ParserPreferences;
use crate::model::{
    ByteRangeSpec, DateRange, IFrameVariant, KeyInfo, MapInfo, OpaqueTag, PlaylistType, Rendition,
    SessionData, StartOffset, StreamInf,
};
use crate::tags::TagKind;
use chrono::{DateTime, FixedOffset};

/// A tag line decoded into typed fields
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedTag {
    Header,
    Version(u64),
    Inf { duration: f64, title: Option<String> },
    ByteRange(ByteRangeSpec),
    Discontinuity,
    Key(KeyInfo),
    Map(MapInfo),
    ProgramDateTime(DateTime<FixedOffset>),
    DateRange(DateRange),
    TargetDuration(u64),
    MediaSequence(u64),
    DiscontinuitySequence(u64),
    EndList,
    PlaylistType(PlaylistType),
    IFramesOnly,
    IndependentSegments,
    Start(StartOffset),
    Media(Rendition),
    StreamInf(StreamInf),
    IFrameStreamInf(IFrameVariant),
    SessionData(SessionData),
    SessionKey(KeyInfo),
    Unrecognized(OpaqueTag),
}

fn require_value<'a>(kind: &TagKind, raw: Option<&'a str>, line: u32) -> Result<&'a str, SemanticError> {
    raw.ok_or_else(|| SemanticError::MissingValue {
        tag: kind.literal().to_string(),
        line,
    })
}

fn reject_value(kind: &TagKind, raw: Option<&str>, line: u32) -> Result<(), SemanticError> {
    match raw.filter(|v| !v.trim().is_empty()) {
        None => Ok(()),
        Some(value) => Err(SemanticError::UnexpectedValue {
            tag: kind.literal().to_string(),
            value: value.to_string(),
            line,
        }),
    }
}

fn attributes<'a>(
    kind: &'a TagKind,
    raw: Option<&'a str>,
    line: u32,
) -> Result<TagAttributes<'a>, SemanticError> {
    TagAttributes::parse(kind.literal(), require_value(kind, raw, line)?, line)
}

/// Decode one tag line.
///
/// `raw` is the text after the first colon, if any. Placement rules that
/// depend on neighbouring lines are left to the assembler.
pub fn resolve(
    kind: &TagKind,
    raw: Option<&str>,
    line: u32,
    preferences: &ParserPreferences,
) -> Result<ResolvedTag, SemanticError> {
    let tag = kind.literal();

    let resolved = match kind {
        TagKind::ExtM3u => {
            reject_value(kind, raw, line)?;
            ResolvedTag::Header
        }
        TagKind::Discontinuity => {
            reject_value(kind, raw, line)?;
            ResolvedTag::Discontinuity
        }
        TagKind::EndList => {
            reject_value(kind, raw, line)?;
            ResolvedTag::EndList
        }
        TagKind::IFramesOnly => {
            reject_value(kind, raw, line)?;
            ResolvedTag::IFramesOnly
        }
        TagKind::IndependentSegments => {
            reject_value(kind, raw, line)?;
            ResolvedTag::IndependentSegments
        }
        TagKind::Inf => {
            let value = require_value(kind, raw, line)?;
            let (duration, title) =
                media_tags::decode_inf(tag, value, line, preferences.require_extinf_comma)?;
            ResolvedTag::Inf { duration, title }
        }
        TagKind::ByteRange => ResolvedTag::ByteRange(media_tags::decode_byte_range(
            tag,
            require_value(kind, raw, line)?,
            line,
        )?),
        TagKind::ProgramDateTime => ResolvedTag::ProgramDateTime(
            media_tags::decode_program_date_time(require_value(kind, raw, line)?, line)?,
        ),
        TagKind::TargetDuration => ResolvedTag::TargetDuration(media_tags::decode_target_duration(
            tag,
            require_value(kind, raw, line)?,
            line,
        )?),
        TagKind::Version => ResolvedTag::Version(media_tags::decode_integer(
            tag,
            require_value(kind, raw, line)?,
            line,
        )?),
        TagKind::MediaSequence => ResolvedTag::MediaSequence(media_tags::decode_integer(
            tag,
            require_value(kind, raw, line)?,
            line,
        )?),
        TagKind::DiscontinuitySequence => ResolvedTag::DiscontinuitySequence(
            media_tags::decode_integer(tag, require_value(kind, raw, line)?, line)?,
        ),
        TagKind::PlaylistType => {
            let value = require_value(kind, raw, line)?.trim();
            let playlist_type =
                PlaylistType::parse(value).ok_or_else(|| SemanticError::UnknownEnumValue {
                    tag: tag.to_string(),
                    attribute: "value".to_string(),
                    value: value.to_string(),
                    line,
                })?;
            ResolvedTag::PlaylistType(playlist_type)
        }
        TagKind::Key => {
            ResolvedTag::Key(media_tags::decode_key(tag, &attributes(kind, raw, line)?, false)?)
        }
        TagKind::SessionKey => {
            ResolvedTag::SessionKey(media_tags::decode_key(tag, &attributes(kind, raw, line)?, true)?)
        }
        TagKind::Map => ResolvedTag::Map(media_tags::decode_map(tag, &attributes(kind, raw, line)?)?),
        TagKind::DateRange => {
            ResolvedTag::DateRange(media_tags::decode_date_range(&attributes(kind, raw, line)?)?)
        }
        TagKind::Start => ResolvedTag::Start(master_tags::decode_start(&attributes(kind, raw, line)?)?),
        TagKind::Media => ResolvedTag::Media(master_tags::decode_media(&attributes(kind, raw, line)?)?),
        TagKind::StreamInf => {
            ResolvedTag::StreamInf(master_tags::decode_stream_inf(&attributes(kind, raw, line)?)?)
        }
        TagKind::IFrameStreamInf => ResolvedTag::IFrameStreamInf(
            master_tags::decode_i_frame_stream_inf(&attributes(kind, raw, line)?)?,
        ),
        TagKind::SessionData => ResolvedTag::SessionData(master_tags::decode_session_data(
            &attributes(kind, raw, line)?,
        )?),
        TagKind::Unrecognized(name) => ResolvedTag::Unrecognized(OpaqueTag {
            name: name.clone(),
            value: raw.map(str::to_string),
        }),
    };

    Ok(resolved)
}
