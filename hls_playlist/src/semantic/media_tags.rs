//! Media segment and media playlist tags

use super::attrs::{parse_date_time, TagAttributes};
use super::error::SemanticError;
use crate::attributes::{parse_decimal_float, parse_decimal_integer, parse_sub_range, AttributeValue};
use crate::model::{ByteRange, ByteRangeSpec, DateRange, KeyInfo, KeyMethod, MapInfo};
use chrono::{DateTime, FixedOffset};

pub fn decode_inf(
    tag: &str,
    value: &str,
    line: u32,
    require_comma: bool,
) -> Result<(f64, Option<String>), SemanticError> {
    let (duration_text, title) = match value.split_once(',') {
        Some((duration, title)) => (duration, Some(title)),
        None if require_comma => {
            return Err(SemanticError::UnexpectedValue {
                tag: tag.to_string(),
                value: value.to_string(),
                line,
            })
        }
        None => (value, None),
    };

    let duration = parse_decimal_float(duration_text.trim())
        .filter(|d| *d >= 0.0)
        .ok_or_else(|| SemanticError::InvalidDuration {
            tag: tag.to_string(),
            value: duration_text.to_string(),
            line,
        })?;

    let title = title.filter(|t| !t.is_empty()).map(str::to_string);
    Ok((duration, title))
}

pub fn decode_target_duration(tag: &str, value: &str, line: u32) -> Result<u64, SemanticError> {
    parse_decimal_integer(value.trim()).ok_or_else(|| SemanticError::InvalidDuration {
        tag: tag.to_string(),
        value: value.to_string(),
        line,
    })
}

/// Version, media sequence and discontinuity sequence
pub fn decode_integer(tag: &str, value: &str, line: u32) -> Result<u64, SemanticError> {
    parse_decimal_integer(value.trim()).ok_or_else(|| SemanticError::InvalidInteger {
        tag: tag.to_string(),
        value: value.to_string(),
        line,
    })
}

pub fn decode_byte_range(tag: &str, value: &str, line: u32) -> Result<ByteRangeSpec, SemanticError> {
    parse_sub_range(value.trim())
        .map(|(length, offset)| ByteRangeSpec { length, offset })
        .ok_or_else(|| SemanticError::InvalidInteger {
            tag: tag.to_string(),
            value: value.to_string(),
            line,
        })
}

pub fn decode_program_date_time(value: &str, line: u32) -> Result<DateTime<FixedOffset>, SemanticError> {
    parse_date_time(value.trim(), line)
}

fn decode_iv(attrs: &TagAttributes<'_>, tag: &str) -> Result<Option<[u8; 16]>, SemanticError> {
    match attrs.hex("IV")? {
        None => Ok(None),
        Some(bytes) => <[u8; 16]>::try_from(bytes.as_slice())
            .map(Some)
            .map_err(|_| SemanticError::WrongAttributeType {
                tag: tag.to_string(),
                attribute: "IV".to_string(),
                expected: "128-bit hexadecimal-sequence",
                found: format!("{}-bit hexadecimal-sequence", bytes.len() * 8),
                line: attrs.line(),
            }),
    }
}

/// `EXT-X-KEY` and `EXT-X-SESSION-KEY` share one attribute grammar
pub fn decode_key(tag: &str, attrs: &TagAttributes<'_>, session: bool) -> Result<KeyInfo, SemanticError> {
    let method = attrs.required_enum_value("METHOD", KeyMethod::parse)?;
    let uri = attrs.quoted("URI")?;
    let iv = decode_iv(attrs, tag)?;
    let key_format = attrs.quoted("KEYFORMAT")?;
    let key_format_versions = attrs.quoted("KEYFORMATVERSIONS")?;

    if method == KeyMethod::None {
        if session {
            return Err(attrs.conflict("METHOD=NONE is not allowed for session keys"));
        }
        if uri.is_some() || iv.is_some() || key_format.is_some() || key_format_versions.is_some() {
            return Err(attrs.conflict("METHOD=NONE must not carry other attributes"));
        }
    } else if uri.is_none() {
        return Err(attrs.missing("URI"));
    }

    Ok(KeyInfo {
        method,
        uri,
        iv,
        key_format,
        key_format_versions,
    })
}

pub fn decode_map(tag: &str, attrs: &TagAttributes<'_>) -> Result<MapInfo, SemanticError> {
    let uri = attrs.required_quoted("URI")?;

    let invalid_range = |value: String| SemanticError::InvalidInteger {
        tag: tag.to_string(),
        value,
        line: attrs.line(),
    };
    let byte_range = match attrs.get("BYTERANGE") {
        None => None,
        Some(AttributeValue::QuotedString(text)) => {
            let (length, offset) = parse_sub_range(text).ok_or_else(|| invalid_range(text.to_string()))?;
            Some(ByteRange {
                length,
                offset: offset.unwrap_or(0),
            })
        }
        Some(AttributeValue::SubRange { length, offset }) => Some(ByteRange {
            length: *length,
            offset: *offset,
        }),
        Some(other) => return Err(invalid_range(other.to_string())),
    };

    Ok(MapInfo { uri, byte_range })
}

pub fn decode_date_range(attrs: &TagAttributes<'_>) -> Result<DateRange, SemanticError> {
    let id = attrs.required_quoted("ID")?;
    let class = attrs.quoted("CLASS")?;
    let start_date = attrs
        .date_time("START-DATE")?
        .ok_or_else(|| attrs.missing("START-DATE"))?;
    let end_date = attrs.date_time("END-DATE")?;

    let non_negative = |name: &str| -> Result<Option<f64>, SemanticError> {
        match attrs.float(name)? {
            Some(d) if d < 0.0 => Err(SemanticError::InvalidDuration {
                tag: "#EXT-X-DATERANGE".to_string(),
                value: d.to_string(),
                line: attrs.line(),
            }),
            other => Ok(other),
        }
    };
    let duration = non_negative("DURATION")?;
    let planned_duration = non_negative("PLANNED-DURATION")?;

    let end_on_next = match attrs.enumerated("END-ON-NEXT")? {
        None => false,
        Some("YES") => true,
        Some(other) => return Err(attrs.unknown_value("END-ON-NEXT", other)),
    };
    if end_on_next {
        if class.is_none() {
            return Err(attrs.missing("CLASS"));
        }
        if duration.is_some() || end_date.is_some() {
            return Err(attrs.conflict("END-ON-NEXT cannot be combined with DURATION or END-DATE"));
        }
    }
    if let Some(end) = end_date {
        if end < start_date {
            return Err(attrs.conflict("END-DATE is before START-DATE"));
        }
    }

    let client_attributes = attrs
        .iter()
        .filter(|(name, _)| name.starts_with("X-"))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    Ok(DateRange {
        id,
        class,
        start_date,
        end_date,
        duration,
        planned_duration,
        scte35_cmd: attrs.hex("SCTE35-CMD")?,
        scte35_out: attrs.hex("SCTE35-OUT")?,
        scte35_in: attrs.hex("SCTE35-IN")?,
        end_on_next,
        client_attributes,
    })
}
