use std::fmt;

/// One decoded attribute value.
///
/// The variant is chosen from the value's lexical form alone; which form a
/// given attribute must take is checked later against the tag's rules.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue<'a> {
    /// Contents between the quotes, verbatim
    QuotedString(&'a str),
    HexSequence(Vec<u8>),
    DecimalInteger(u64),
    /// Any number with a fractional part or a sign
    DecimalFloat(f64),
    /// `<length>@<offset>` written without quotes
    SubRange { length: u64, offset: u64 },
    /// `<width>x<height>`
    Resolution { width: u64, height: u64 },
    /// Bare token such as `AES-128` or `YES`
    Enumerated(&'a str),
}

impl<'a> AttributeValue<'a> {
    /// Short name of the lexical form, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::QuotedString(_) => "quoted-string",
            AttributeValue::HexSequence(_) => "hexadecimal-sequence",
            AttributeValue::DecimalInteger(_) => "decimal-integer",
            AttributeValue::DecimalFloat(_) => "decimal-floating-point",
            AttributeValue::SubRange { .. } => "byte-range",
            AttributeValue::Resolution { .. } => "decimal-resolution",
            AttributeValue::Enumerated(_) => "enumerated-string",
        }
    }

    pub fn as_quoted(&self) -> Option<&'a str> {
        match self {
            AttributeValue::QuotedString(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enumerated(&self) -> Option<&'a str> {
        match self {
            AttributeValue::Enumerated(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<u64> {
        match self {
            AttributeValue::DecimalInteger(n) => Some(*n),
            _ => None,
        }
    }

    /// Integers widen to floats; `10` is a valid duration
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::DecimalFloat(f) => Some(*f),
            AttributeValue::DecimalInteger(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_hex(&self) -> Option<&[u8]> {
        match self {
            AttributeValue::HexSequence(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_resolution(&self) -> Option<(u64, u64)> {
        match self {
            AttributeValue::Resolution { width, height } => Some((*width, *height)),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::QuotedString(s) => write!(f, "\"{}\"", s),
            AttributeValue::HexSequence(bytes) => write!(f, "0x{}", hex::encode_upper(bytes)),
            AttributeValue::DecimalInteger(n) => write!(f, "{}", n),
            AttributeValue::DecimalFloat(v) => write!(f, "{}", v),
            AttributeValue::SubRange { length, offset } => write!(f, "{}@{}", length, offset),
            AttributeValue::Resolution { width, height } => write!(f, "{}x{}", width, height),
            AttributeValue::Enumerated(s) => f.write_str(s),
        }
    }
}

/// Parse `<length>[@<offset>]`, as used by `EXT-X-BYTERANGE` and the
/// quoted `BYTERANGE` attribute of `EXT-X-MAP`
pub fn parse_sub_range(text: &str) -> Option<(u64, Option<u64>)> {
    let (length, offset) = match text.split_once('@') {
        Some((length, offset)) => (length, Some(offset)),
        None => (text, None),
    };
    let length = parse_decimal_integer(length)?;
    let offset = match offset {
        Some(offset) => Some(parse_decimal_integer(offset)?),
        None => None,
    };
    Some((length, offset))
}

/// Digits only; `u64` rejects signs, so check the first byte as well
pub fn parse_decimal_integer(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Optional leading `-`, digits, at most one `.` followed by digits
pub fn parse_decimal_float(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || fraction.is_some_and(|f| !digits(f)) {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_range() {
        assert_eq!(parse_sub_range("1000@500"), Some((1000, Some(500))));
        assert_eq!(parse_sub_range("1000"), Some((1000, None)));
        assert_eq!(parse_sub_range("1000@"), None);
        assert_eq!(parse_sub_range("-1"), None);
    }

    #[test]
    fn test_decimal_float_grammar() {
        assert_eq!(parse_decimal_float("9.009"), Some(9.009));
        assert_eq!(parse_decimal_float("-2.5"), Some(-2.5));
        assert_eq!(parse_decimal_float("10"), Some(10.0));
        assert_eq!(parse_decimal_float("1e5"), None);
        assert_eq!(parse_decimal_float("1."), None);
        assert_eq!(parse_decimal_float(".5"), None);
        assert_eq!(parse_decimal_float("inf"), None);
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(AttributeValue::QuotedString("a,b").to_string(), "\"a,b\"");
        assert_eq!(
            AttributeValue::HexSequence(vec![0x0a, 0xff]).to_string(),
            "0x0AFF"
        );
        assert_eq!(
            AttributeValue::Resolution { width: 1280, height: 720 }.to_string(),
            "1280x720"
        );
        assert_eq!(AttributeValue::DecimalFloat(29.97).to_string(), "29.97");
    }

    #[test]
    fn test_integer_widens_to_float() {
        assert_eq!(AttributeValue::DecimalInteger(10).as_float(), Some(10.0));
        assert_eq!(AttributeValue::Enumerated("YES").as_float(), None);
    }
}
