use super::error::AttributeError;
use super::value::{parse_decimal_float, parse_decimal_integer, AttributeValue};
use crate::config::compile_time::attributes::{MAX_ATTRIBUTES_PER_TAG, MAX_QUOTED_STRING_LENGTH};

/// Ordered, duplicate-free `NAME=VALUE` pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeList<'a> {
    entries: Vec<(&'a str, AttributeValue<'a>)>,
}

impl<'a> AttributeList<'a> {
    pub fn get(&self, name: &str) -> Option<&AttributeValue<'a>> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &AttributeValue<'a>)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}

/// Split on commas that are not inside a quoted string.
/// Returns the pieces or the text of a piece whose quote never closes.
fn split_top_level(text: &str) -> Result<Vec<&str>, &str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_quote = false;

    for (idx, ch) in text.char_indices() {
        match ch {
            '"' => in_quote = !in_quote,
            ',' if !in_quote => {
                pieces.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if in_quote {
        return Err(&text[start..]);
    }
    pieces.push(&text[start..]);
    Ok(pieces)
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-')
}

fn parse_value<'a>(name: &str, raw: &'a str, line: u32) -> Result<AttributeValue<'a>, AttributeError> {
    let malformed_number = || AttributeError::MalformedNumber {
        name: name.to_string(),
        value: raw.to_string(),
        line,
    };

    if let Some(rest) = raw.strip_prefix('"') {
        let contents = rest.strip_suffix('"').ok_or_else(|| AttributeError::Malformed {
            text: format!("{}={}", name, raw),
            line,
        })?;
        if contents.contains('"') {
            return Err(AttributeError::Malformed {
                text: format!("{}={}", name, raw),
                line,
            });
        }
        if contents.len() > MAX_QUOTED_STRING_LENGTH {
            return Err(AttributeError::QuotedStringTooLong {
                name: name.to_string(),
                length: contents.len(),
                limit: MAX_QUOTED_STRING_LENGTH,
                line,
            });
        }
        return Ok(AttributeValue::QuotedString(contents));
    }

    if let Some(digits) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        let invalid = || AttributeError::InvalidHex {
            name: name.to_string(),
            value: raw.to_string(),
            line,
        };
        if digits.is_empty() {
            return Err(invalid());
        }
        let bytes = if digits.len() % 2 == 1 {
            hex::decode(format!("0{}", digits))
        } else {
            hex::decode(digits)
        };
        return bytes.map(AttributeValue::HexSequence).map_err(|_| invalid());
    }

    let unsigned = raw.strip_prefix('-').unwrap_or(raw);
    if unsigned.starts_with(|c: char| c.is_ascii_digit()) {
        if let Some((width, height)) = raw.split_once('x') {
            return match (parse_decimal_integer(width), parse_decimal_integer(height)) {
                (Some(width), Some(height)) => Ok(AttributeValue::Resolution { width, height }),
                _ => Err(malformed_number()),
            };
        }
        if let Some((length, offset)) = raw.split_once('@') {
            return match (parse_decimal_integer(length), parse_decimal_integer(offset)) {
                (Some(length), Some(offset)) => Ok(AttributeValue::SubRange { length, offset }),
                _ => Err(malformed_number()),
            };
        }
        if raw.contains('.') || raw.starts_with('-') {
            return parse_decimal_float(raw)
                .map(AttributeValue::DecimalFloat)
                .ok_or_else(malformed_number);
        }
        return parse_decimal_integer(raw)
            .map(AttributeValue::DecimalInteger)
            .ok_or_else(malformed_number);
    }

    if raw.is_empty() || raw.contains(|c: char| c == '"' || c.is_whitespace()) {
        return Err(AttributeError::Malformed {
            text: format!("{}={}", name, raw),
            line,
        });
    }

    Ok(AttributeValue::Enumerated(raw))
}

/// Parse the text after a tag's colon into an attribute list.
///
/// `line` is only used to locate errors.
pub fn parse_attribute_list(text: &str, line: u32) -> Result<AttributeList<'_>, AttributeError> {
    let mut list = AttributeList::default();
    if text.trim().is_empty() {
        return Ok(list);
    }

    let pieces = split_top_level(text).map_err(|piece| AttributeError::UnterminatedQuote {
        name: piece.split('=').next().unwrap_or_default().trim().to_string(),
        line,
    })?;

    for piece in pieces {
        let piece = piece.trim();
        let (name, raw) = piece.split_once('=').ok_or_else(|| AttributeError::Malformed {
            text: piece.to_string(),
            line,
        })?;

        if !is_valid_name(name) {
            return Err(AttributeError::InvalidName {
                name: name.to_string(),
                line,
            });
        }
        if list.contains(name) {
            return Err(AttributeError::DuplicateAttribute {
                name: name.to_string(),
                line,
            });
        }
        if list.len() >= MAX_ATTRIBUTES_PER_TAG {
            return Err(AttributeError::TooManyAttributes {
                line,
                limit: MAX_ATTRIBUTES_PER_TAG,
            });
        }

        let value = parse_value(name, raw, line)?;
        list.entries.push((name, value));
    }

    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_all_value_forms() {
        let list = parse_attribute_list(
            "METHOD=AES-128,URI=\"key.bin\",IV=0x0102,BANDWIDTH=1280000,FRAME-RATE=29.970,RESOLUTION=1920x1080,TIME-OFFSET=-4.5",
            3,
        )
        .unwrap();

        assert_eq!(list.len(), 7);
        assert_eq!(list.get("METHOD"), Some(&AttributeValue::Enumerated("AES-128")));
        assert_eq!(list.get("URI"), Some(&AttributeValue::QuotedString("key.bin")));
        assert_eq!(list.get("IV"), Some(&AttributeValue::HexSequence(vec![1, 2])));
        assert_eq!(list.get("BANDWIDTH"), Some(&AttributeValue::DecimalInteger(1_280_000)));
        assert_eq!(list.get("FRAME-RATE"), Some(&AttributeValue::DecimalFloat(29.97)));
        assert_eq!(
            list.get("RESOLUTION"),
            Some(&AttributeValue::Resolution { width: 1920, height: 1080 })
        );
        assert_eq!(list.get("TIME-OFFSET"), Some(&AttributeValue::DecimalFloat(-4.5)));
    }

    #[test]
    fn test_commas_inside_quotes() {
        let list = parse_attribute_list("CODECS=\"avc1.4d401f,mp4a.40.2\",BANDWIDTH=1", 1).unwrap();
        assert_eq!(
            list.get("CODECS").and_then(AttributeValue::as_quoted),
            Some("avc1.4d401f,mp4a.40.2")
        );
        let names: Vec<_> = list.names().collect();
        assert_eq!(names, vec!["CODECS", "BANDWIDTH"]);
    }

    #[test]
    fn test_odd_length_hex_is_left_padded() {
        let list = parse_attribute_list("IV=0xABC", 1).unwrap();
        assert_eq!(list.get("IV").and_then(AttributeValue::as_hex), Some(&[0x0a, 0xbc][..]));
    }

    #[test]
    fn test_unquoted_sub_range() {
        let list = parse_attribute_list("BYTERANGE=1000@500", 1).unwrap();
        assert_eq!(
            list.get("BYTERANGE"),
            Some(&AttributeValue::SubRange { length: 1000, offset: 500 })
        );
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse_attribute_list("URI=\"key.bin,METHOD=AES-128", 5).unwrap_err();
        assert_matches!(err, AttributeError::UnterminatedQuote { ref name, line: 5 } if name == "URI");
        assert_eq!(err.kind(), crate::error::ParseErrorKind::AttributeSyntaxError);
    }

    #[test]
    fn test_duplicate_name() {
        assert_matches!(
            parse_attribute_list("METHOD=NONE,METHOD=AES-128", 1),
            Err(AttributeError::DuplicateAttribute { .. })
        );
    }

    #[test]
    fn test_bad_names_and_missing_equals() {
        assert_matches!(
            parse_attribute_list("method=NONE", 1),
            Err(AttributeError::InvalidName { .. })
        );
        assert_matches!(
            parse_attribute_list("METHOD", 1),
            Err(AttributeError::Malformed { .. })
        );
        assert_matches!(
            parse_attribute_list("METHOD=NONE,", 1),
            Err(AttributeError::Malformed { .. })
        );
    }

    #[test]
    fn test_malformed_numbers() {
        for text in ["BANDWIDTH=12a", "FRAME-RATE=1.2.3", "RESOLUTION=1920x", "BYTERANGE=10@x"] {
            assert_matches!(
                parse_attribute_list(text, 1),
                Err(AttributeError::MalformedNumber { .. }),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_bad_hex() {
        assert_matches!(parse_attribute_list("IV=0xZZ", 1), Err(AttributeError::InvalidHex { .. }));
        assert_matches!(parse_attribute_list("IV=0x", 1), Err(AttributeError::InvalidHex { .. }));
    }

    #[test]
    fn test_attribute_limit() {
        let text = (0..=MAX_ATTRIBUTES_PER_TAG)
            .map(|i| format!("A{}=1", i))
            .collect::<Vec<_>>()
            .join(",");
        assert_matches!(
            parse_attribute_list(&text, 1),
            Err(AttributeError::TooManyAttributes { .. })
        );
    }

    #[test]
    fn test_empty_text_is_empty_list() {
        assert!(parse_attribute_list("", 1).unwrap().is_empty());
    }
}
