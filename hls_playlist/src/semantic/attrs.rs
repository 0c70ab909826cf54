//! Typed access to a tag's attribute list

use super::error::SemanticError;
use crate::attributes::{parse_attribute_list, AttributeList, AttributeValue};
use chrono::{DateTime, FixedOffset};

/// Parse an ISO-8601 date-time that carries a zone offset
pub fn parse_date_time(text: &str, line: u32) -> Result<DateTime<FixedOffset>, SemanticError> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map_err(|_| SemanticError::InvalidTimestamp {
            value: text.to_string(),
            line,
        })
}

pub struct TagAttributes<'a> {
    tag: &'a str,
    list: AttributeList<'a>,
    line: u32,
}

impl<'a> TagAttributes<'a> {
    pub fn parse(tag: &'a str, text: &'a str, line: u32) -> Result<Self, SemanticError> {
        Ok(Self {
            tag,
            list: parse_attribute_list(text, line)?,
            line,
        })
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue<'a>> {
        self.list.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.list.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &AttributeValue<'a>)> {
        self.list.iter()
    }

    pub fn missing(&self, attribute: &str) -> SemanticError {
        SemanticError::MissingRequiredAttribute {
            tag: self.tag.to_string(),
            attribute: attribute.to_string(),
            line: self.line,
        }
    }

    pub fn conflict(&self, message: impl Into<String>) -> SemanticError {
        SemanticError::ConflictingAttributes {
            tag: self.tag.to_string(),
            message: message.into(),
            line: self.line,
        }
    }

    pub fn unknown_value(&self, attribute: &str, value: &str) -> SemanticError {
        SemanticError::UnknownEnumValue {
            tag: self.tag.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
            line: self.line,
        }
    }

    fn wrong_type(&self, attribute: &str, expected: &'static str, found: &AttributeValue<'_>) -> SemanticError {
        SemanticError::WrongAttributeType {
            tag: self.tag.to_string(),
            attribute: attribute.to_string(),
            expected,
            found: found.type_name().to_string(),
            line: self.line,
        }
    }

    /// Look up `name` and convert it, failing if it has the wrong form
    fn typed<T>(
        &self,
        name: &str,
        expected: &'static str,
        convert: impl FnOnce(&AttributeValue<'a>) -> Option<T>,
    ) -> Result<Option<T>, SemanticError> {
        match self.list.get(name) {
            None => Ok(None),
            Some(value) => convert(value)
                .map(Some)
                .ok_or_else(|| self.wrong_type(name, expected, value)),
        }
    }

    fn require<T>(&self, name: &str, value: Option<T>) -> Result<T, SemanticError> {
        value.ok_or_else(|| self.missing(name))
    }

    pub fn quoted(&self, name: &str) -> Result<Option<String>, SemanticError> {
        self.typed(name, "quoted-string", |v| v.as_quoted().map(str::to_string))
    }

    pub fn required_quoted(&self, name: &str) -> Result<String, SemanticError> {
        let value = self.quoted(name)?;
        self.require(name, value)
    }

    pub fn enumerated(&self, name: &str) -> Result<Option<&'a str>, SemanticError> {
        self.typed(name, "enumerated-string", AttributeValue::as_enumerated)
    }

    pub fn required_enumerated(&self, name: &str) -> Result<&'a str, SemanticError> {
        let value = self.enumerated(name)?;
        self.require(name, value)
    }

    /// Enumerated attribute decoded with `parse`; unknown values are errors
    pub fn enum_value<T>(
        &self,
        name: &str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<Option<T>, SemanticError> {
        match self.enumerated(name)? {
            None => Ok(None),
            Some(text) => parse(text)
                .map(Some)
                .ok_or_else(|| self.unknown_value(name, text)),
        }
    }

    pub fn required_enum_value<T>(
        &self,
        name: &str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, SemanticError> {
        let value = self.enum_value(name, parse)?;
        self.require(name, value)
    }

    pub fn integer(&self, name: &str) -> Result<Option<u64>, SemanticError> {
        self.typed(name, "decimal-integer", AttributeValue::as_integer)
    }

    pub fn required_integer(&self, name: &str) -> Result<u64, SemanticError> {
        let value = self.integer(name)?;
        self.require(name, value)
    }

    pub fn float(&self, name: &str) -> Result<Option<f64>, SemanticError> {
        self.typed(name, "decimal-floating-point", AttributeValue::as_float)
    }

    pub fn hex(&self, name: &str) -> Result<Option<Vec<u8>>, SemanticError> {
        self.typed(name, "hexadecimal-sequence", |v| v.as_hex().map(<[u8]>::to_vec))
    }

    pub fn resolution(&self, name: &str) -> Result<Option<(u64, u64)>, SemanticError> {
        self.typed(name, "decimal-resolution", AttributeValue::as_resolution)
    }

    /// `YES`/`NO` attribute; absent means `false`
    pub fn flag(&self, name: &str) -> Result<Option<bool>, SemanticError> {
        self.enum_value(name, |v| match v {
            "YES" => Some(true),
            "NO" => Some(false),
            _ => None,
        })
    }

    pub fn date_time(&self, name: &str) -> Result<Option<DateTime<FixedOffset>>, SemanticError> {
        match self.quoted(name)? {
            None => Ok(None),
            Some(text) => parse_date_time(&text, self.line).map(Some),
        }
    }
}
