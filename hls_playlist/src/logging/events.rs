//! Diagnostic events raised while reading, parsing and validating playlists

use super::codes::{self, Code};
use crate::utils::Span;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Log severity levels, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Code used by `log_info!` events
pub const INFO_CODE: Code = Code::new("I000");
/// Code used by `log_debug!` events
pub const DEBUG_CODE: Code = Code::new("D000");

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    /// Playlist line the event refers to
    pub span: Option<Span>,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    pub fn new(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: message.to_string(),
            span: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Error, code, message)
    }

    pub fn warning(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Warning, code, message)
    }

    /// Info event carrying a success code
    pub fn success(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Info, code, message)
    }

    pub fn info(message: &str) -> Self {
        Self::new(LogLevel::Info, INFO_CODE, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::new(LogLevel::Debug, DEBUG_CODE, message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn line(&self) -> Option<u32> {
        self.span.map(|span| span.line())
    }

    /// Registry category, e.g. `Lexical` or `Validation`
    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.code.as_str()).as_str()
    }

    /// `[LEVEL] CODE line N: message`, the line part only when known
    pub fn format(&self) -> String {
        match self.line() {
            Some(line) => format!(
                "[{}] {} line {}: {}",
                self.level.as_str(),
                self.code,
                line,
                self.message
            ),
            None => format!("[{}] {}: {}", self.level.as_str(), self.code, self.message),
        }
    }

    /// One JSON object; errors and warnings also carry the registry's advice
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "category": self.category(),
            "message": self.message,
        });

        if let Some(line) = self.line() {
            json["line"] = line.into();
        }
        if let Some(metadata) = codes::get_error_metadata(self.code.as_str()) {
            json["severity"] = metadata.severity.as_str().into();
            json["recoverable"] = metadata.recoverable.into();
            json["fatal"] = metadata.requires_halt.into();
            json["description"] = metadata.description.into();
            json["help"] = metadata.recommended_action.into();
        }
        if !self.context.is_empty() {
            json["context"] = serde_json::to_value(&self.context)?;
        }

        serde_json::to_string(&json)
    }
}
