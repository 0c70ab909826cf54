// RUNTIME PREFERENCES (User Experience)

use crate::logging::events::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a boolean or numeric preference from the environment, falling back to `default`
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to reject files without a .m3u8 or .m3u extension
    pub require_playlist_extension: bool,

    /// Whether to log read timings for each file
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_playlist_extension: env_or(env_vars::REQUIRE_PLAYLIST_EXTENSION, false),
            enable_performance_logging: env_or(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPreferences {
    /// Whether a UTF-8 byte order mark before `#EXTM3U` is tolerated
    pub allow_byte_order_mark: bool,

    /// Whether `#EXTINF` must contain the comma separating duration and title
    pub require_extinf_comma: bool,

    /// Whether unrecognized tags are kept in the document
    pub preserve_unknown_tags: bool,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            allow_byte_order_mark: env_or(env_vars::PARSER_ALLOW_BOM, true),
            require_extinf_comma: env_or(env_vars::PARSER_REQUIRE_EXTINF_COMMA, false),
            preserve_unknown_tags: env_or(env_vars::PARSER_PRESERVE_UNKNOWN_TAGS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPreferences {
    /// Warn when a segment runs past the target duration plus tolerance
    pub warn_on_duration_overrun: bool,

    /// Warn when the declared version is lower than the features in use require
    pub check_version_compatibility: bool,

    /// Warn when a variant references a rendition group nobody declares
    pub check_rendition_groups: bool,
}

impl Default for ValidationPreferences {
    fn default() -> Self {
        Self {
            warn_on_duration_overrun: env_or(env_vars::VALIDATION_DURATION_OVERRUN, true),
            check_version_compatibility: env_or(env_vars::VALIDATION_VERSION_COMPAT, true),
            check_rendition_groups: env_or(env_vars::VALIDATION_RENDITION_GROUPS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Whether to include stage timings in logs
    pub log_performance_events: bool,

    /// Whether to print the cargo-style summary after batch runs
    pub enable_cargo_style_output: bool,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env_or(env_vars::LOGGING_LOG_PERFORMANCE, true),
            enable_cargo_style_output: env_or(env_vars::LOGGING_CARGO_STYLE, true),
            include_file_context: env_or(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read configuration file '{path}': {message}")]
    Io { path: PathBuf, message: String },

    #[error("Invalid configuration in '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub parser: ParserPreferences,
    pub validation: ValidationPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Load preferences from a TOML file; missing sections and keys keep their defaults
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

/// Environment variable names for runtime preferences
pub mod env_vars {
    pub const REQUIRE_PLAYLIST_EXTENSION: &str = "HLS_REQUIRE_PLAYLIST_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "HLS_ENABLE_PERFORMANCE_LOGGING";

    pub const PARSER_ALLOW_BOM: &str = "HLS_PARSER_ALLOW_BOM";
    pub const PARSER_REQUIRE_EXTINF_COMMA: &str = "HLS_PARSER_REQUIRE_EXTINF_COMMA";
    pub const PARSER_PRESERVE_UNKNOWN_TAGS: &str = "HLS_PARSER_PRESERVE_UNKNOWN_TAGS";

    pub const VALIDATION_DURATION_OVERRUN: &str = "HLS_VALIDATION_WARN_DURATION_OVERRUN";
    pub const VALIDATION_VERSION_COMPAT: &str = "HLS_VALIDATION_CHECK_VERSION";
    pub const VALIDATION_RENDITION_GROUPS: &str = "HLS_VALIDATION_CHECK_RENDITION_GROUPS";

    pub const LOGGING_USE_STRUCTURED: &str = "HLS_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "HLS_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "HLS_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "HLS_LOGGING_LOG_PERFORMANCE";
    pub const LOGGING_CARGO_STYLE: &str = "HLS_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "HLS_LOGGING_INCLUDE_FILE_CONTEXT";
}
