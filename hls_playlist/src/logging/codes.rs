//! Error, warning and success codes with their classification metadata
//!
//! Every code emitted by the parser is declared here together with the
//! metadata the loggers and the cargo-style summary print beside it.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Code attached to every log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: Code,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code: code.as_str(),
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
    pub const EVENT_LIMIT_REACHED: Code = Code::new("W001");
}

pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Line tokenizer codes
pub mod lexical {
    use super::Code;

    pub const MISSING_HEADER: Code = Code::new("E020");
    pub const LINE_TOO_LONG: Code = Code::new("E021");
    pub const TOO_MANY_LINES: Code = Code::new("E022");
}

/// Attribute-list syntax codes
pub mod attributes {
    use super::Code;

    pub const UNTERMINATED_QUOTE: Code = Code::new("E030");
    pub const DUPLICATE_ATTRIBUTE: Code = Code::new("E031");
    pub const INVALID_ATTRIBUTE_NAME: Code = Code::new("E032");
    pub const MALFORMED_NUMBER: Code = Code::new("E033");
    pub const MALFORMED_ATTRIBUTE: Code = Code::new("E034");
    pub const INVALID_HEX_SEQUENCE: Code = Code::new("E035");
    pub const ATTRIBUTE_LIMIT_EXCEEDED: Code = Code::new("E036");
}

/// Tag semantic codes
pub mod semantic {
    use super::Code;

    pub const INVALID_DURATION: Code = Code::new("E040");
    pub const INVALID_TIMESTAMP: Code = Code::new("E041");
    pub const UNKNOWN_ENUM_VALUE: Code = Code::new("E042");
    pub const MISSING_REQUIRED_ATTRIBUTE: Code = Code::new("E043");
    pub const UNEXPECTED_TAG_VALUE: Code = Code::new("E044");
    pub const MISSING_TAG_VALUE: Code = Code::new("E045");
    pub const INVALID_INTEGER: Code = Code::new("E046");
    pub const WRONG_ATTRIBUTE_TYPE: Code = Code::new("E047");
    pub const CONFLICTING_ATTRIBUTES: Code = Code::new("E048");
}

/// Playlist assembly codes
pub mod assembly {
    use super::Code;

    pub const MALFORMED_STRUCTURE: Code = Code::new("E060");
    pub const DANGLING_SEGMENT_TAGS: Code = Code::new("E061");
    pub const CONTENT_AFTER_END_LIST: Code = Code::new("E062");
    pub const MISSING_SEGMENT_DURATION: Code = Code::new("E063");
    pub const UNRESOLVED_BYTE_RANGE: Code = Code::new("E064");
    pub const SEGMENT_LIMIT_EXCEEDED: Code = Code::new("E065");
    pub const MIXED_PLAYLIST_TAGS: Code = Code::new("E066");
    pub const DUPLICATE_PLAYLIST_TAG: Code = Code::new("E067");
    pub const SEQUENCE_OVERFLOW: Code = Code::new("E068");
}

/// Model validation errors and warnings
pub mod validation {
    use super::Code;

    pub const MISSING_TARGET_DURATION: Code = Code::new("E080");
    pub const NON_CONTIGUOUS_SEQUENCE: Code = Code::new("E081");
    pub const DISCONTINUITY_MISMATCH: Code = Code::new("E082");
    pub const SEQUENCE_OVERFLOW: Code = Code::new("E083");

    pub const DURATION_EXCEEDS_TARGET: Code = Code::new("W080");
    pub const VERSION_TOO_LOW: Code = Code::new("W081");
    pub const VOD_WITHOUT_END_LIST: Code = Code::new("W082");
    pub const UNDECLARED_RENDITION_GROUP: Code = Code::new("W083");
    pub const DUPLICATE_DATE_RANGE_ID: Code = Code::new("W084");
}

pub mod batch {
    use super::Code;

    pub const DIRECTORY_NOT_FOUND: Code = Code::new("E100");
    pub const NO_PLAYLISTS_FOUND: Code = Code::new("E101");
    pub const BATCH_IO_ERROR: Code = Code::new("E102");
    pub const WORKER_FAILURE: Code = Code::new("E103");
    pub const TOO_MANY_FILES: Code = Code::new("E104");
}

pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const FILE_DISCOVERY_COMPLETE: Code = Code::new("I007");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const ASSEMBLY_COMPLETE: Code = Code::new("I060");
    pub const VALIDATION_COMPLETE: Code = Code::new("I080");
    pub const PLAYLIST_PARSED: Code = Code::new("I090");
    pub const BATCH_COMPLETE: Code = Code::new("I100");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        use Severity::*;

        let entries = [
            // System
            ErrorMetadata::new(
                system::INTERNAL_ERROR,
                "System",
                Critical,
                false,
                true,
                "Critical internal error",
                "File a bug report with the playlist that triggered it",
            ),
            ErrorMetadata::new(
                system::INITIALIZATION_FAILURE,
                "System",
                Critical,
                false,
                true,
                "Logging or configuration initialization failed",
                "Check build profile and runtime configuration",
            ),
            ErrorMetadata::new(
                system::CONFIGURATION_ERROR,
                "System",
                High,
                false,
                true,
                "Runtime configuration could not be loaded",
                "Fix the configuration file or unset the offending HLS_* variable",
            ),
            ErrorMetadata::new(
                system::EVENT_LIMIT_REACHED,
                "System",
                Low,
                true,
                false,
                "Further events for this file were dropped",
                "Fix the reported problems and re-run",
            ),
            // File processing
            ErrorMetadata::new(
                file_processing::FILE_NOT_FOUND,
                "FileProcessing",
                High,
                true,
                false,
                "Playlist file does not exist",
                "Verify the file path",
            ),
            ErrorMetadata::new(
                file_processing::INVALID_EXTENSION,
                "FileProcessing",
                Medium,
                true,
                false,
                "File does not have a .m3u8 or .m3u extension",
                "Rename the file or disable require_playlist_extension",
            ),
            ErrorMetadata::new(
                file_processing::FILE_TOO_LARGE,
                "FileProcessing",
                High,
                true,
                false,
                "Playlist exceeds the maximum file size",
                "Split the playlist or build with a larger max_file_size",
            ),
            ErrorMetadata::new(
                file_processing::EMPTY_FILE,
                "FileProcessing",
                Medium,
                true,
                false,
                "Playlist file is empty",
                "Provide a playlist starting with #EXTM3U",
            ),
            ErrorMetadata::new(
                file_processing::PERMISSION_DENIED,
                "FileProcessing",
                High,
                true,
                false,
                "Insufficient permissions to read the file",
                "Check file permissions",
            ),
            ErrorMetadata::new(
                file_processing::INVALID_ENCODING,
                "FileProcessing",
                High,
                true,
                false,
                "Playlist is not valid UTF-8",
                "Re-encode the playlist as UTF-8",
            ),
            ErrorMetadata::new(
                file_processing::IO_ERROR,
                "FileProcessing",
                High,
                true,
                false,
                "I/O error while reading the playlist",
                "Check disk and file system health",
            ),
            ErrorMetadata::new(
                file_processing::INVALID_PATH,
                "FileProcessing",
                Medium,
                true,
                false,
                "Path is not a regular file",
                "Pass a playlist file or a directory in batch mode",
            ),
            // Tokenizer
            ErrorMetadata::new(
                lexical::MISSING_HEADER,
                "Lexical",
                High,
                false,
                true,
                "First line is not #EXTM3U",
                "Start the playlist with the #EXTM3U header",
            ),
            ErrorMetadata::new(
                lexical::LINE_TOO_LONG,
                "Lexical",
                High,
                false,
                true,
                "Line exceeds the maximum line length",
                "Shorten the line or raise max_line_length",
            ),
            ErrorMetadata::new(
                lexical::TOO_MANY_LINES,
                "Lexical",
                High,
                false,
                true,
                "Playlist exceeds the maximum line count",
                "Split the playlist or raise max_line_count",
            ),
            // Attribute lists
            ErrorMetadata::new(
                attributes::UNTERMINATED_QUOTE,
                "AttributeSyntax",
                High,
                false,
                true,
                "Quoted string is missing its closing quote",
                "Close the quoted string",
            ),
            ErrorMetadata::new(
                attributes::DUPLICATE_ATTRIBUTE,
                "AttributeSyntax",
                High,
                false,
                true,
                "Attribute name appears twice in one list",
                "Remove the duplicate attribute",
            ),
            ErrorMetadata::new(
                attributes::INVALID_ATTRIBUTE_NAME,
                "AttributeSyntax",
                High,
                false,
                true,
                "Attribute name contains characters outside A-Z, 0-9 and '-'",
                "Use upper-case attribute names",
            ),
            ErrorMetadata::new(
                attributes::MALFORMED_NUMBER,
                "AttributeSyntax",
                High,
                false,
                true,
                "Numeric attribute value is malformed",
                "Use a decimal integer, decimal float, resolution or byte range",
            ),
            ErrorMetadata::new(
                attributes::MALFORMED_ATTRIBUTE,
                "AttributeSyntax",
                High,
                false,
                true,
                "Attribute is not of the form NAME=VALUE",
                "Add the missing '=' or value",
            ),
            ErrorMetadata::new(
                attributes::INVALID_HEX_SEQUENCE,
                "AttributeSyntax",
                High,
                false,
                true,
                "Hexadecimal sequence contains invalid digits",
                "Use 0x followed by hexadecimal digits",
            ),
            ErrorMetadata::new(
                attributes::ATTRIBUTE_LIMIT_EXCEEDED,
                "AttributeSyntax",
                High,
                false,
                true,
                "Attribute list exceeds a configured limit",
                "Reduce the attribute count or value length",
            ),
            // Tag semantics
            ErrorMetadata::new(
                semantic::INVALID_DURATION,
                "Semantic",
                High,
                false,
                true,
                "Duration is not a non-negative decimal number",
                "Write durations as decimal seconds, e.g. 9.009",
            ),
            ErrorMetadata::new(
                semantic::INVALID_TIMESTAMP,
                "Semantic",
                High,
                false,
                true,
                "Date-time is not ISO-8601 with a time zone",
                "Use a form like 2010-02-19T14:54:23.031+08:00",
            ),
            ErrorMetadata::new(
                semantic::UNKNOWN_ENUM_VALUE,
                "Semantic",
                High,
                false,
                true,
                "Enumerated attribute has a value outside its allowed set",
                "Use one of the values listed for the attribute",
            ),
            ErrorMetadata::new(
                semantic::MISSING_REQUIRED_ATTRIBUTE,
                "Semantic",
                High,
                false,
                true,
                "A required attribute or value is absent",
                "Add the required attribute",
            ),
            ErrorMetadata::new(
                semantic::UNEXPECTED_TAG_VALUE,
                "Semantic",
                High,
                false,
                true,
                "Tag takes no value but one was given",
                "Remove the text after the tag name",
            ),
            ErrorMetadata::new(
                semantic::MISSING_TAG_VALUE,
                "Semantic",
                High,
                false,
                true,
                "Tag requires a value but none was given",
                "Add ':' and the tag value",
            ),
            ErrorMetadata::new(
                semantic::INVALID_INTEGER,
                "Semantic",
                High,
                false,
                true,
                "Value is not a non-negative decimal integer",
                "Write the value as a plain decimal integer",
            ),
            ErrorMetadata::new(
                semantic::WRONG_ATTRIBUTE_TYPE,
                "Semantic",
                High,
                false,
                true,
                "Attribute value has the wrong type",
                "Check quoting and number format for the attribute",
            ),
            ErrorMetadata::new(
                semantic::CONFLICTING_ATTRIBUTES,
                "Semantic",
                High,
                false,
                true,
                "Attributes present together that must not be",
                "Remove one of the conflicting attributes",
            ),
            // Assembly
            ErrorMetadata::new(
                assembly::MALFORMED_STRUCTURE,
                "Assembly",
                High,
                false,
                true,
                "Line is not valid at this position in the playlist",
                "Check tag placement against RFC 8216",
            ),
            ErrorMetadata::new(
                assembly::DANGLING_SEGMENT_TAGS,
                "Assembly",
                High,
                false,
                true,
                "Segment tags are not followed by a URI",
                "Add the segment URI or remove the trailing tags",
            ),
            ErrorMetadata::new(
                assembly::CONTENT_AFTER_END_LIST,
                "Assembly",
                High,
                false,
                true,
                "Content follows #EXT-X-ENDLIST",
                "Move #EXT-X-ENDLIST to the end of the playlist",
            ),
            ErrorMetadata::new(
                assembly::MISSING_SEGMENT_DURATION,
                "Assembly",
                High,
                false,
                true,
                "Media segment URI has no preceding #EXTINF",
                "Add #EXTINF before the segment URI",
            ),
            ErrorMetadata::new(
                assembly::UNRESOLVED_BYTE_RANGE,
                "Assembly",
                High,
                false,
                true,
                "Byte range has no offset and no previous sub-range of the same resource",
                "Give the byte range an explicit @offset",
            ),
            ErrorMetadata::new(
                assembly::SEGMENT_LIMIT_EXCEEDED,
                "Assembly",
                High,
                false,
                true,
                "Playlist exceeds the maximum segment count",
                "Split the playlist or raise max_segments",
            ),
            ErrorMetadata::new(
                assembly::MIXED_PLAYLIST_TAGS,
                "Assembly",
                High,
                false,
                true,
                "Media playlist and master playlist tags are mixed",
                "Split into a master playlist and media playlists",
            ),
            ErrorMetadata::new(
                assembly::DUPLICATE_PLAYLIST_TAG,
                "Assembly",
                High,
                false,
                true,
                "Playlist-level tag appears more than once",
                "Keep a single occurrence of the tag",
            ),
            ErrorMetadata::new(
                assembly::SEQUENCE_OVERFLOW,
                "Assembly",
                High,
                false,
                true,
                "Media or discontinuity sequence number exceeds 2^64-1",
                "Lower #EXT-X-MEDIA-SEQUENCE or #EXT-X-DISCONTINUITY-SEQUENCE",
            ),
            // Validation
            ErrorMetadata::new(
                validation::MISSING_TARGET_DURATION,
                "Validation",
                High,
                false,
                true,
                "Media playlist has no #EXT-X-TARGETDURATION",
                "Add #EXT-X-TARGETDURATION",
            ),
            ErrorMetadata::new(
                validation::NON_CONTIGUOUS_SEQUENCE,
                "Validation",
                High,
                false,
                true,
                "Media sequence numbers are not contiguous",
                "Rebuild the document from the playlist text",
            ),
            ErrorMetadata::new(
                validation::DISCONTINUITY_MISMATCH,
                "Validation",
                High,
                false,
                true,
                "Discontinuity sequence changes without #EXT-X-DISCONTINUITY",
                "Rebuild the document from the playlist text",
            ),
            ErrorMetadata::new(
                validation::SEQUENCE_OVERFLOW,
                "Validation",
                High,
                false,
                true,
                "Segment sequence number cannot be represented",
                "Lower the starting sequence number",
            ),
            ErrorMetadata::new(
                validation::DURATION_EXCEEDS_TARGET,
                "Validation",
                Low,
                true,
                false,
                "Segment is longer than the target duration",
                "Raise #EXT-X-TARGETDURATION or re-segment the media",
            ),
            ErrorMetadata::new(
                validation::VERSION_TOO_LOW,
                "Validation",
                Low,
                true,
                false,
                "Declared version is lower than the features in use require",
                "Raise #EXT-X-VERSION",
            ),
            ErrorMetadata::new(
                validation::VOD_WITHOUT_END_LIST,
                "Validation",
                Low,
                true,
                false,
                "VOD playlist lacks #EXT-X-ENDLIST",
                "Append #EXT-X-ENDLIST",
            ),
            ErrorMetadata::new(
                validation::UNDECLARED_RENDITION_GROUP,
                "Validation",
                Low,
                true,
                false,
                "Variant references a rendition group with no #EXT-X-MEDIA",
                "Declare the group with #EXT-X-MEDIA",
            ),
            ErrorMetadata::new(
                validation::DUPLICATE_DATE_RANGE_ID,
                "Validation",
                Low,
                true,
                false,
                "Two date ranges share an ID but differ in start date",
                "Give each date range a unique ID",
            ),
            // Batch
            ErrorMetadata::new(
                batch::DIRECTORY_NOT_FOUND,
                "Batch",
                High,
                true,
                false,
                "Batch directory does not exist",
                "Verify the directory path",
            ),
            ErrorMetadata::new(
                batch::NO_PLAYLISTS_FOUND,
                "Batch",
                Medium,
                true,
                false,
                "No .m3u8 or .m3u files were found",
                "Check the directory or enable recursive discovery",
            ),
            ErrorMetadata::new(
                batch::BATCH_IO_ERROR,
                "Batch",
                High,
                true,
                false,
                "I/O error while walking the directory",
                "Check directory permissions",
            ),
            ErrorMetadata::new(
                batch::WORKER_FAILURE,
                "Batch",
                Critical,
                false,
                true,
                "A batch worker thread panicked",
                "Re-run sequentially to isolate the failing file",
            ),
            ErrorMetadata::new(
                batch::TOO_MANY_FILES,
                "Batch",
                Medium,
                true,
                false,
                "Directory holds more playlists than the batch limit",
                "Use --max-files or process subdirectories separately",
            ),
        ];

        let mut registry = HashMap::with_capacity(entries.len());
        for metadata in entries {
            registry.insert(metadata.code, metadata);
        }
        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_codes_have_metadata() {
        for code in [
            lexical::MISSING_HEADER,
            attributes::DUPLICATE_ATTRIBUTE,
            semantic::INVALID_DURATION,
            assembly::CONTENT_AFTER_END_LIST,
            assembly::SEQUENCE_OVERFLOW,
            validation::DURATION_EXCEEDS_TARGET,
            validation::SEQUENCE_OVERFLOW,
            batch::NO_PLAYLISTS_FOUND,
        ] {
            assert!(get_error_metadata(code.as_str()).is_some(), "{}", code);
        }
    }

    #[test]
    fn test_warning_codes_are_recoverable() {
        assert_eq!(
            get_severity(validation::VERSION_TOO_LOW.as_str()),
            Severity::Low
        );
        let metadata = get_error_metadata(validation::VOD_WITHOUT_END_LIST.as_str()).unwrap();
        assert!(metadata.recoverable);
        assert!(!metadata.requires_halt);
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_category("X999"), "Unknown");
        assert_eq!(get_severity("X999"), Severity::Medium);
        assert!(get_error_metadata("X999").is_none());
    }

    #[test]
    fn test_sequence_overflow_halts_parse() {
        for code in [assembly::SEQUENCE_OVERFLOW, validation::SEQUENCE_OVERFLOW] {
            let metadata = get_error_metadata(code.as_str()).unwrap();
            assert!(metadata.requires_halt);
            assert!(!metadata.recoverable);
        }
    }
}
