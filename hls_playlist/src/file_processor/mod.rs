//! Playlist file reading

mod processor;

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT,
};
use crate::log_debug;
use crate::logging::codes;

pub use processor::{
    has_playlist_extension, FileMetadata, FileProcessingResult, FileProcessor,
    FileProcessorError, PLAYLIST_EXTENSIONS,
};

/// Check that every file processing code is registered and log the active limits
pub fn init_file_processor_logging() -> Result<(), String> {
    let file_codes = [
        codes::file_processing::FILE_NOT_FOUND,
        codes::file_processing::INVALID_EXTENSION,
        codes::file_processing::FILE_TOO_LARGE,
        codes::file_processing::EMPTY_FILE,
        codes::file_processing::PERMISSION_DENIED,
        codes::file_processing::INVALID_ENCODING,
        codes::file_processing::IO_ERROR,
        codes::file_processing::INVALID_PATH,
    ];
    if let Some(code) = file_codes
        .iter()
        .find(|code| codes::get_error_metadata(code.as_str()).is_none())
    {
        return Err(format!("No metadata registered for file code {}", code));
    }

    log_debug!("Playlist file limits",
        "max_file_size" => MAX_FILE_SIZE,
        "large_file_threshold" => LARGE_FILE_THRESHOLD,
        "max_line_count" => MAX_LINE_COUNT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging() {
        assert!(init_file_processor_logging().is_ok());
    }

    #[test]
    fn test_file_codes_registered_as_file_processing() {
        let error = FileProcessorError::FileNotFound {
            path: "missing.m3u8".to_string(),
        };
        assert_eq!(error.error_code().as_str(), "E005");
        assert_eq!(codes::get_category(error.error_code().as_str()), "FileProcessing");
        assert!(LARGE_FILE_THRESHOLD <= MAX_FILE_SIZE);
    }
}
