//! Playlist file reading
//!
//! A playlist is read whole, then decoded as UTF-8 so an encoding failure
//! can be reported against the line it occurs on.

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::FileProcessorPreferences;
use crate::error::ParseErrorKind;
use crate::logging::{codes, Code};
use crate::utils::Span;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Extensions recognized as playlists, lowercase
pub const PLAYLIST_EXTENSIONS: &[&str] = &["m3u8", "m3u"];

#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Not a playlist file: expected .m3u8 or .m3u, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("Playlist too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Playlist is empty; line 1 must be #EXTM3U")]
    EmptyFile,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 on line {line} of {path}")]
    InvalidEncoding { path: String, line: u32 },

    #[error("I/O error reading playlist: {message}")]
    IoError { message: String },

    #[error("Not a file: {path}")]
    InvalidPath { path: String },
}

impl FileProcessorError {
    pub fn error_code(&self) -> Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::EmptyFile => codes::file_processing::EMPTY_FILE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
        }
    }

    /// Parse failure class for errors caused by the file's content.
    /// Failures to reach the content at all have none.
    pub fn kind(&self) -> Option<ParseErrorKind> {
        match self {
            FileProcessorError::EmptyFile | FileProcessorError::InvalidEncoding { .. } => {
                Some(ParseErrorKind::MalformedLine)
            }
            _ => None,
        }
    }

    /// An empty file fails at the missing header on line 1
    pub fn line(&self) -> Option<u32> {
        match self {
            FileProcessorError::EmptyFile => Some(1),
            FileProcessorError::InvalidEncoding { line, .. } => Some(*line),
            _ => None,
        }
    }

    fn from_io(error: &std::io::Error, path: &Path) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            ErrorKind::NotFound => FileProcessorError::FileNotFound { path },
            ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied { path },
            _ => FileProcessorError::IoError {
                message: format!("{}: {}", path, error),
            },
        }
    }
}

/// What is known about a playlist file once it has been read
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    pub size: u64,
    /// Lowercased extension, if any
    pub extension: Option<String>,
    pub line_count: usize,
    pub is_playlist_file: bool,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

/// Whether a path carries one of the playlist extensions (case-insensitive)
pub fn has_playlist_extension(path: &Path) -> bool {
    lowercase_extension(path).is_some_and(|ext| PLAYLIST_EXTENSIONS.contains(&ext.as_str()))
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

/// 1-based line holding byte `offset`
fn line_at(bytes: &[u8], offset: usize) -> u32 {
    let newlines = bytes[..offset.min(bytes.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    u32::try_from(newlines).map_or(u32::MAX, |n| n.saturating_add(1))
}

#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    /// Playlist text, still carrying any byte order mark
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

/// Reads playlist files. The size limit is a compile-time constant; the
/// extension requirement and performance logging are runtime preferences.
#[derive(Debug, Clone)]
pub struct FileProcessor {
    pub require_playlist_extension: bool,
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            require_playlist_extension: false,
            enable_performance_logging: true,
        }
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_playlist_extension: prefs.require_playlist_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_playlist_extension_required(mut self, required: bool) -> Self {
        self.require_playlist_extension = required;
        self
    }

    /// Check, read and decode a playlist file. Every failure is logged here.
    pub fn process_file(
        &self,
        file_path: impl AsRef<Path>,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();
        let file_path = file_path.as_ref();
        let display = file_path.display().to_string();
        log_debug!("Reading playlist", "file" => display);

        let result = self.read_playlist(file_path, start_time);
        match &result {
            Ok(result) => self.log_read(result, &display),
            Err(error) => match error.line() {
                Some(line) => log_error!(error.error_code(), error.to_string(),
                    span = Span::at_line(line),
                    "file" => display),
                None => log_error!(error.error_code(), error.to_string(), "file" => display),
            },
        }
        result
    }

    fn read_playlist(
        &self,
        file_path: &Path,
        start_time: Instant,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let path = file_path
            .canonicalize()
            .map_err(|e| FileProcessorError::from_io(&e, file_path))?;
        let stat = fs::metadata(&path).map_err(|e| FileProcessorError::from_io(&e, &path))?;
        if !stat.is_file() {
            return Err(FileProcessorError::InvalidPath {
                path: file_path.display().to_string(),
            });
        }

        let extension = lowercase_extension(&path);
        let is_playlist_file = has_playlist_extension(&path);
        if self.require_playlist_extension && !is_playlist_file {
            return Err(FileProcessorError::InvalidExtension { extension });
        }
        if stat.len() > MAX_FILE_SIZE {
            return Err(FileProcessorError::FileTooLarge {
                size: stat.len(),
                max_size: MAX_FILE_SIZE,
            });
        }
        if stat.len() == 0 {
            return Err(FileProcessorError::EmptyFile);
        }

        let bytes = fs::read(&path).map_err(|e| FileProcessorError::from_io(&e, &path))?;
        let source = String::from_utf8(bytes).map_err(|e| {
            let line = line_at(e.as_bytes(), e.utf8_error().valid_up_to());
            FileProcessorError::InvalidEncoding {
                path: file_path.display().to_string(),
                line,
            }
        })?;

        let metadata = FileMetadata {
            size: source.len() as u64,
            line_count: source.lines().count(),
            modified: stat.modified().ok(),
            path,
            extension,
            is_playlist_file,
        };
        Ok(FileProcessingResult {
            source,
            metadata,
            processing_duration: start_time.elapsed(),
        })
    }

    fn log_read(&self, result: &FileProcessingResult, file_path: &str) {
        let duration_ms = format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0);
        if self.enable_performance_logging {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "Playlist read",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "lines" => result.metadata.line_count,
                "duration_ms" => duration_ms,
                "is_large_file" => result.metadata.is_large_file()
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "Playlist read",
                "file" => file_path,
                "lines" => result.metadata.line_count
            );
        }
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}
