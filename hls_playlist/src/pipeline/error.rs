use crate::assembler::AssemblyError;
use crate::error::ParseErrorKind;
use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::semantic::SemanticError;
use crate::validation::ValidationError;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Line {}: {0}", .0.line())]
    Lexical(#[from] LexerError),

    #[error("Line {}: {0}", .0.line())]
    Semantic(#[from] SemanticError),

    #[error("Line {}: {0}", .0.line())]
    Assembly(#[from] AssemblyError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    /// Parse failure class; `None` when the text was never reached
    pub fn kind(&self) -> Option<ParseErrorKind> {
        match self {
            PipelineError::FileProcessing(e) => e.kind(),
            PipelineError::Lexical(e) => Some(e.kind()),
            PipelineError::Semantic(e) => Some(e.kind()),
            PipelineError::Assembly(e) => Some(e.kind()),
            PipelineError::Validation(e) => Some(e.kind()),
            PipelineError::Pipeline { .. } => None,
        }
    }

    /// 1-based line the failure was detected on, when it is tied to one
    pub fn line(&self) -> Option<u32> {
        match self {
            PipelineError::FileProcessing(e) => e.line(),
            PipelineError::Lexical(e) => Some(e.line()),
            PipelineError::Semantic(e) => Some(e.line()),
            PipelineError::Assembly(e) => Some(e.line()),
            PipelineError::Validation(e) => e.line(),
            PipelineError::Pipeline { .. } => None,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            PipelineError::FileProcessing(e) => e.error_code(),
            PipelineError::Lexical(e) => e.error_code(),
            PipelineError::Semantic(e) => e.error_code(),
            PipelineError::Assembly(e) => e.error_code(),
            PipelineError::Validation(e) => e.error_code(),
            PipelineError::Pipeline { .. } => codes::system::INTERNAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_line() {
        let error = PipelineError::from(AssemblyError::ContentAfterEndList { line: 9 });
        assert!(error.to_string().starts_with("Line 9: "));
        assert_eq!(error.line(), Some(9));
        assert_eq!(error.kind(), Some(ParseErrorKind::ContentAfterEndList));
    }

    #[test]
    fn test_validation_error_line() {
        let error = PipelineError::from(ValidationError::DiscontinuityMismatch {
            sequence: 3,
            expected: 1,
            found: 2,
            line: Some(12),
        });
        assert_eq!(error.line(), Some(12));
        assert_eq!(error.kind(), Some(ParseErrorKind::MalformedLine));

        let error = PipelineError::from(ValidationError::MissingTargetDuration);
        assert_eq!(error.line(), None);
    }

    #[test]
    fn test_file_errors_have_no_line() {
        let error = PipelineError::from(FileProcessorError::FileNotFound {
            path: "x.m3u8".to_string(),
        });
        assert_eq!(error.line(), None);
        assert_eq!(error.kind(), None);
        assert_eq!(error.error_code(), codes::file_processing::FILE_NOT_FOUND);
    }

    #[test]
    fn test_pipeline_error_constructor() {
        let error = PipelineError::pipeline_error("worker panicked");
        assert_eq!(error.error_code(), codes::system::INTERNAL_ERROR);
        assert!(error.to_string().contains("worker panicked"));
    }
}
