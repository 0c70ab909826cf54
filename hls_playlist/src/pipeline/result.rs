use crate::file_processor::FileMetadata;
use crate::lexical::TokenizerMetrics;
use crate::logging::{self, codes, LogEvent};
use crate::model::PlaylistDocument;
use crate::validation::ValidationMetrics;
use std::time::Duration;

/// Document plus the measurements taken while producing it
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub document: PlaylistDocument,
    /// Present when the text came from a file
    pub file_metadata: Option<FileMetadata>,
    pub tokenizer_metrics: TokenizerMetrics,
    pub validation_metrics: ValidationMetrics,
    pub source_bytes: usize,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        document: PlaylistDocument,
        tokenizer_metrics: TokenizerMetrics,
        validation_metrics: ValidationMetrics,
        source_bytes: usize,
        processing_duration: Duration,
    ) -> Self {
        Self {
            document,
            file_metadata: None,
            tokenizer_metrics,
            validation_metrics,
            source_bytes,
            processing_duration,
        }
    }

    pub fn with_file_metadata(mut self, metadata: FileMetadata) -> Self {
        self.file_metadata = Some(metadata);
        self
    }

    /// Lines per second, zero for an unmeasurably fast parse
    pub fn lines_per_second(&self) -> f64 {
        let secs = self.processing_duration.as_secs_f64();
        if secs > 0.0 {
            self.tokenizer_metrics.total_lines as f64 / secs
        } else {
            0.0
        }
    }

    /// Timing fields are added only when performance events are enabled
    pub fn log_success(&self, source_name: &str) {
        let mut event = LogEvent::success(codes::success::PLAYLIST_PARSED, "Playlist parsed")
            .with_context("source", source_name)
            .with_context("kind", self.document.kind.as_str())
            .with_context("segments", &self.document.segments.len().to_string())
            .with_context("variants", &self.document.variants.len().to_string())
            .with_context("warnings", &self.document.warnings.len().to_string());
        if logging::config::log_performance_events() {
            let millis = self.processing_duration.as_secs_f64() * 1000.0;
            event = event
                .with_context("duration_ms", &format!("{:.2}", millis))
                .with_context("lines_per_sec", &format!("{:.0}", self.lines_per_second()));
        }
        logging::dispatch(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlaylistKind;

    fn result_over(lines: usize, duration: Duration) -> PipelineResult {
        let metrics = TokenizerMetrics {
            total_lines: lines,
            ..TokenizerMetrics::default()
        };
        PipelineResult::new(
            PlaylistDocument::new(PlaylistKind::Media),
            metrics,
            ValidationMetrics::default(),
            0,
            duration,
        )
    }

    #[test]
    fn test_lines_per_second() {
        assert_eq!(result_over(500, Duration::from_millis(250)).lines_per_second(), 2000.0);
        assert_eq!(result_over(500, Duration::ZERO).lines_per_second(), 0.0);
    }
}
