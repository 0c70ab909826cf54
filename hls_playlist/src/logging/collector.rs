//! Per-playlist diagnostics gathered during a run, reported cargo-style

use super::codes;
use super::config;
use super::events::LogEvent;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// The playlist whose events the current thread is raising
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    /// Position of the file in the batch, 0 for single-file runs
    pub file_id: usize,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self { file_path, file_id }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingSummary {
    pub playlists: usize,
    pub failed_playlists: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
}

/// Errors and warnings keyed by playlist path
#[derive(Default)]
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn events(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Vec<LogEvent>>> {
        self.file_events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record an event for a playlist. Past the per-file limit one overflow
    /// warning is kept and later events are dropped; once the collector as a
    /// whole is full, events are dropped for every file.
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let per_file_limit = config::get_max_log_events_per_file();
        let mut events = self.events();
        let collector_full =
            events.values().map(Vec::len).sum::<usize>() >= config::get_max_error_collection();

        let file_events = events.entry(file_path.to_path_buf()).or_default();
        if file_events.len() < per_file_limit && !collector_full {
            file_events.push(event);
        } else if file_events.len() == per_file_limit {
            file_events.push(LogEvent::warning(
                codes::system::EVENT_LIMIT_REACHED,
                &format!("further diagnostics suppressed after {}", per_file_limit),
            ));
        }
    }

    /// Copy of every playlist's events, in path order
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        self.events().clone()
    }

    pub fn summary(&self) -> ProcessingSummary {
        let events = self.events();
        let mut summary = ProcessingSummary {
            playlists: events.len(),
            ..ProcessingSummary::default()
        };
        for file_events in events.values() {
            let errors = file_events.iter().filter(|e| e.is_error()).count();
            summary.failed_playlists += usize::from(errors > 0);
            summary.total_errors += errors;
            summary.total_warnings += file_events.iter().filter(|e| e.is_warning()).count();
        }
        summary
    }
}

/// Cargo-like block per playlist: `error[E062]: ...` followed by
/// `--> path:line`, the event context and the registry's help text.
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.snapshot() {
        // Errors first so a failed parse leads its block
        let ordered = events
            .iter()
            .filter(|e| e.is_error())
            .chain(events.iter().filter(|e| e.is_warning()));
        for event in ordered {
            let label = if event.is_error() { "error" } else { "warning" };
            let _ = writeln!(output, "{}[{}]: {}", label, event.code, event.message);
            match event.line() {
                Some(line) => {
                    let _ = writeln!(output, "  --> {}:{}", file_path.display(), line);
                }
                None => {
                    let _ = writeln!(output, "  --> {}", file_path.display());
                }
            }
            for (key, value) in &event.context {
                if key != "file" && key != "file_id" {
                    let _ = writeln!(output, "  = {}: {}", key, value);
                }
            }
            if event.is_error() {
                if let Some(metadata) = codes::get_error_metadata(event.code.as_str()) {
                    let _ = writeln!(output, "  = help: {}", metadata.recommended_action);
                }
            }
            output.push('\n');
        }
    }

    let summary = collector.summary();
    if summary.total_errors > 0 {
        let _ = writeln!(
            output,
            "error: {} error(s) in {} of {} playlist(s)",
            summary.total_errors, summary.failed_playlists, summary.playlists
        );
    }
    if summary.total_warnings > 0 {
        let _ = writeln!(output, "warning: {} warning(s) emitted", summary.total_warnings);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Span;

    #[test]
    fn test_record_and_summarize() {
        let collector = ErrorCollector::new();
        let bad = Path::new("bad.m3u8");
        let warn = Path::new("warn.m3u8");

        collector.record_event(
            bad,
            LogEvent::error(codes::lexical::MISSING_HEADER, "missing #EXTM3U"),
        );
        collector.record_event(
            warn,
            LogEvent::warning(codes::validation::VOD_WITHOUT_END_LIST, "no endlist"),
        );

        assert_eq!(
            collector.summary(),
            ProcessingSummary {
                playlists: 2,
                failed_playlists: 1,
                total_errors: 1,
                total_warnings: 1,
            }
        );
    }

    #[test]
    fn test_per_file_limit_adds_single_overflow_warning() {
        let collector = ErrorCollector::new();
        let path = Path::new("noisy.m3u8");
        let limit = config::get_max_log_events_per_file();

        for _ in 0..limit + 5 {
            collector.record_event(path, LogEvent::error(codes::system::INTERNAL_ERROR, "x"));
        }

        let snapshot = collector.snapshot();
        let events = &snapshot[path];
        assert_eq!(events.len(), limit + 1);
        assert_eq!(events[limit].code, codes::system::EVENT_LIMIT_REACHED);
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        let path = Path::new("live.m3u8");
        collector.record_event(
            path,
            LogEvent::warning(codes::validation::DURATION_EXCEEDS_TARGET, "segment too long"),
        );
        collector.record_event(
            path,
            LogEvent::error(codes::assembly::CONTENT_AFTER_END_LIST, "segment after ENDLIST")
                .with_span(Span::at_line(7))
                .with_context("uri", "seg9.ts")
                .with_context("file_id", "0"),
        );

        let output = format_cargo_style_errors(&collector);
        assert!(output.starts_with("error[E062]: segment after ENDLIST\n  --> live.m3u8:7\n"));
        assert!(output.contains("  = uri: seg9.ts"));
        assert!(!output.contains("file_id"));
        assert!(output.contains("  = help:"));
        assert!(output.contains("warning[W080]: segment too long\n  --> live.m3u8\n"));
        assert!(output.contains("error: 1 error(s) in 1 of 1 playlist(s)"));
    }
}
