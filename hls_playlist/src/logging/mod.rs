//! Global logging for the playlist parser
//!
//! Nothing is emitted until [`init_global_logging`] runs, so library callers
//! that never initialize logging get a silent parser. Events raised while a
//! file context is active are also recorded per file for the batch summary.

#[macro_use]
pub mod macros;

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod service;

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use collector::{ErrorCollector, FileProcessingContext, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

/// Logger and collector are installed together so no thread sees one without the other
struct GlobalLogging {
    service: Arc<LoggingService>,
    collector: Arc<ErrorCollector>,
}

static GLOBAL_LOGGING: OnceLock<GlobalLogging> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = const { RefCell::new(None) };
}

pub fn init_global_logging() -> Result<(), String> {
    init_global_logging_with_service(Arc::new(LoggingService::with_config()))?;

    // Every stage must be able to describe its codes
    let stage_codes = [
        codes::lexical::MISSING_HEADER,
        codes::attributes::MALFORMED_ATTRIBUTE,
        codes::semantic::MISSING_REQUIRED_ATTRIBUTE,
        codes::assembly::DANGLING_SEGMENT_TAGS,
        codes::validation::MISSING_TARGET_DURATION,
    ];
    for code in stage_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    log_success!(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
        "profile" => crate::config::build_info::profile()
    );

    Ok(())
}

pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGING
        .set(GlobalLogging {
            service,
            collector: Arc::new(ErrorCollector::new()),
        })
        .map_err(|_| "Global logging already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGING.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGING.get().map(|global| global.service.as_ref())
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_LOGGING.get().map(|global| global.collector.as_ref())
}

/// Whether an event at `level` would reach the logger
pub fn is_enabled(level: LogLevel) -> bool {
    try_get_global_logger().is_some_and(|logger| logger.should_log(level))
}

pub fn set_file_context(file_path: PathBuf, file_id: usize) {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(FileProcessingContext::new(file_path, file_id));
    });
}

pub fn clear_file_context() {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with events attributed to `file_path` on this thread
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_file_context(file_path, file_id);
    let result = f();
    clear_file_context();
    result
}

pub fn get_current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Deliver an event built by one of the logging macros.
///
/// Adds file context, hands the event to the global logger and records
/// errors and warnings in the collector under the current file.
pub fn dispatch(mut event: LogEvent) {
    if !is_initialized() {
        return;
    }

    config::truncate_message(&mut event.message);

    let file_ctx = get_current_file_context();
    if let Some(ctx) = &file_ctx {
        if config::include_file_context() {
            event = event
                .with_context("file", &ctx.file_path.display().to_string())
                .with_context("file_id", &ctx.file_id.to_string());
        }
    }

    if let (Some(ctx), Some(collector)) = (&file_ctx, try_get_global_error_collector()) {
        if event.is_error() || event.is_warning() {
            collector.record_event(&ctx.file_path, event.clone());
        }
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Cargo-style report of everything collected so far, if logging is initialized
pub fn cargo_style_summary() -> Option<String> {
    try_get_global_error_collector().map(collector::format_cargo_style_errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_global_logging_initialization() {
        if is_initialized() {
            return;
        }

        // Another test may initialize first; either way logging ends up initialized
        let _ = init_global_logging();
        assert!(is_initialized());
    }

    #[test]
    fn test_file_context_management() {
        let file_path = PathBuf::from("context.m3u8");

        assert!(get_current_file_context().is_none());

        set_file_context(file_path.clone(), 1);
        let context = get_current_file_context();
        assert_eq!(context.map(|c| c.file_path), Some(file_path));

        clear_file_context();
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_with_file_context() {
        let file_path = PathBuf::from("scoped.m3u8");

        let result = with_file_context(file_path.clone(), 2, || {
            let context = get_current_file_context();
            assert_eq!(context.map(|c| c.file_id), Some(2));
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_errors_recorded_under_file_context() {
        let _ = init_global_logging();
        let path = PathBuf::from("collected-error-test.m3u8");

        with_file_context(path.clone(), 3, || {
            log_error!(
                codes::semantic::INVALID_DURATION,
                "duration is not a number",
                span = crate::utils::Span::at_line(4),
                "value" => "abc"
            );
        });

        let collector = try_get_global_error_collector().unwrap();
        let snapshot = collector.snapshot();
        let errors = &snapshot[Path::new("collected-error-test.m3u8")];
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line(), Some(4));
        assert_eq!(errors[0].context.get("value").map(String::as_str), Some("abc"));
    }
}
