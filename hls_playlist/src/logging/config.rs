//! Logging settings: compile-time buffer limits plus preferences installed once at startup

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install the preferences used by [`init_global_logging`](super::init_global_logging).
/// Must run before logging is initialized; a second call is rejected.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime logging preferences already initialized".to_string())
}

/// Installed preferences, or defaults read from the environment
pub fn get_runtime_preferences() -> &'static LoggingPreferences {
    RUNTIME_PREFERENCES.get_or_init(LoggingPreferences::default)
}

pub fn log_performance_events() -> bool {
    get_runtime_preferences().log_performance_events
}

pub fn use_cargo_style_output() -> bool {
    get_runtime_preferences().enable_cargo_style_output
}

pub fn include_file_context() -> bool {
    get_runtime_preferences().include_file_context
}

pub fn get_error_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_log_events_per_file() -> usize {
    MAX_LOG_EVENTS_PER_FILE
}

/// Total events the collector keeps across all files
pub fn get_max_error_collection() -> usize {
    MAX_ERROR_COLLECTION
}

/// Limits and preferences in effect, one `name: value` per line
pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();
    let entries: [(&str, String); 9] = [
        ("min level", preferences.min_log_level.as_str().to_string()),
        ("console", preferences.enable_console_logging.to_string()),
        ("json lines", preferences.use_structured_logging.to_string()),
        ("timing fields", preferences.log_performance_events.to_string()),
        ("cargo-style report", preferences.enable_cargo_style_output.to_string()),
        ("file context", preferences.include_file_context.to_string()),
        ("buffered events", LOG_BUFFER_SIZE.to_string()),
        ("diagnostics per playlist", MAX_LOG_EVENTS_PER_FILE.to_string()),
        ("message length", MAX_LOG_MESSAGE_LENGTH.to_string()),
    ];
    let mut summary = String::from("Logging:");
    for (name, value) in entries {
        summary.push_str(&format!("\n  {}: {}", name, value));
    }
    summary
}

/// Cut a message to the configured maximum on a character boundary
pub fn truncate_message(message: &mut String) {
    let max = MAX_LOG_MESSAGE_LENGTH;
    if message.len() > max {
        let mut cut = max;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
        message.push_str("...");
    }
}
