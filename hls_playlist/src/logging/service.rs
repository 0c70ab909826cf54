//! Logger sinks and the level-filtering service in front of them

use super::config;
use super::events::{LogEvent, LogLevel};
use crate::config::LoggingPreferences;
use std::sync::{Arc, Mutex, MutexGuard};

pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Service for the installed logging preferences
    pub fn with_config() -> Self {
        Self::from_preferences(config::get_runtime_preferences())
    }

    /// Console output is opt-in. Without it events land in a bounded
    /// in-memory buffer, so a library caller's parse prints nothing.
    pub fn from_preferences(preferences: &LoggingPreferences) -> Self {
        let logger: Arc<dyn Logger> = match (
            preferences.enable_console_logging,
            preferences.use_structured_logging,
        ) {
            (false, _) => Arc::new(MemoryLogger::new()),
            (true, true) => Arc::new(StructuredLogger),
            (true, false) => Arc::new(ConsoleLogger),
        };
        Self::new(logger, preferences.min_log_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

/// Human-readable lines on stderr; stdout carries playlist output
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        eprintln!("{}", event.format());
    }
}

/// JSON lines on stderr
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        match event.format_json() {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", event.format()),
        }
    }
}

/// Keeps the most recent events, up to the compile-time buffer size
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
    capacity: usize,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::with_capacity(config::get_error_buffer_size())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    fn events(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.events().clone()
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.events();
        if events.len() >= self.capacity {
            let excess = events.len() + 1 - self.capacity;
            events.drain(..excess);
        }
        events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_service_filters_by_level() {
        let memory = Arc::new(MemoryLogger::with_capacity(10));
        let service = LoggingService::new(memory.clone(), LogLevel::Warning);

        service.log_event(LogEvent::error(codes::lexical::MISSING_HEADER, "no header"));
        service.log_event(LogEvent::warning(codes::validation::VOD_WITHOUT_END_LIST, "no endlist"));
        service.log_event(LogEvent::info("parsed"));
        service.log_event(LogEvent::debug("line 4"));

        let logged: Vec<_> = memory.get_events().into_iter().map(|e| e.code).collect();
        assert_eq!(
            logged,
            vec![codes::lexical::MISSING_HEADER, codes::validation::VOD_WITHOUT_END_LIST]
        );
    }

    #[test]
    fn test_memory_logger_drops_oldest() {
        let memory = MemoryLogger::with_capacity(2);
        memory.log(&LogEvent::info("first"));
        memory.log(&LogEvent::info("second"));
        memory.log(&LogEvent::info("third"));

        let messages: Vec<_> = memory.get_events().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["second", "third"]);
    }

    #[test]
    fn test_console_disabled_uses_memory() {
        let preferences = LoggingPreferences {
            enable_console_logging: false,
            min_log_level: LogLevel::Error,
            ..LoggingPreferences::default()
        };
        let service = LoggingService::from_preferences(&preferences);
        assert_eq!(service.min_level(), LogLevel::Error);
        assert!(!service.should_log(LogLevel::Warning));
        assert!(service.should_log(LogLevel::Error));
    }
}
