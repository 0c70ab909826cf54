//! Logging macros
//!
//! Context values may be any `Display` type:
//!
//! ```ignore
//! log_error!(codes::semantic::INVALID_DURATION, "bad duration",
//!     span = span, "value" => raw);
//! log_success!(codes::success::PLAYLIST_PARSED, "done", "segments" => 12);
//! ```

#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::error($code, &$message)
                .with_span($span)
                $(.with_context($key, &format!("{}", $value)))*
        )
    };

    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::error($code, &$message)
                $(.with_context($key, &format!("{}", $value)))*
        )
    };
}

#[macro_export]
macro_rules! log_warning {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::warning($code, &$message)
                .with_span($span)
                $(.with_context($key, &format!("{}", $value)))*
        )
    };

    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::warning($code, &$message)
                $(.with_context($key, &format!("{}", $value)))*
        )
    };
}

#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::success($code, &$message)
                $(.with_context($key, &format!("{}", $value)))*
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::is_enabled($crate::logging::LogLevel::Info) {
            $crate::logging::dispatch(
                $crate::logging::LogEvent::info(&$message)
                    $(.with_context($key, &format!("{}", $value)))*
            )
        }
    };
}

/// Skips building the event entirely unless debug output is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::is_enabled($crate::logging::LogLevel::Debug) {
            $crate::logging::dispatch(
                $crate::logging::LogEvent::debug(&$message)
                    $(.with_context($key, &format!("{}", $value)))*
            )
        }
    };
}
