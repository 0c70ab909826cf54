//! Shared source-location types used by the tokenizer, error reporting and logging

pub mod span;

pub use span::{Position, SourceMap, Span};
