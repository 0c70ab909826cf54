//! Line tokenizer
//!
//! Splits playlist text into physical lines and classifies each one as a
//! tag, a URI, or something to skip. Tag values are left raw for the
//! attribute and semantic stages.

pub mod error;
pub mod tokenizer;

use crate::config::ParserPreferences;
use crate::logging::codes;

pub use error::LexerError;
pub use tokenizer::{tokenize, LineKind, LineTokenizer, RawLine, TokenizerMetrics};

/// Tokenizer over `source` honoring the given parser preferences
pub fn create_tokenizer<'a>(source: &'a str, preferences: &ParserPreferences) -> LineTokenizer<'a> {
    LineTokenizer::with_preferences(source, preferences)
}

/// Check that every lexical error code is registered with metadata
pub fn init_lexical_logging() -> Result<(), String> {
    let lexical_codes = [
        codes::lexical::MISSING_HEADER,
        codes::lexical::LINE_TOO_LONG,
        codes::lexical::TOO_MANY_LINES,
    ];

    for code in lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_codes_registered() {
        assert!(init_lexical_logging().is_ok());
    }

    #[test]
    fn test_create_tokenizer_uses_preferences() {
        let preferences = ParserPreferences {
            allow_byte_order_mark: false,
            ..ParserPreferences::default()
        };
        let mut tokenizer = create_tokenizer("\u{feff}#EXTM3U\n", &preferences);
        assert!(matches!(tokenizer.next(), Some(Err(LexerError::MissingHeader { .. }))));
    }
}
