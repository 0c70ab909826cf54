use super::error::LexerError;
use crate::config::compile_time::file_processing::MAX_LINE_COUNT;
use crate::config::compile_time::lexical::MAX_LINE_LENGTH;
use crate::config::ParserPreferences;
use crate::tags::{self, TagKind};
use crate::utils::Span;

const HEADER: &str = "#EXTM3U";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Classification of one physical line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    /// `#EXT...` line; `raw_attributes` is the text after the first colon
    Tag {
        kind: TagKind,
        raw_attributes: Option<&'a str>,
    },
    /// Segment or variant URI, verbatim
    Uri { text: &'a str },
    /// Blank line or comment
    Ignorable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawLine<'a> {
    /// 1-based line number
    pub number: u32,
    pub span: Span,
    pub kind: LineKind<'a>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenizerMetrics {
    pub total_lines: usize,
    pub tag_lines: usize,
    pub uri_lines: usize,
    pub ignorable_lines: usize,
    pub unrecognized_tags: usize,
    pub longest_line: usize,
}

impl TokenizerMetrics {
    fn record(&mut self, line: &RawLine<'_>) {
        self.total_lines += 1;
        self.longest_line = self.longest_line.max(line.span.byte_len());
        match &line.kind {
            LineKind::Tag { kind, .. } => {
                self.tag_lines += 1;
                if !kind.is_recognized() {
                    self.unrecognized_tags += 1;
                }
            }
            LineKind::Uri { .. } => self.uri_lines += 1,
            LineKind::Ignorable => self.ignorable_lines += 1,
        }
    }
}

/// Lazy line classifier over playlist text.
///
/// Yields each line once, in order. The first error ends the iteration.
pub struct LineTokenizer<'a> {
    remaining: &'a str,
    offset: usize,
    line_number: u32,
    allow_bom: bool,
    finished: bool,
    metrics: TokenizerMetrics,
}

impl<'a> LineTokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_preferences(source, &ParserPreferences::default())
    }

    pub fn with_preferences(source: &'a str, preferences: &ParserPreferences) -> Self {
        Self {
            remaining: source,
            offset: 0,
            line_number: 0,
            allow_bom: preferences.allow_byte_order_mark,
            finished: false,
            metrics: TokenizerMetrics::default(),
        }
    }

    pub fn metrics(&self) -> &TokenizerMetrics {
        &self.metrics
    }

    fn fail(&mut self, error: LexerError) -> Option<Result<RawLine<'a>, LexerError>> {
        self.finished = true;
        Some(Err(error))
    }

    fn classify(&self, raw: &'a str, start: usize, number: u32) -> Result<RawLine<'a>, LexerError> {
        if raw.len() > MAX_LINE_LENGTH {
            return Err(LexerError::LineTooLong {
                line: number,
                length: raw.len(),
                limit: MAX_LINE_LENGTH,
            });
        }

        let (text, start) = match raw.strip_prefix(BYTE_ORDER_MARK) {
            Some(rest) if number == 1 && self.allow_bom => (rest, start + BYTE_ORDER_MARK.len_utf8()),
            _ => (raw, start),
        };
        let text = text.trim_end();
        let span = Span::for_line(start, number, text);

        if number == 1 {
            if text != HEADER {
                return Err(LexerError::MissingHeader {
                    found: text.chars().take(64).collect(),
                });
            }
            return Ok(RawLine {
                number,
                span,
                kind: LineKind::Tag {
                    kind: TagKind::ExtM3u,
                    raw_attributes: None,
                },
            });
        }

        let kind = if text.is_empty() {
            LineKind::Ignorable
        } else if text.starts_with("#EXT") {
            let (name, raw_attributes) = match text.split_once(':') {
                Some((name, value)) => (name, Some(value)),
                None => (text, None),
            };
            LineKind::Tag {
                kind: tags::lookup(name),
                raw_attributes,
            }
        } else if text.starts_with('#') {
            LineKind::Ignorable
        } else {
            LineKind::Uri { text }
        };

        Ok(RawLine { number, span, kind })
    }
}

impl<'a> Iterator for LineTokenizer<'a> {
    type Item = Result<RawLine<'a>, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.remaining.is_empty() {
            self.finished = true;
            if self.line_number == 0 {
                return Some(Err(LexerError::MissingHeader {
                    found: String::new(),
                }));
            }
            return None;
        }

        let (raw, consumed) = match self.remaining.find('\n') {
            Some(idx) => (&self.remaining[..idx], idx + 1),
            None => (self.remaining, self.remaining.len()),
        };
        let start = self.offset;
        self.remaining = &self.remaining[consumed..];
        self.offset += consumed;
        self.line_number += 1;

        if self.line_number as usize > MAX_LINE_COUNT {
            let line = self.line_number;
            return self.fail(LexerError::TooManyLines {
                line,
                limit: MAX_LINE_COUNT,
            });
        }

        match self.classify(raw, start, self.line_number) {
            Ok(line) => {
                self.metrics.record(&line);
                Some(Ok(line))
            }
            Err(error) => self.fail(error),
        }
    }
}

impl std::iter::FusedIterator for LineTokenizer<'_> {}

/// Classify every line eagerly
pub fn tokenize(source: &str) -> Result<Vec<RawLine<'_>>, LexerError> {
    LineTokenizer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn kinds(source: &str) -> Vec<LineKind<'_>> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|line| line.kind)
            .collect()
    }

    #[test]
    fn test_classifies_lines() {
        let lines = kinds("#EXTM3U\n#EXTINF:9.009,\n# comment\n\nseg0.ts\n#EXT-X-ENDLIST\n");
        assert_eq!(lines.len(), 6);
        assert_matches!(&lines[1], LineKind::Tag { kind: TagKind::Inf, raw_attributes: Some("9.009,") });
        assert_eq!(lines[2], LineKind::Ignorable);
        assert_eq!(lines[3], LineKind::Ignorable);
        assert_eq!(lines[4], LineKind::Uri { text: "seg0.ts" });
        assert_matches!(&lines[5], LineKind::Tag { kind: TagKind::EndList, raw_attributes: None });
    }

    #[test]
    fn test_crlf_and_trailing_whitespace() {
        let lines = tokenize("#EXTM3U\r\n#EXT-X-VERSION:3  \r\nseg.ts \t\r\n").unwrap();
        assert_matches!(&lines[1].kind, LineKind::Tag { raw_attributes: Some("3"), .. });
        assert_eq!(lines[2].kind, LineKind::Uri { text: "seg.ts" });
        assert_eq!(lines[2].number, 3);
    }

    #[test]
    fn test_splits_on_first_colon_only() {
        let lines =
            tokenize("#EXTM3U\n#EXT-X-PROGRAM-DATE-TIME:2010-02-19T14:54:23.031+08:00\n").unwrap();
        assert_matches!(
            &lines[1].kind,
            LineKind::Tag { kind: TagKind::ProgramDateTime, raw_attributes: Some("2010-02-19T14:54:23.031+08:00") }
        );
    }

    #[test]
    fn test_unknown_tag_is_not_an_error() {
        let lines = kinds("#EXTM3U\n#EXT-X-CUE-OUT:30\n");
        assert_matches!(&lines[1], LineKind::Tag { kind: TagKind::Unrecognized(name), raw_attributes: Some("30") } if name == "#EXT-X-CUE-OUT");
    }

    #[test]
    fn test_missing_header() {
        let err = tokenize("#EXTINF:10,\nseg.ts\n").unwrap_err();
        assert_matches!(err, LexerError::MissingHeader { ref found } if found == "#EXTINF:10,");
        assert_eq!(err.line(), 1);
        assert_eq!(err.kind(), crate::error::ParseErrorKind::MalformedLine);
    }

    #[test]
    fn test_empty_input_has_no_header() {
        assert_matches!(tokenize(""), Err(LexerError::MissingHeader { .. }));
    }

    #[test]
    fn test_header_must_be_exact() {
        assert_matches!(tokenize("#EXTM3U8\n"), Err(LexerError::MissingHeader { .. }));
    }

    #[test]
    fn test_byte_order_mark_respects_preference() {
        let source = "\u{feff}#EXTM3U\nseg.ts\n";

        let allow = ParserPreferences {
            allow_byte_order_mark: true,
            ..ParserPreferences::default()
        };
        let lines: Result<Vec<_>, _> = LineTokenizer::with_preferences(source, &allow).collect();
        let lines = lines.unwrap();
        assert_eq!(lines[0].span.start.offset, 3);

        let deny = ParserPreferences {
            allow_byte_order_mark: false,
            ..ParserPreferences::default()
        };
        let first = LineTokenizer::with_preferences(source, &deny).next();
        assert_matches!(first, Some(Err(LexerError::MissingHeader { .. })));
    }

    #[test]
    fn test_line_too_long_stops_iteration() {
        let source = format!("#EXTM3U\n{}\nseg.ts\n", "a".repeat(MAX_LINE_LENGTH + 1));
        let mut tokenizer = LineTokenizer::new(&source);

        assert_matches!(tokenizer.next(), Some(Ok(_)));
        assert_matches!(tokenizer.next(), Some(Err(LexerError::LineTooLong { line: 2, .. })));
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn test_spans_track_offsets() {
        let source = "#EXTM3U\n#EXTINF:10,\nseg.ts";
        let lines = tokenize(source).unwrap();
        assert_eq!(lines[2].span.slice(source), "seg.ts");
        assert_eq!(lines[1].span.line(), 2);
    }

    #[test]
    fn test_metrics() {
        let mut tokenizer =
            LineTokenizer::new("#EXTM3U\n#EXT-X-FOO\n#EXTINF:10,\n# note\nseg.ts\n");
        for line in tokenizer.by_ref() {
            line.unwrap();
        }
        let metrics = tokenizer.metrics();
        assert_eq!(metrics.total_lines, 5);
        assert_eq!(metrics.tag_lines, 3);
        assert_eq!(metrics.unrecognized_tags, 1);
        assert_eq!(metrics.uri_lines, 1);
        assert_eq!(metrics.ignorable_lines, 1);
    }
}
