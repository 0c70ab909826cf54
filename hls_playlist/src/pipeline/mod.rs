//! Parsing pipeline
//!
//! Chains the stages over one playlist: tokenize, resolve each tag,
//! assemble, validate. Text and files both end up in [`parse_source`].

mod error;
mod info;
mod result;

pub use error::PipelineError;
pub use info::{get_pipeline_info, PipelineInfo};
pub use result::PipelineResult;

use crate::assembler::PlaylistAssembler;
use crate::config::RuntimeConfig;
use crate::file_processor::FileProcessor;
use crate::lexical::{self, LineKind};
use crate::logging::{self, codes};
use crate::model::PlaylistDocument;
use crate::semantic;
use crate::utils::Span;
use crate::{log_debug, log_error, log_info, log_success};
use std::path::Path;
use std::time::Instant;

/// Parse playlist text with default preferences
pub fn parse_playlist(text: &str) -> Result<PlaylistDocument, PipelineError> {
    parse_playlist_with_config(text, &RuntimeConfig::default())
}

pub fn parse_playlist_with_config(
    text: &str,
    config: &RuntimeConfig,
) -> Result<PlaylistDocument, PipelineError> {
    parse_source(text, config).map(|result| result.document)
}

/// Run every stage over `text`, keeping the stage metrics
pub fn parse_source(text: &str, config: &RuntimeConfig) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    let result = assemble_document(text, config);
    let (document, segment_lines, tokenizer_metrics) = match result {
        Ok(parts) => parts,
        Err(error) => {
            report_stage_error(&error);
            return Err(error);
        }
    };
    log_success!(
        codes::success::ASSEMBLY_COMPLETE,
        "Playlist assembled",
        "lines" => tokenizer_metrics.total_lines,
        "segments" => document.segments.len()
    );

    let (document, validation_metrics) =
        crate::validation::validate_with_lines(document, &segment_lines, &config.validation)?;

    Ok(PipelineResult::new(
        document,
        tokenizer_metrics,
        validation_metrics,
        text.len(),
        start_time.elapsed(),
    ))
}

/// Single pass over the lines: each tag is resolved and handed to the
/// assembler before the next line is read. Also returns each segment's URI line.
fn assemble_document(
    text: &str,
    config: &RuntimeConfig,
) -> Result<(PlaylistDocument, Vec<u32>, lexical::TokenizerMetrics), PipelineError> {
    let preferences = &config.parser;
    let mut tokenizer = lexical::create_tokenizer(text, preferences);
    let mut assembler = PlaylistAssembler::with_preferences(preferences);

    for line in tokenizer.by_ref() {
        let line = line?;
        match line.kind {
            LineKind::Tag {
                kind,
                raw_attributes,
            } => {
                let resolved = semantic::resolve(&kind, raw_attributes, line.number, preferences)?;
                assembler.push_tag(&kind, resolved, line.number)?;
            }
            LineKind::Uri { text } => assembler.push_uri(text, line.number)?,
            LineKind::Ignorable => {}
        }
    }

    let metrics = tokenizer.metrics().clone();
    log_success!(
        codes::success::TOKENIZATION_COMPLETE,
        "Tokenization completed",
        "lines" => metrics.total_lines,
        "tags" => metrics.tag_lines,
        "uris" => metrics.uri_lines,
        "unrecognized_tags" => metrics.unrecognized_tags
    );

    let (document, segment_lines) = assembler.finish_with_lines()?;
    Ok((document, segment_lines, metrics))
}

/// Log a line-level failure with its location. File and validation errors
/// are logged where they are raised and never reach here.
fn report_stage_error(error: &PipelineError) {
    if let (Some(line), Some(kind)) = (error.line(), error.kind()) {
        log_error!(
            error.error_code(),
            error.to_string(),
            span = Span::at_line(line),
            "kind" => kind
        );
    }
}

/// Read and parse a playlist file with default preferences
pub fn process_file(file_path: impl AsRef<Path>) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(file_path, &RuntimeConfig::default())
}

pub fn process_file_with_config(
    file_path: impl AsRef<Path>,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    process_file_with_id(file_path.as_ref(), 0, config)
}

/// Batch entry point; `file_id` tags the events logged for this file
pub(crate) fn process_file_with_id(
    file_path: &Path,
    file_id: usize,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    logging::with_file_context(file_path.to_path_buf(), file_id, || {
        let display = file_path.display().to_string();
        log_info!("Starting playlist processing pipeline", "file" => display);

        let file_result =
            FileProcessor::from_preferences(&config.file_processor).process_file(file_path)?;
        log_debug!("Source loaded", "bytes" => file_result.source.len());

        let result = parse_source(&file_result.source, config)?
            .with_file_metadata(file_result.metadata);
        result.log_success(&display);

        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use crate::model::{KeyMethod, PlaylistKind, WarningKind};
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    const VOD: &str = "#EXTM3U\n\
        #EXT-X-TARGETDURATION:10\n\
        #EXT-X-VERSION:3\n\
        #EXTINF:9.009,\n\
        http://media.example.com/first.ts\n\
        #EXTINF:9.009,\n\
        http://media.example.com/second.ts\n\
        #EXT-X-ENDLIST\n";

    fn failure(text: &str) -> (ParseErrorKind, Option<u32>) {
        let error = parse_playlist(text).unwrap_err();
        (error.kind().unwrap(), error.line())
    }

    #[test]
    fn test_two_segment_vod() {
        let doc = parse_playlist(VOD).unwrap();
        assert_eq!(doc.durations(), vec![9.009, 9.009]);
        assert!(doc.end_list);
        assert_eq!(doc.target_duration, Some(10));
        assert_eq!(doc.version, Some(3));
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_missing_header_is_malformed_line() {
        let (kind, line) = failure("#EXT-X-TARGETDURATION:10\n#EXTINF:9.009,\nseg.ts\n");
        assert_eq!(kind, ParseErrorKind::MalformedLine);
        assert_eq!(line, Some(1));
    }

    #[test]
    fn test_sequence_numbers_increase_by_one() {
        let doc = parse_playlist(
            "#EXTM3U\n#EXT-X-TARGETDURATION:8\n#EXT-X-MEDIA-SEQUENCE:2680\n\
             #EXTINF:7.975,\na.ts\n#EXTINF:7.941,\nb.ts\n#EXTINF:7.975,\nc.ts\n",
        )
        .unwrap();

        let sequences: Vec<u64> = doc.segments.iter().map(|s| s.sequence).collect();
        assert_eq!(sequences, vec![2680, 2681, 2682]);
        for pair in doc.segments.windows(2) {
            assert_eq!(pair[1].sequence, pair[0].sequence + 1);
        }
    }

    #[test]
    fn test_media_sequence_at_u64_limit() {
        let doc = parse_playlist(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-MEDIA-SEQUENCE:18446744073709551615\n\
             #EXTINF:9,\nlast.ts\n#EXT-X-ENDLIST\n",
        )
        .unwrap();
        assert_eq!(doc.segments[0].sequence, u64::MAX);

        let (kind, line) = failure(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-MEDIA-SEQUENCE:18446744073709551615\n\
             #EXTINF:9,\nlast.ts\n#EXTINF:9,\nnext.ts\n",
        );
        assert_eq!(kind, ParseErrorKind::MalformedLine);
        assert_eq!(line, Some(7));
    }

    #[test]
    fn test_discontinuity_sequence_at_u64_limit() {
        let (kind, line) = failure(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-DISCONTINUITY-SEQUENCE:18446744073709551615\n\
             #EXT-X-DISCONTINUITY\n#EXTINF:9,\nseg.ts\n",
        );
        assert_eq!(kind, ParseErrorKind::MalformedLine);
        assert_eq!(line, Some(6));
    }

    #[test]
    fn test_aes_key_without_uri() {
        let (kind, line) = failure(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-KEY:METHOD=AES-128\n#EXTINF:9,\nseg.ts\n",
        );
        assert_eq!(kind, ParseErrorKind::MissingRequiredAttribute);
        assert_eq!(line, Some(3));
    }

    #[test]
    fn test_segment_after_endlist() {
        let (kind, line) = failure(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:9,\na.ts\n#EXT-X-ENDLIST\n#EXTINF:9,\nb.ts\n",
        );
        assert_eq!(kind, ParseErrorKind::ContentAfterEndList);
        assert_eq!(line, Some(6));
    }

    #[test]
    fn test_byte_ranges() {
        let doc = parse_playlist(
            "#EXTM3U\n#EXT-X-VERSION:4\n#EXT-X-TARGETDURATION:10\n\
             #EXT-X-BYTERANGE:1000@500\n#EXTINF:10,\nmain.ts\n\
             #EXT-X-BYTERANGE:2000\n#EXTINF:10,\nmain.ts\n",
        )
        .unwrap();
        let first = doc.segments[0].byte_range.unwrap();
        assert_eq!((first.length, first.offset), (1000, 500));
        let second = doc.segments[1].byte_range.unwrap();
        assert_eq!((second.length, second.offset), (2000, 1500));

        let (kind, _) = failure(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-BYTERANGE:1000\n#EXTINF:10,\nmain.ts\n",
        );
        assert_eq!(kind, ParseErrorKind::MissingRequiredAttribute);
    }

    #[test]
    fn test_each_error_kind_is_reachable() {
        let cases = [
            ("#EXTM3U\n#EXT-X-KEY:METHOD=AES-128,URI=\"k\n", ParseErrorKind::AttributeSyntaxError),
            ("#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:abc,\nseg.ts\n", ParseErrorKind::InvalidDuration),
            ("#EXTM3U\n#EXT-X-PROGRAM-DATE-TIME:yesterday\n", ParseErrorKind::InvalidTimestamp),
            ("#EXTM3U\n#EXT-X-PLAYLIST-TYPE:LIVE\n", ParseErrorKind::UnknownEnumValue),
            ("#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:9,\n", ParseErrorKind::DanglingSegmentTags),
        ];
        for (text, expected) in cases {
            assert_eq!(failure(text).0, expected, "{}", text);
        }
    }

    #[test]
    fn test_missing_target_duration_is_fatal() {
        let error = parse_playlist("#EXTM3U\n#EXTINF:9,\nseg.ts\n").unwrap_err();
        assert_matches!(error, PipelineError::Validation(_));
        assert_eq!(error.kind(), Some(ParseErrorKind::MissingRequiredAttribute));
        assert_eq!(error.line(), None);
    }

    #[test]
    fn test_warnings_do_not_fail_the_parse() {
        let doc = parse_playlist(
            "#EXTM3U\n#EXT-X-TARGETDURATION:5\n#EXT-X-PLAYLIST-TYPE:VOD\n#EXTINF:9.5,\nseg.ts\n",
        )
        .unwrap();
        let kinds: Vec<WarningKind> = doc.warnings.iter().map(|w| w.kind).collect();
        assert!(kinds.contains(&WarningKind::DurationExceedsTarget));
        assert!(kinds.contains(&WarningKind::VodWithoutEndList));
    }

    #[test]
    fn test_master_playlist() {
        let doc = parse_playlist(
            "#EXTM3U\n\
             #EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID=\"aac\",NAME=\"English\",DEFAULT=YES,AUTOSELECT=YES,LANGUAGE=\"en\",URI=\"en/audio.m3u8\"\n\
             #EXT-X-STREAM-INF:BANDWIDTH=1280000,AVERAGE-BANDWIDTH=1000000,RESOLUTION=640x360,AUDIO=\"aac\"\n\
             low/index.m3u8\n\
             #EXT-X-STREAM-INF:BANDWIDTH=2560000,CODECS=\"avc1.4d401f,mp4a.40.2\",AUDIO=\"aac\"\n\
             mid/index.m3u8\n",
        )
        .unwrap();

        assert_eq!(doc.kind, PlaylistKind::Master);
        assert_eq!(doc.variants.len(), 2);
        assert_eq!(doc.variants[0].stream_inf.bandwidth, 1_280_000);
        assert_eq!(doc.variants[1].uri, "mid/index.m3u8");
        assert_eq!(doc.renditions[0].group_id, "aac");
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_unknown_tags_are_preserved() {
        let doc = parse_playlist(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-CUE-OUT:30\n#EXTINF:10,\nad.ts\n",
        )
        .unwrap();
        assert_eq!(doc.segments[0].unknown_tags.len(), 1);
        assert_eq!(doc.segments[0].unknown_tags[0].name, "#EXT-X-CUE-OUT");
    }

    #[test]
    fn test_config_reaches_parser() {
        let mut config = RuntimeConfig::default();
        config.parser.require_extinf_comma = true;
        let text = "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:10\nseg.ts\n";

        assert!(parse_playlist(text).is_ok());
        let error = parse_playlist_with_config(text, &config).unwrap_err();
        assert_eq!(error.line(), Some(3));
    }

    #[test]
    fn test_encrypted_segments_keep_key() {
        let doc = parse_playlist(
            "#EXTM3U\n#EXT-X-VERSION:2\n#EXT-X-TARGETDURATION:10\n\
             #EXT-X-KEY:METHOD=AES-128,URI=\"https://keys.example.com/k1\",IV=0x000102030405060708090a0b0c0d0e0f\n\
             #EXTINF:10,\na.ts\n#EXTINF:10,\nb.ts\n",
        )
        .unwrap();
        let keys = doc.effective_keys(1);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].method, KeyMethod::Aes128);
        assert_eq!(keys[0].iv.map(|iv| iv[15]), Some(0x0f));
    }

    #[test]
    fn test_process_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vod.m3u8");
        fs::write(&path, VOD).unwrap();

        let result = process_file(&path).unwrap();
        assert_eq!(result.document.segments.len(), 2);
        assert_eq!(result.tokenizer_metrics.uri_lines, 2);
        assert_eq!(result.source_bytes, VOD.len());
        assert!(result.file_metadata.is_some());
    }

    #[test]
    fn test_process_missing_file() {
        let dir = tempdir().unwrap();
        let error = process_file(dir.path().join("gone.m3u8")).unwrap_err();
        assert_matches!(error, PipelineError::FileProcessing(_));
    }
}
