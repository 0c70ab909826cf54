use super::error::AssemblyError;
use crate::config::compile_time::assembly::MAX_SEGMENTS;
use crate::config::ParserPreferences;
use crate::log_debug;
use crate::model::{
    ByteRange, ByteRangeSpec, PlaylistDocument, PlaylistKind, Segment, SegmentTagSet, StreamInf,
    VariantStream,
};
use crate::semantic::ResolvedTag;
use crate::tags::TagKind;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    /// Nothing seen yet
    Start,
    /// Between segments
    Header,
    /// Segment tags collected, waiting for a URI
    AccumulatingSegment,
    /// `#EXT-X-ENDLIST` seen
    Done,
}

/// Folds resolved tags and URI lines into a [`PlaylistDocument`].
///
/// Input must arrive in file order. The playlist kind is fixed by the first
/// media-only or master-only tag.
pub struct PlaylistAssembler {
    state: AssemblerState,
    preserve_unknown_tags: bool,
    document: PlaylistDocument,
    kind: Option<PlaylistKind>,
    pending: SegmentTagSet,
    pending_line: Option<u32>,
    pending_stream_inf: Option<(StreamInf, u32)>,
    seen_singletons: HashSet<TagKind>,
    discontinuity_sequence: u64,
    /// URI line of each segment, parallel to `document.segments`
    segment_lines: Vec<u32>,
}

impl PlaylistAssembler {
    pub fn new() -> Self {
        Self::with_preferences(&ParserPreferences::default())
    }

    pub fn with_preferences(preferences: &ParserPreferences) -> Self {
        Self {
            state: AssemblerState::Start,
            preserve_unknown_tags: preferences.preserve_unknown_tags,
            document: PlaylistDocument::new(PlaylistKind::Media),
            kind: None,
            pending: SegmentTagSet::default(),
            pending_line: None,
            pending_stream_inf: None,
            seen_singletons: HashSet::new(),
            discontinuity_sequence: 0,
            segment_lines: Vec::new(),
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    pub fn segment_count(&self) -> usize {
        self.document.segments.len()
    }

    fn fix_kind(&mut self, tag: &TagKind, line: u32) -> Result<(), AssemblyError> {
        let wanted = if tag.is_master_tag() {
            PlaylistKind::Master
        } else if tag.is_media_tag() {
            PlaylistKind::Media
        } else {
            return Ok(());
        };

        match self.kind {
            Some(kind) if kind != wanted => Err(AssemblyError::MixedPlaylistTags {
                tag: tag.literal().to_string(),
                line,
            }),
            _ => {
                self.kind = Some(wanted);
                Ok(())
            }
        }
    }

    fn begin_segment(&mut self, line: u32) {
        self.state = AssemblerState::AccumulatingSegment;
        self.pending_line.get_or_insert(line);
    }

    fn before_first_segment(&self, tag: &TagKind, line: u32) -> Result<(), AssemblyError> {
        if self.document.segments.is_empty() {
            Ok(())
        } else {
            Err(AssemblyError::MalformedStructure {
                message: format!("{} must appear before the first segment", tag),
                line,
            })
        }
    }

    /// Apply one decoded tag
    pub fn push_tag(&mut self, tag: &TagKind, resolved: ResolvedTag, line: u32) -> Result<(), AssemblyError> {
        match self.state {
            AssemblerState::Done => return Err(AssemblyError::ContentAfterEndList { line }),
            AssemblerState::Start => {
                if resolved != ResolvedTag::Header {
                    return Err(AssemblyError::MalformedStructure {
                        message: "playlist must begin with #EXTM3U".to_string(),
                        line,
                    });
                }
                self.state = AssemblerState::Header;
                return Ok(());
            }
            AssemblerState::Header | AssemblerState::AccumulatingSegment => {}
        }

        self.fix_kind(tag, line)?;
        if tag.is_playlist_singleton() && !self.seen_singletons.insert(tag.clone()) {
            return Err(AssemblyError::DuplicatePlaylistTag {
                tag: tag.literal().to_string(),
                line,
            });
        }

        match resolved {
            ResolvedTag::Header => {
                return Err(AssemblyError::MalformedStructure {
                    message: "#EXTM3U may appear only on the first line".to_string(),
                    line,
                })
            }
            ResolvedTag::Version(version) => self.document.version = Some(version),

            ResolvedTag::Inf { duration, title } => {
                if self.pending.duration.is_some() {
                    return Err(AssemblyError::MalformedStructure {
                        message: "segment has more than one #EXTINF".to_string(),
                        line,
                    });
                }
                self.pending.duration = Some(duration);
                self.pending.title = title;
                self.begin_segment(line);
            }
            ResolvedTag::ByteRange(range) => {
                self.pending.byte_range = Some(range);
                self.begin_segment(line);
            }
            ResolvedTag::Discontinuity => {
                self.pending.discontinuity = true;
                self.begin_segment(line);
            }
            ResolvedTag::Key(key) => {
                self.pending.keys.push(key);
                self.begin_segment(line);
            }
            ResolvedTag::Map(map) => {
                self.pending.map = Some(map);
                self.begin_segment(line);
            }
            ResolvedTag::ProgramDateTime(date_time) => {
                self.pending.program_date_time = Some(date_time);
                self.begin_segment(line);
            }
            ResolvedTag::DateRange(range) => {
                self.pending.date_ranges.push(range);
                self.begin_segment(line);
            }

            ResolvedTag::TargetDuration(target) => self.document.target_duration = Some(target),
            ResolvedTag::MediaSequence(sequence) => {
                self.before_first_segment(tag, line)?;
                self.document.media_sequence = sequence;
            }
            ResolvedTag::DiscontinuitySequence(sequence) => {
                self.before_first_segment(tag, line)?;
                self.document.discontinuity_sequence = sequence;
                self.discontinuity_sequence = sequence;
            }
            ResolvedTag::PlaylistType(playlist_type) => {
                self.document.playlist_type = Some(playlist_type)
            }
            ResolvedTag::IFramesOnly => self.document.i_frames_only = true,
            ResolvedTag::EndList => {
                if let Some(pending_line) = self.pending_line {
                    return Err(AssemblyError::DanglingSegmentTags { line: pending_line });
                }
                self.document.end_list = true;
                self.state = AssemblerState::Done;
                log_debug!("Reached #EXT-X-ENDLIST", "line" => line);
            }

            ResolvedTag::IndependentSegments => self.document.independent_segments = true,
            ResolvedTag::Start(start) => self.document.start = Some(start),

            ResolvedTag::Media(rendition) => self.document.renditions.push(rendition),
            ResolvedTag::StreamInf(stream_inf) => {
                if let Some((_, previous)) = &self.pending_stream_inf {
                    return Err(AssemblyError::DanglingStreamInf { line: *previous });
                }
                self.pending_stream_inf = Some((stream_inf, line));
                self.state = AssemblerState::AccumulatingSegment;
            }
            ResolvedTag::IFrameStreamInf(variant) => self.document.i_frame_variants.push(variant),
            ResolvedTag::SessionData(data) => self.document.session_data.push(data),
            ResolvedTag::SessionKey(key) => self.document.session_keys.push(key),

            ResolvedTag::Unrecognized(opaque) => {
                if !self.preserve_unknown_tags {
                    return Ok(());
                }
                if self.kind == Some(PlaylistKind::Master) {
                    self.document.unknown_tags.push(opaque);
                } else {
                    self.pending.unknown_tags.push(opaque);
                }
            }
        }

        Ok(())
    }

    /// Offset for a range written without one: the end of the previous
    /// segment's range, provided that segment is the same resource
    fn resolve_byte_range(&self, spec: ByteRangeSpec, uri: &str, line: u32) -> Result<ByteRange, AssemblyError> {
        if let Some(offset) = spec.offset {
            return Ok(ByteRange {
                length: spec.length,
                offset,
            });
        }

        match self.document.segments.last() {
            Some(Segment {
                uri: previous_uri,
                byte_range: Some(previous),
                ..
            }) if previous_uri == uri => Ok(ByteRange {
                length: spec.length,
                offset: previous.end(),
            }),
            _ => Err(AssemblyError::UnresolvedByteRange {
                uri: uri.to_string(),
                line,
            }),
        }
    }

    /// Apply one URI line
    pub fn push_uri(&mut self, uri: &str, line: u32) -> Result<(), AssemblyError> {
        match self.state {
            AssemblerState::Done => return Err(AssemblyError::ContentAfterEndList { line }),
            AssemblerState::Start => {
                return Err(AssemblyError::MalformedStructure {
                    message: "playlist must begin with #EXTM3U".to_string(),
                    line,
                })
            }
            AssemblerState::Header | AssemblerState::AccumulatingSegment => {}
        }

        if let Some((stream_inf, _)) = self.pending_stream_inf.take() {
            self.document.variants.push(VariantStream {
                uri: uri.to_string(),
                stream_inf,
            });
            self.state = AssemblerState::Header;
            return Ok(());
        }
        if self.kind == Some(PlaylistKind::Master) {
            return Err(AssemblyError::MalformedStructure {
                message: format!("URI '{}' is not preceded by #EXT-X-STREAM-INF", uri),
                line,
            });
        }
        self.kind = Some(PlaylistKind::Media);

        let duration = self.pending.duration.ok_or_else(|| AssemblyError::MissingSegmentDuration {
            uri: uri.to_string(),
            line,
        })?;
        if self.document.segments.len() >= MAX_SEGMENTS {
            return Err(AssemblyError::SegmentLimitExceeded {
                line,
                limit: MAX_SEGMENTS,
            });
        }
        let byte_range = match self.pending.byte_range {
            Some(spec) => Some(self.resolve_byte_range(spec, uri, line)?),
            None => None,
        };

        // Both counters may start anywhere up to u64::MAX
        let sequence = self
            .document
            .media_sequence
            .checked_add(self.document.segments.len() as u64)
            .ok_or(AssemblyError::SequenceOverflow {
                tag: "#EXT-X-MEDIA-SEQUENCE",
                line,
            })?;
        let discontinuity_sequence = if self.pending.discontinuity {
            self.discontinuity_sequence
                .checked_add(1)
                .ok_or(AssemblyError::SequenceOverflow {
                    tag: "#EXT-X-DISCONTINUITY-SEQUENCE",
                    line,
                })?
        } else {
            self.discontinuity_sequence
        };

        let tags = std::mem::take(&mut self.pending);
        let segment = tags.into_segment(
            uri.to_string(),
            duration,
            byte_range,
            sequence,
            discontinuity_sequence,
        );
        self.document.segments.push(segment);
        self.segment_lines.push(line);
        self.discontinuity_sequence = discontinuity_sequence;
        self.pending_line = None;
        self.state = AssemblerState::Header;

        Ok(())
    }

    /// End of input
    pub fn finish(self) -> Result<PlaylistDocument, AssemblyError> {
        self.finish_with_lines().map(|(document, _)| document)
    }

    /// Like [`finish`](Self::finish), also returning the URI line of every
    /// segment so later checks can point at the source
    pub fn finish_with_lines(mut self) -> Result<(PlaylistDocument, Vec<u32>), AssemblyError> {
        if self.state == AssemblerState::Start {
            return Err(AssemblyError::MalformedStructure {
                message: "playlist is empty".to_string(),
                line: 1,
            });
        }
        if let Some((_, line)) = self.pending_stream_inf {
            return Err(AssemblyError::DanglingStreamInf { line });
        }
        if let Some(line) = self.pending_line {
            return Err(AssemblyError::DanglingSegmentTags { line });
        }

        self.document
            .unknown_tags
            .append(&mut self.pending.unknown_tags);
        self.document.kind = self.kind.unwrap_or(PlaylistKind::Media);
        Ok((self.document, self.segment_lines))
    }
}

impl Default for PlaylistAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use crate::lexical::{tokenize, LineKind};
    use crate::semantic::resolve;
    use assert_matches::assert_matches;

    /// Run the tokenizer, resolver and assembler over `text`
    fn assemble(text: &str) -> Result<PlaylistDocument, (ParseErrorKind, u32)> {
        let preferences = ParserPreferences::default();
        let lines = tokenize(text).map_err(|e| (e.kind(), e.line()))?;
        let mut assembler = PlaylistAssembler::with_preferences(&preferences);
        for line in lines {
            match line.kind {
                LineKind::Tag { kind, raw_attributes } => {
                    let resolved = resolve(&kind, raw_attributes, line.number, &preferences)
                        .map_err(|e| (e.kind(), e.line()))?;
                    assembler
                        .push_tag(&kind, resolved, line.number)
                        .map_err(|e| (e.kind(), e.line()))?;
                }
                LineKind::Uri { text } => assembler
                    .push_uri(text, line.number)
                    .map_err(|e| (e.kind(), e.line()))?,
                LineKind::Ignorable => {}
            }
        }
        assembler.finish().map_err(|e| (e.kind(), e.line()))
    }

    #[test]
    fn test_two_segment_vod() {
        let doc = assemble(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:9.009,\nseg0.ts\n#EXTINF:9.009,\nseg1.ts\n#EXT-X-ENDLIST\n",
        )
        .unwrap();

        assert_eq!(doc.kind, PlaylistKind::Media);
        assert_eq!(doc.durations(), vec![9.009, 9.009]);
        assert_eq!(doc.target_duration, Some(10));
        assert!(doc.end_list);
        assert_eq!(doc.segments[1].uri, "seg1.ts");
    }

    #[test]
    fn test_sequence_numbers_start_at_media_sequence() {
        let doc = assemble(
            "#EXTM3U\n#EXT-X-TARGETDURATION:8\n#EXT-X-MEDIA-SEQUENCE:2680\n#EXTINF:7.975,\na.ts\n#EXTINF:7.941,\nb.ts\n#EXTINF:7.975,\nc.ts\n",
        )
        .unwrap();

        let sequences: Vec<u64> = doc.segments.iter().map(|s| s.sequence).collect();
        assert_eq!(sequences, vec![2680, 2681, 2682]);
        assert!(!doc.end_list);
    }

    #[test]
    fn test_discontinuity_sequence_increments() {
        let doc = assemble(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-DISCONTINUITY-SEQUENCE:3\n#EXTINF:10,\na.ts\n#EXT-X-DISCONTINUITY\n#EXTINF:10,\nb.ts\n#EXTINF:10,\nc.ts\n",
        )
        .unwrap();

        let sequences: Vec<u64> = doc.segments.iter().map(|s| s.discontinuity_sequence).collect();
        assert_eq!(sequences, vec![3, 4, 4]);
        assert!(doc.segments[1].discontinuity);
    }

    #[test]
    fn test_content_after_end_list() {
        let err = assemble("#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:10,\na.ts\n#EXT-X-ENDLIST\n#EXTINF:10,\nb.ts\n")
            .unwrap_err();
        assert_eq!(err, (ParseErrorKind::ContentAfterEndList, 6));
    }

    #[test]
    fn test_comments_after_end_list_are_fine() {
        assert!(assemble("#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:10,\na.ts\n#EXT-X-ENDLIST\n# trailer\n\n").is_ok());
    }

    #[test]
    fn test_dangling_segment_tags() {
        let err = assemble("#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:10,\na.ts\n#EXTINF:10,\n").unwrap_err();
        assert_eq!(err, (ParseErrorKind::DanglingSegmentTags, 5));

        let err = assemble("#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:10,\n#EXT-X-ENDLIST\n").unwrap_err();
        assert_eq!(err.0, ParseErrorKind::DanglingSegmentTags);
    }

    #[test]
    fn test_uri_without_extinf() {
        let err = assemble("#EXTM3U\n#EXT-X-TARGETDURATION:10\na.ts\n").unwrap_err();
        assert_eq!(err, (ParseErrorKind::MissingRequiredAttribute, 3));
    }

    #[test]
    fn test_byte_range_with_offset() {
        let doc = assemble(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-VERSION:4\n#EXTINF:10,\n#EXT-X-BYTERANGE:1000@500\nmain.ts\n",
        )
        .unwrap();
        assert_eq!(doc.segments[0].byte_range, Some(ByteRange { length: 1000, offset: 500 }));
    }

    #[test]
    fn test_byte_range_offset_continues_previous_range() {
        let doc = assemble(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:10,\n#EXT-X-BYTERANGE:1000@500\nmain.ts\n#EXTINF:10,\n#EXT-X-BYTERANGE:2000\nmain.ts\n",
        )
        .unwrap();
        assert_eq!(doc.segments[1].byte_range, Some(ByteRange { length: 2000, offset: 1500 }));
    }

    #[test]
    fn test_byte_range_without_prior_range() {
        let err = assemble("#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:10,\n#EXT-X-BYTERANGE:1000\nmain.ts\n")
            .unwrap_err();
        assert_eq!(err.0, ParseErrorKind::MissingRequiredAttribute);

        let err = assemble(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:10,\n#EXT-X-BYTERANGE:1000@0\na.ts\n#EXTINF:10,\n#EXT-X-BYTERANGE:1000\nb.ts\n",
        )
        .unwrap_err();
        assert_eq!(err.0, ParseErrorKind::MissingRequiredAttribute);
    }

    #[test]
    fn test_media_sequence_after_first_segment() {
        let err = assemble("#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:10,\na.ts\n#EXT-X-MEDIA-SEQUENCE:5\n")
            .unwrap_err();
        assert_eq!(err, (ParseErrorKind::MalformedLine, 5));
    }

    #[test]
    fn test_duplicate_playlist_tags() {
        let err = assemble("#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-TARGETDURATION:10\n").unwrap_err();
        assert_eq!(err, (ParseErrorKind::MalformedLine, 3));

        let err = assemble("#EXTM3U\n#EXTM3U\n").unwrap_err();
        assert_eq!(err.0, ParseErrorKind::MalformedLine);
    }

    #[test]
    fn test_keys_and_map_attach_to_next_segment() {
        let doc = assemble(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-MAP:URI=\"init.mp4\"\n#EXT-X-KEY:METHOD=AES-128,URI=\"k1\"\n#EXTINF:10,\na.mp4\n#EXTINF:10,\nb.mp4\n",
        )
        .unwrap();
        assert_eq!(doc.segments[0].keys.len(), 1);
        assert!(doc.segments[1].keys.is_empty());
        assert_eq!(doc.effective_keys(1)[0].uri.as_deref(), Some("k1"));
        assert_eq!(doc.effective_map(1).map(|m| m.uri.as_str()), Some("init.mp4"));
    }

    #[test]
    fn test_unknown_tags_kept_in_place() {
        let doc = assemble(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-CUE-OUT:30\n#EXTINF:10,\na.ts\n#EXT-X-CUE-IN\n",
        )
        .unwrap();
        assert_eq!(doc.segments[0].unknown_tags[0].name, "#EXT-X-CUE-OUT");
        assert_eq!(doc.unknown_tags[0].name, "#EXT-X-CUE-IN");
    }

    #[test]
    fn test_master_playlist() {
        let doc = assemble(concat!(
            "#EXTM3U\n",
            "#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID=\"aac\",NAME=\"English\",DEFAULT=YES,AUTOSELECT=YES,URI=\"en.m3u8\"\n",
            "#EXT-X-STREAM-INF:BANDWIDTH=1280000,AUDIO=\"aac\"\n",
            "low.m3u8\n",
            "#EXT-X-STREAM-INF:BANDWIDTH=2560000,AUDIO=\"aac\"\n",
            "mid.m3u8\n",
            "#EXT-X-I-FRAME-STREAM-INF:BANDWIDTH=86000,URI=\"low-iframe.m3u8\"\n",
        ))
        .unwrap();

        assert_eq!(doc.kind, PlaylistKind::Master);
        assert_eq!(doc.variants.len(), 2);
        assert_eq!(doc.variants[1].uri, "mid.m3u8");
        assert_eq!(doc.renditions.len(), 1);
        assert_eq!(doc.i_frame_variants.len(), 1);
        assert!(doc.segments.is_empty());
    }

    #[test]
    fn test_master_structure_errors() {
        let err = assemble("#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1\n").unwrap_err();
        assert_eq!(err, (ParseErrorKind::DanglingSegmentTags, 2));

        let err = assemble("#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1\na.m3u8\nb.m3u8\n").unwrap_err();
        assert_eq!(err, (ParseErrorKind::MalformedLine, 4));

        let err = assemble("#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1\na.m3u8\n#EXT-X-TARGETDURATION:10\n")
            .unwrap_err();
        assert_eq!(err, (ParseErrorKind::MalformedLine, 4));
    }

    #[test]
    fn test_media_sequence_at_u64_limit() {
        let doc = assemble(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-MEDIA-SEQUENCE:18446744073709551615\n\
             #EXTINF:9,\nlast.ts\n#EXT-X-ENDLIST\n",
        )
        .unwrap();
        assert_eq!(doc.media_sequence, u64::MAX);
        assert_eq!(doc.segments[0].sequence, u64::MAX);

        let err = assemble(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-MEDIA-SEQUENCE:18446744073709551615\n\
             #EXTINF:9,\nlast.ts\n#EXTINF:9,\nnext.ts\n",
        )
        .unwrap_err();
        assert_eq!(err, (ParseErrorKind::MalformedLine, 7));
    }

    #[test]
    fn test_discontinuity_sequence_at_u64_limit() {
        let doc = assemble(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-DISCONTINUITY-SEQUENCE:18446744073709551615\n\
             #EXTINF:9,\nseg.ts\n#EXT-X-ENDLIST\n",
        )
        .unwrap();
        assert_eq!(doc.segments[0].discontinuity_sequence, u64::MAX);

        let mut assembler = PlaylistAssembler::new();
        assembler.push_tag(&TagKind::ExtM3u, ResolvedTag::Header, 1).unwrap();
        assembler
            .push_tag(&TagKind::DiscontinuitySequence, ResolvedTag::DiscontinuitySequence(u64::MAX), 2)
            .unwrap();
        assembler.push_tag(&TagKind::Discontinuity, ResolvedTag::Discontinuity, 3).unwrap();
        assembler
            .push_tag(&TagKind::Inf, ResolvedTag::Inf { duration: 4.0, title: None }, 4)
            .unwrap();
        let err = assembler.push_uri("seg.ts", 5).unwrap_err();
        assert_matches!(
            err,
            AssemblyError::SequenceOverflow { tag: "#EXT-X-DISCONTINUITY-SEQUENCE", line: 5 }
        );
        assert_eq!(err.kind(), ParseErrorKind::MalformedLine);
        assert_eq!(assembler.segment_count(), 0);
    }

    #[test]
    fn test_segment_lines_follow_uris() {
        let mut assembler = PlaylistAssembler::new();
        assembler.push_tag(&TagKind::ExtM3u, ResolvedTag::Header, 1).unwrap();
        for (inf_line, uri) in [(3, "a.ts"), (6, "b.ts")] {
            assembler
                .push_tag(&TagKind::Inf, ResolvedTag::Inf { duration: 4.0, title: None }, inf_line)
                .unwrap();
            assembler.push_uri(uri, inf_line + 1).unwrap();
        }
        let (doc, lines) = assembler.finish_with_lines().unwrap();
        assert_eq!(doc.segments.len(), 2);
        assert_eq!(lines, vec![4, 7]);
    }

    #[test]
    fn test_state_transitions() {
        let mut assembler = PlaylistAssembler::new();
        assert_eq!(assembler.state(), AssemblerState::Start);

        assembler.push_tag(&TagKind::ExtM3u, ResolvedTag::Header, 1).unwrap();
        assert_eq!(assembler.state(), AssemblerState::Header);

        assembler
            .push_tag(&TagKind::Inf, ResolvedTag::Inf { duration: 4.0, title: None }, 2)
            .unwrap();
        assert_eq!(assembler.state(), AssemblerState::AccumulatingSegment);

        assembler.push_uri("a.ts", 3).unwrap();
        assert_eq!(assembler.state(), AssemblerState::Header);
        assert_eq!(assembler.segment_count(), 1);

        assembler.push_tag(&TagKind::EndList, ResolvedTag::EndList, 4).unwrap();
        assert_eq!(assembler.state(), AssemblerState::Done);
        assert_matches!(
            assembler.push_uri("b.ts", 5),
            Err(AssemblyError::ContentAfterEndList { line: 5 })
        );
    }
}
