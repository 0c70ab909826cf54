//! Playlist renderer
//!
//! Serializes a [`PlaylistDocument`] back to RFC 8216 text. Tag names come
//! from the registry literals. Output is canonical rather than a copy of the
//! input: byte ranges always carry their offset, optional attributes that
//! hold their default are left out, and comments are gone. Parsing the
//! output yields the same document.

use crate::model::{
    ClosedCaptions, DateRange, IFrameVariant, KeyInfo, KeyMethod, MapInfo, PlaylistDocument,
    PlaylistKind, Rendition, Resolution, Segment, SessionData, SessionDataPayload, StreamInf,
};
use crate::tags::TagKind;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use std::fmt::Display;

/// Builds a comma-separated attribute list in insertion order
#[derive(Default)]
struct AttributeWriter {
    parts: Vec<String>,
}

impl AttributeWriter {
    fn new() -> Self {
        Self::default()
    }

    fn raw(mut self, name: &str, value: impl Display) -> Self {
        self.parts.push(format!("{}={}", name, value));
        self
    }

    fn opt_raw<T: Display>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.raw(name, value),
            None => self,
        }
    }

    fn quoted(self, name: &str, value: &str) -> Self {
        self.raw(name, format_args!("\"{}\"", value))
    }

    fn opt_quoted(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.quoted(name, value),
            None => self,
        }
    }

    /// Written only when set; absence reads back as `NO`
    fn flag(self, name: &str, set: bool) -> Self {
        if set {
            self.raw(name, "YES")
        } else {
            self
        }
    }

    fn opt_hex(self, name: &str, bytes: Option<&[u8]>) -> Self {
        match bytes {
            Some(bytes) => self.raw(name, format_args!("0x{}", hex::encode_upper(bytes))),
            None => self,
        }
    }

    fn opt_resolution(self, name: &str, resolution: Option<Resolution>) -> Self {
        match resolution {
            Some(r) => self.raw(name, format_args!("{}x{}", r.width, r.height)),
            None => self,
        }
    }

    fn finish(self) -> String {
        self.parts.join(",")
    }
}

fn date_time(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Accumulates output lines
struct PlaylistWriter {
    out: String,
}

impl PlaylistWriter {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn tag(&mut self, kind: TagKind) {
        self.line(kind.literal());
    }

    fn tag_with(&mut self, kind: TagKind, value: impl Display) {
        self.line(&format!("{}:{}", kind.literal(), value));
    }
}

fn key_attributes(key: &KeyInfo) -> String {
    let attrs = AttributeWriter::new().raw("METHOD", key.method.as_str());
    if key.method == KeyMethod::None {
        return attrs.finish();
    }
    attrs
        .opt_quoted("URI", key.uri.as_deref())
        .opt_hex("IV", key.iv.as_ref().map(|iv| iv.as_slice()))
        .opt_quoted("KEYFORMAT", key.key_format.as_deref())
        .opt_quoted("KEYFORMATVERSIONS", key.key_format_versions.as_deref())
        .finish()
}

fn map_attributes(map: &MapInfo) -> String {
    let byte_range = map
        .byte_range
        .map(|range| format!("{}@{}", range.length, range.offset));
    AttributeWriter::new()
        .quoted("URI", &map.uri)
        .opt_quoted("BYTERANGE", byte_range.as_deref())
        .finish()
}

fn date_range_attributes(range: &DateRange) -> String {
    let mut attrs = AttributeWriter::new()
        .quoted("ID", &range.id)
        .opt_quoted("CLASS", range.class.as_deref())
        .quoted("START-DATE", &date_time(&range.start_date))
        .opt_quoted("END-DATE", range.end_date.as_ref().map(date_time).as_deref())
        .opt_raw("DURATION", range.duration)
        .opt_raw("PLANNED-DURATION", range.planned_duration)
        .opt_hex("SCTE35-CMD", range.scte35_cmd.as_deref())
        .opt_hex("SCTE35-OUT", range.scte35_out.as_deref())
        .opt_hex("SCTE35-IN", range.scte35_in.as_deref())
        .flag("END-ON-NEXT", range.end_on_next);
    for (name, value) in &range.client_attributes {
        attrs = attrs.raw(name, value);
    }
    attrs.finish()
}

fn rendition_attributes(rendition: &Rendition) -> String {
    AttributeWriter::new()
        .raw("TYPE", rendition.media_type.as_str())
        .opt_quoted("URI", rendition.uri.as_deref())
        .quoted("GROUP-ID", &rendition.group_id)
        .opt_quoted("LANGUAGE", rendition.language.as_deref())
        .opt_quoted("ASSOC-LANGUAGE", rendition.assoc_language.as_deref())
        .quoted("NAME", &rendition.name)
        .flag("DEFAULT", rendition.default)
        .flag("AUTOSELECT", rendition.autoselect)
        .flag("FORCED", rendition.forced)
        .opt_quoted("INSTREAM-ID", rendition.instream_id.as_deref())
        .opt_quoted("CHARACTERISTICS", rendition.characteristics.as_deref())
        .opt_quoted("CHANNELS", rendition.channels.as_deref())
        .finish()
}

fn stream_inf_attributes(inf: &StreamInf) -> String {
    let attrs = AttributeWriter::new()
        .raw("BANDWIDTH", inf.bandwidth)
        .opt_raw("AVERAGE-BANDWIDTH", inf.average_bandwidth)
        .opt_quoted("CODECS", inf.codecs.as_deref())
        .opt_resolution("RESOLUTION", inf.resolution)
        .opt_raw("FRAME-RATE", inf.frame_rate)
        .opt_raw("HDCP-LEVEL", inf.hdcp_level.map(|level| level.as_str()))
        .opt_quoted("AUDIO", inf.audio.as_deref())
        .opt_quoted("VIDEO", inf.video.as_deref())
        .opt_quoted("SUBTITLES", inf.subtitles.as_deref());
    let attrs = match &inf.closed_captions {
        Some(ClosedCaptions::Group(group)) => attrs.quoted("CLOSED-CAPTIONS", group),
        Some(ClosedCaptions::None) => attrs.raw("CLOSED-CAPTIONS", "NONE"),
        None => attrs,
    };
    attrs.finish()
}

fn i_frame_attributes(variant: &IFrameVariant) -> String {
    AttributeWriter::new()
        .raw("BANDWIDTH", variant.bandwidth)
        .opt_raw("AVERAGE-BANDWIDTH", variant.average_bandwidth)
        .opt_quoted("CODECS", variant.codecs.as_deref())
        .opt_resolution("RESOLUTION", variant.resolution)
        .opt_raw("HDCP-LEVEL", variant.hdcp_level.map(|level| level.as_str()))
        .opt_quoted("VIDEO", variant.video.as_deref())
        .quoted("URI", &variant.uri)
        .finish()
}

fn session_data_attributes(data: &SessionData) -> String {
    let attrs = AttributeWriter::new().quoted("DATA-ID", &data.data_id);
    let attrs = match &data.payload {
        SessionDataPayload::Value(value) => attrs.quoted("VALUE", value),
        SessionDataPayload::Uri(uri) => attrs.quoted("URI", uri),
    };
    attrs
        .opt_quoted("LANGUAGE", data.language.as_deref())
        .finish()
}

fn write_header(writer: &mut PlaylistWriter, doc: &PlaylistDocument) {
    writer.tag(TagKind::ExtM3u);
    if let Some(version) = doc.version {
        writer.tag_with(TagKind::Version, version);
    }
    if doc.independent_segments {
        writer.tag(TagKind::IndependentSegments);
    }
    if let Some(start) = &doc.start {
        let attrs = AttributeWriter::new()
            .raw("TIME-OFFSET", start.time_offset)
            .flag("PRECISE", start.precise)
            .finish();
        writer.tag_with(TagKind::Start, attrs);
    }
}

fn write_segment(writer: &mut PlaylistWriter, segment: &Segment) {
    for tag in &segment.unknown_tags {
        writer.line(&tag.to_string());
    }
    if segment.discontinuity {
        writer.tag(TagKind::Discontinuity);
    }
    for key in &segment.keys {
        writer.tag_with(TagKind::Key, key_attributes(key));
    }
    if let Some(map) = &segment.map {
        writer.tag_with(TagKind::Map, map_attributes(map));
    }
    if let Some(pdt) = &segment.program_date_time {
        writer.tag_with(TagKind::ProgramDateTime, date_time(pdt));
    }
    for range in &segment.date_ranges {
        writer.tag_with(TagKind::DateRange, date_range_attributes(range));
    }
    if let Some(range) = segment.byte_range {
        writer.tag_with(
            TagKind::ByteRange,
            format_args!("{}@{}", range.length, range.offset),
        );
    }
    writer.tag_with(
        TagKind::Inf,
        format_args!("{},{}", segment.duration, segment.title.as_deref().unwrap_or("")),
    );
    writer.line(&segment.uri);
}

fn write_media(writer: &mut PlaylistWriter, doc: &PlaylistDocument) {
    if let Some(target) = doc.target_duration {
        writer.tag_with(TagKind::TargetDuration, target);
    }
    if doc.media_sequence != 0 {
        writer.tag_with(TagKind::MediaSequence, doc.media_sequence);
    }
    if doc.discontinuity_sequence != 0 {
        writer.tag_with(TagKind::DiscontinuitySequence, doc.discontinuity_sequence);
    }
    if let Some(playlist_type) = doc.playlist_type {
        writer.tag_with(TagKind::PlaylistType, playlist_type.as_str());
    }
    if doc.i_frames_only {
        writer.tag(TagKind::IFramesOnly);
    }

    for segment in &doc.segments {
        write_segment(writer, segment);
    }

    // Trailing unrecognized tags are collected at document level
    for tag in &doc.unknown_tags {
        writer.line(&tag.to_string());
    }
    if doc.end_list {
        writer.tag(TagKind::EndList);
    }
}

fn write_master(writer: &mut PlaylistWriter, doc: &PlaylistDocument) {
    // Before any master tag so they stay at document level on re-parse
    for tag in &doc.unknown_tags {
        writer.line(&tag.to_string());
    }
    for data in &doc.session_data {
        writer.tag_with(TagKind::SessionData, session_data_attributes(data));
    }
    for key in &doc.session_keys {
        writer.tag_with(TagKind::SessionKey, key_attributes(key));
    }
    for rendition in &doc.renditions {
        writer.tag_with(TagKind::Media, rendition_attributes(rendition));
    }
    for variant in &doc.variants {
        writer.tag_with(TagKind::StreamInf, stream_inf_attributes(&variant.stream_inf));
        writer.line(&variant.uri);
    }
    for variant in &doc.i_frame_variants {
        writer.tag_with(TagKind::IFrameStreamInf, i_frame_attributes(variant));
    }
}

/// Serialize `doc` as playlist text, one tag or URI per line
pub fn render(doc: &PlaylistDocument) -> String {
    let mut writer = PlaylistWriter::new();
    write_header(&mut writer, doc);
    match doc.kind {
        PlaylistKind::Media => write_media(&mut writer, doc),
        PlaylistKind::Master => write_master(&mut writer, doc),
    }
    writer.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse_playlist;

    fn assert_round_trip(text: &str) -> String {
        let parsed = parse_playlist(text).unwrap();
        let rendered = render(&parsed);
        let reparsed = parse_playlist(&rendered).unwrap();
        assert_eq!(reparsed, parsed, "rendered:\n{}", rendered);
        rendered
    }

    #[test]
    fn test_simple_vod_renders_verbatim() {
        let text = "#EXTM3U\n\
            #EXT-X-VERSION:3\n\
            #EXT-X-TARGETDURATION:10\n\
            #EXTINF:9.009,\n\
            http://media.example.com/first.ts\n\
            #EXTINF:9.009,\n\
            http://media.example.com/second.ts\n\
            #EXTINF:3.003,\n\
            http://media.example.com/third.ts\n\
            #EXT-X-ENDLIST\n";
        assert_eq!(assert_round_trip(text), text);
    }

    #[test]
    fn test_live_playlist_with_sequences() {
        let rendered = assert_round_trip(
            "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:8\n#EXT-X-MEDIA-SEQUENCE:2680\n\
             #EXT-X-DISCONTINUITY-SEQUENCE:4\n\
             #EXTINF:7.975,\nhttps://priv.example.com/fileSequence2680.ts\n\
             #EXT-X-DISCONTINUITY\n\
             #EXTINF:7.941,\nhttps://priv.example.com/fileSequence2681.ts\n",
        );
        assert!(rendered.contains("#EXT-X-MEDIA-SEQUENCE:2680\n"));
        assert!(rendered.contains("#EXT-X-DISCONTINUITY\n#EXTINF:7.941,"));
    }

    #[test]
    fn test_encrypted_media_with_ranges_and_dates() {
        let rendered = assert_round_trip(
            "#EXTM3U\n#EXT-X-VERSION:6\n#EXT-X-TARGETDURATION:10\n#EXT-X-PLAYLIST-TYPE:VOD\n\
             #EXT-X-MAP:URI=\"init.mp4\",BYTERANGE=\"720@0\"\n\
             #EXT-X-KEY:METHOD=AES-128,URI=\"https://keys.example.com/k1\",IV=0x0F0E0D0C0B0A09080706050403020100\n\
             #EXT-X-PROGRAM-DATE-TIME:2010-02-19T14:54:23.031+08:00\n\
             #EXT-X-BYTERANGE:75232@720\n#EXTINF:10,Intro\nmain.mp4\n\
             #EXT-X-BYTERANGE:82112\n#EXTINF:10,\nmain.mp4\n\
             #EXT-X-KEY:METHOD=NONE\n#EXTINF:4.5,\nclear.mp4\n\
             #EXT-X-ENDLIST\n",
        );
        assert!(rendered.contains("#EXT-X-BYTERANGE:82112@75952\n"));
        assert!(rendered.contains("#EXTINF:10,Intro\n"));
        assert!(rendered.contains("#EXT-X-PROGRAM-DATE-TIME:2010-02-19T14:54:23.031+08:00\n"));
        assert!(rendered.contains("IV=0x0F0E0D0C0B0A09080706050403020100"));
    }

    #[test]
    fn test_date_ranges_and_unknown_tags() {
        assert_round_trip(
            "#EXTM3U\n#EXT-X-TARGETDURATION:10\n\
             #EXT-X-CUE-OUT:DURATION=30\n\
             #EXT-X-DATERANGE:ID=\"ad-1\",CLASS=\"com.example.ad\",START-DATE=\"2014-03-05T11:15:00Z\",PLANNED-DURATION=59.993,SCTE35-OUT=0xFC002F,X-AD-ID=\"1234\"\n\
             #EXTINF:10,\nad.ts\n\
             #EXT-X-CUE-IN\n",
        );
    }

    #[test]
    fn test_master_playlist() {
        let rendered = assert_round_trip(
            "#EXTM3U\n#EXT-X-INDEPENDENT-SEGMENTS\n#EXT-X-START:TIME-OFFSET=-12.5,PRECISE=YES\n\
             #EXT-X-SESSION-DATA:DATA-ID=\"com.example.title\",VALUE=\"Example\",LANGUAGE=\"en\"\n\
             #EXT-X-SESSION-KEY:METHOD=SAMPLE-AES,URI=\"skd://key\",KEYFORMAT=\"com.apple.streamingkeydelivery\"\n\
             #EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID=\"aac\",NAME=\"English\",DEFAULT=YES,AUTOSELECT=YES,LANGUAGE=\"en\",URI=\"en.m3u8\"\n\
             #EXT-X-MEDIA:TYPE=CLOSED-CAPTIONS,GROUP-ID=\"cc\",NAME=\"CC1\",INSTREAM-ID=\"CC1\"\n\
             #EXT-X-STREAM-INF:BANDWIDTH=1280000,RESOLUTION=640x360,FRAME-RATE=29.97,AUDIO=\"aac\",CLOSED-CAPTIONS=\"cc\"\n\
             low.m3u8\n\
             #EXT-X-STREAM-INF:BANDWIDTH=640000,CLOSED-CAPTIONS=NONE,HDCP-LEVEL=TYPE-0\n\
             audio-only.m3u8\n\
             #EXT-X-I-FRAME-STREAM-INF:BANDWIDTH=86000,URI=\"low/iframe.m3u8\"\n",
        );
        assert!(rendered.contains("CLOSED-CAPTIONS=NONE"));
        assert!(rendered.contains("TIME-OFFSET=-12.5,PRECISE=YES"));
        assert!(rendered.contains("low.m3u8\n"));
    }

    #[test]
    fn test_comments_are_dropped() {
        let rendered =
            assert_round_trip("#EXTM3U\n# generated\n#EXT-X-TARGETDURATION:6\n\n#EXTINF:6,\ns.ts\n");
        assert!(!rendered.contains("# generated"));
    }
}
