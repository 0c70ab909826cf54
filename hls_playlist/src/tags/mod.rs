//! Tag registry
//!
//! Closed enumeration of the RFC 8216 tags with their literal prefixes, scope
//! class and value shape. Lookup goes through a table built once on first use;
//! names outside the table come back as [`TagKind::Unrecognized`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Where a tag may appear and what it applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagScope {
    /// Header, version, and tags valid in both playlist kinds
    Basic,
    /// Applies to the next media segment
    MediaSegment,
    /// Applies to a whole media playlist
    MediaPlaylist,
    /// Only valid in master playlists
    MasterPlaylist,
}

impl TagScope {
    pub const fn as_str(self) -> &'static str {
        match self {
            TagScope::Basic => "basic",
            TagScope::MediaSegment => "media-segment",
            TagScope::MediaPlaylist => "media-playlist",
            TagScope::MasterPlaylist => "master-playlist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKind {
    // === Basic ===
    ExtM3u,
    Version,

    // === Media segment ===
    Inf,
    ByteRange,
    Discontinuity,
    Key,
    Map,
    ProgramDateTime,
    DateRange,

    // === Media playlist ===
    TargetDuration,
    MediaSequence,
    DiscontinuitySequence,
    EndList,
    PlaylistType,
    IFramesOnly,

    // === Media or master playlist ===
    IndependentSegments,
    Start,

    // === Master playlist ===
    Media,
    StreamInf,
    IFrameStreamInf,
    SessionData,
    SessionKey,

    /// Any `#EXT` tag outside the registry, kept by name
    Unrecognized(String),
}

impl TagKind {
    /// Every known tag, in registry order
    pub const ALL: &'static [TagKind] = &[
        TagKind::ExtM3u,
        TagKind::Version,
        TagKind::Inf,
        TagKind::ByteRange,
        TagKind::Discontinuity,
        TagKind::Key,
        TagKind::Map,
        TagKind::ProgramDateTime,
        TagKind::DateRange,
        TagKind::TargetDuration,
        TagKind::MediaSequence,
        TagKind::DiscontinuitySequence,
        TagKind::EndList,
        TagKind::PlaylistType,
        TagKind::IFramesOnly,
        TagKind::IndependentSegments,
        TagKind::Start,
        TagKind::Media,
        TagKind::StreamInf,
        TagKind::IFrameStreamInf,
        TagKind::SessionData,
        TagKind::SessionKey,
    ];

    /// Literal tag name as written in a playlist, including the leading `#`
    pub fn literal(&self) -> &str {
        match self {
            TagKind::ExtM3u => "#EXTM3U",
            TagKind::Version => "#EXT-X-VERSION",
            TagKind::Inf => "#EXTINF",
            TagKind::ByteRange => "#EXT-X-BYTERANGE",
            TagKind::Discontinuity => "#EXT-X-DISCONTINUITY",
            TagKind::Key => "#EXT-X-KEY",
            TagKind::Map => "#EXT-X-MAP",
            TagKind::ProgramDateTime => "#EXT-X-PROGRAM-DATE-TIME",
            TagKind::DateRange => "#EXT-X-DATERANGE",
            TagKind::TargetDuration => "#EXT-X-TARGETDURATION",
            TagKind::MediaSequence => "#EXT-X-MEDIA-SEQUENCE",
            TagKind::DiscontinuitySequence => "#EXT-X-DISCONTINUITY-SEQUENCE",
            TagKind::EndList => "#EXT-X-ENDLIST",
            TagKind::PlaylistType => "#EXT-X-PLAYLIST-TYPE",
            TagKind::IFramesOnly => "#EXT-X-I-FRAMES-ONLY",
            TagKind::IndependentSegments => "#EXT-X-INDEPENDENT-SEGMENTS",
            TagKind::Start => "#EXT-X-START",
            TagKind::Media => "#EXT-X-MEDIA",
            TagKind::StreamInf => "#EXT-X-STREAM-INF",
            TagKind::IFrameStreamInf => "#EXT-X-I-FRAME-STREAM-INF",
            TagKind::SessionData => "#EXT-X-SESSION-DATA",
            TagKind::SessionKey => "#EXT-X-SESSION-KEY",
            TagKind::Unrecognized(name) => name,
        }
    }

    /// Scope class; unrecognized tags have none
    pub fn scope(&self) -> Option<TagScope> {
        let scope = match self {
            TagKind::ExtM3u
            | TagKind::Version
            | TagKind::IndependentSegments
            | TagKind::Start => TagScope::Basic,

            TagKind::Inf
            | TagKind::ByteRange
            | TagKind::Discontinuity
            | TagKind::Key
            | TagKind::Map
            | TagKind::ProgramDateTime
            | TagKind::DateRange => TagScope::MediaSegment,

            TagKind::TargetDuration
            | TagKind::MediaSequence
            | TagKind::DiscontinuitySequence
            | TagKind::EndList
            | TagKind::PlaylistType
            | TagKind::IFramesOnly => TagScope::MediaPlaylist,

            TagKind::Media
            | TagKind::StreamInf
            | TagKind::IFrameStreamInf
            | TagKind::SessionData
            | TagKind::SessionKey => TagScope::MasterPlaylist,

            TagKind::Unrecognized(_) => return None,
        };
        Some(scope)
    }

    /// Whether the tag is written with a `:value` part.
    /// Unrecognized tags may carry either form and report `false`.
    pub fn takes_value(&self) -> bool {
        !matches!(
            self,
            TagKind::ExtM3u
                | TagKind::Discontinuity
                | TagKind::EndList
                | TagKind::IFramesOnly
                | TagKind::IndependentSegments
                | TagKind::Unrecognized(_)
        )
    }

    /// Whether the value is an attribute list rather than a bare value
    pub fn has_attribute_list(&self) -> bool {
        matches!(
            self,
            TagKind::Key
                | TagKind::Map
                | TagKind::DateRange
                | TagKind::Start
                | TagKind::Media
                | TagKind::StreamInf
                | TagKind::IFrameStreamInf
                | TagKind::SessionData
                | TagKind::SessionKey
        )
    }

    /// Lowest `EXT-X-VERSION` under which the tag may appear at all.
    /// Attribute-level requirements are checked by the model validator.
    pub fn min_version(&self) -> u64 {
        match self {
            TagKind::ByteRange | TagKind::IFramesOnly => 4,
            TagKind::Map => 5,
            _ => 1,
        }
    }

    /// Tags that may occur at most once per playlist
    pub fn is_playlist_singleton(&self) -> bool {
        matches!(
            self,
            TagKind::Version
                | TagKind::TargetDuration
                | TagKind::MediaSequence
                | TagKind::DiscontinuitySequence
                | TagKind::PlaylistType
                | TagKind::IFramesOnly
                | TagKind::IndependentSegments
                | TagKind::Start
        )
    }

    pub fn is_segment_tag(&self) -> bool {
        self.scope() == Some(TagScope::MediaSegment)
    }

    pub fn is_master_tag(&self) -> bool {
        self.scope() == Some(TagScope::MasterPlaylist)
    }

    pub fn is_media_tag(&self) -> bool {
        matches!(
            self.scope(),
            Some(TagScope::MediaSegment | TagScope::MediaPlaylist)
        )
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, TagKind::Unrecognized(_))
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

static TAG_REGISTRY: OnceLock<HashMap<String, TagKind>> = OnceLock::new();

fn registry() -> &'static HashMap<String, TagKind> {
    TAG_REGISTRY.get_or_init(|| {
        TagKind::ALL
            .iter()
            .map(|kind| (kind.literal().to_string(), kind.clone()))
            .collect()
    })
}

/// Look up a tag by its literal name (case-sensitive, including the `#`)
pub fn lookup(name: &str) -> TagKind {
    registry()
        .get(name)
        .cloned()
        .unwrap_or_else(|| TagKind::Unrecognized(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_tags() {
        assert_eq!(lookup("#EXTINF"), TagKind::Inf);
        assert_eq!(lookup("#EXT-X-KEY"), TagKind::Key);
        assert_eq!(lookup("#EXT-X-I-FRAME-STREAM-INF"), TagKind::IFrameStreamInf);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(
            lookup("#extinf"),
            TagKind::Unrecognized("#extinf".to_string())
        );
    }

    #[test]
    fn test_unknown_tag_preserved() {
        let kind = lookup("#EXT-X-CUE-OUT");
        assert!(!kind.is_recognized());
        assert_eq!(kind.literal(), "#EXT-X-CUE-OUT");
        assert_eq!(kind.scope(), None);
    }

    #[test]
    fn test_every_known_tag_round_trips_through_registry() {
        for kind in TagKind::ALL {
            assert_eq!(&lookup(kind.literal()), kind);
        }
        assert_eq!(TagKind::ALL.len(), 22);
    }

    #[test]
    fn test_scope_classification() {
        assert_eq!(TagKind::Inf.scope(), Some(TagScope::MediaSegment));
        assert_eq!(TagKind::EndList.scope(), Some(TagScope::MediaPlaylist));
        assert_eq!(TagKind::StreamInf.scope(), Some(TagScope::MasterPlaylist));
        assert_eq!(TagKind::Start.scope(), Some(TagScope::Basic));
        assert!(TagKind::DateRange.is_segment_tag());
        assert!(TagKind::TargetDuration.is_media_tag());
        assert!(!TagKind::Version.is_media_tag());
    }

    #[test]
    fn test_value_shapes() {
        assert!(!TagKind::EndList.takes_value());
        assert!(TagKind::Inf.takes_value());
        assert!(TagKind::Key.has_attribute_list());
        assert!(!TagKind::ByteRange.has_attribute_list());
        assert_eq!(TagKind::ByteRange.min_version(), 4);
    }
}
