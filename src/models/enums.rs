//! Type enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural track type as reported by mkvmerge identify output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Video,
    Audio,
    Subtitles,
    Buttons,
}

impl TrackType {
    /// All structural types, in the order their directives are emitted.
    pub const ALL: [TrackType; 4] = [
        TrackType::Video,
        TrackType::Audio,
        TrackType::Subtitles,
        TrackType::Buttons,
    ];

    /// Parse from the `type` field of mkvmerge identify output.
    pub fn from_identify_type(s: &str) -> Option<Self> {
        match s {
            "video" => Some(TrackType::Video),
            "audio" => Some(TrackType::Audio),
            "subtitles" => Some(TrackType::Subtitles),
            "buttons" => Some(TrackType::Buttons),
            _ => None,
        }
    }

    /// Label used in identify output and in the `--no-<type>` flags.
    pub fn label(&self) -> &'static str {
        match self {
            TrackType::Video => "video",
            TrackType::Audio => "audio",
            TrackType::Subtitles => "subtitles",
            TrackType::Buttons => "buttons",
        }
    }

    /// Track inclusion flag. mkvmerge singularizes subtitles and buttons
    /// here, unlike everywhere else.
    pub fn tracks_flag(&self) -> &'static str {
        match self {
            TrackType::Video => "--video-tracks",
            TrackType::Audio => "--audio-tracks",
            TrackType::Subtitles => "--subtitle-tracks",
            TrackType::Buttons => "--button-tracks",
        }
    }

    /// Track exclusion flag, emitted when no tracks of this type are declared.
    pub fn no_flag(&self) -> &'static str {
        match self {
            TrackType::Video => "--no-video",
            TrackType::Audio => "--no-audio",
            TrackType::Subtitles => "--no-subtitles",
            TrackType::Buttons => "--no-buttons",
        }
    }

    /// Reserved per-source option key. When present on a source, neither the
    /// inclusion nor the exclusion directive is emitted for this type, so
    /// mkvmerge keeps every track of the type.
    pub fn copy_all_key(&self) -> &'static str {
        match self {
            TrackType::Video => "_copy-video-tracks",
            TrackType::Audio => "_copy-audio-tracks",
            TrackType::Subtitles => "_copy-subtitles-tracks",
            TrackType::Buttons => "_copy-buttons-tracks",
        }
    }

    /// Short prefix for compact display.
    pub fn prefix(&self) -> &'static str {
        match self {
            TrackType::Video => "V",
            TrackType::Audio => "A",
            TrackType::Subtitles => "S",
            TrackType::Buttons => "B",
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_identify_types() {
        assert_eq!(
            TrackType::from_identify_type("video"),
            Some(TrackType::Video)
        );
        assert_eq!(
            TrackType::from_identify_type("buttons"),
            Some(TrackType::Buttons)
        );
        assert_eq!(TrackType::from_identify_type("menu"), None);
    }

    #[test]
    fn inclusion_flags_are_singularized() {
        assert_eq!(TrackType::Video.tracks_flag(), "--video-tracks");
        assert_eq!(TrackType::Subtitles.tracks_flag(), "--subtitle-tracks");
        assert_eq!(TrackType::Buttons.tracks_flag(), "--button-tracks");
    }

    #[test]
    fn exclusion_flags_keep_the_plural() {
        assert_eq!(TrackType::Subtitles.no_flag(), "--no-subtitles");
        assert_eq!(TrackType::Buttons.no_flag(), "--no-buttons");
    }
}
