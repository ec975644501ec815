//! Track records parsed from mkvmerge identify output.

use super::enums::TrackType;

/// One track in a source's identify snapshot.
///
/// The snapshot is taken once when the source is opened and is never
/// refreshed behind the caller's back; `Source::refresh_info` exists for
/// when the underlying file changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// mkvmerge track id, unique within one source.
    pub id: u64,

    /// Structural type.
    pub track_type: TrackType,

    /// Language code (e.g. "eng", "jpn"), when the container carries one.
    pub language: Option<String>,

    /// Codec ID (e.g. "V_MPEG4/ISO/AVC", "A_AAC", "S_TEXT/ASS").
    pub codec_id: String,
}

impl TrackRecord {
    pub fn new(
        id: u64,
        track_type: TrackType,
        language: Option<String>,
        codec_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            track_type,
            language,
            codec_id: codec_id.into(),
        }
    }

    /// Compact display string, e.g. `[A-1] A_AAC (jpn)`.
    pub fn display_compact(&self) -> String {
        let lang = self.language.as_deref().unwrap_or("und");
        format!(
            "[{}-{}] {} ({})",
            self.track_type.prefix(),
            self.id,
            self.codec_id,
            lang
        )
    }
}
