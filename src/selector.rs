//! Track selectors: by explicit id, or by type/language filter.
//!
//! Configuration may name a track directly (`"track": 3`) or describe it
//! (`"track": {"type": "audio", "language": "jpn", "index": 0}`). The two
//! shapes are kept as tagged variants; exactly one resolution strategy
//! applies per selector.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::models::{MkvError, MkvResult, TrackRecord, TrackType};
use crate::probe::filter_tracks;

/// A track specification from configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TrackSelector {
    /// Explicit numeric track id.
    Id(u64),
    /// Type/language filter plus the ordinal of the wanted match.
    ///
    /// The ordinal is required so a filter matching several tracks never
    /// picks one silently.
    Filter {
        #[serde(rename = "type", default)]
        track_type: Option<TrackType>,
        #[serde(default)]
        language: Option<String>,
        index: usize,
    },
}

impl TrackSelector {
    /// Resolve against a source's track snapshot.
    ///
    /// A raw id is returned unchecked; its existence is validated later,
    /// against the actual track set, by whoever emits options for it. A
    /// filter fails with `NoMatchingTrack` when nothing matches and with
    /// `AmbiguousSelector` when the filtered set is smaller than the
    /// requested ordinal.
    pub fn resolve(&self, records: &[TrackRecord], source: &Path) -> MkvResult<u64> {
        match self {
            TrackSelector::Id(id) => Ok(*id),
            TrackSelector::Filter {
                track_type,
                language,
                index,
            } => {
                let matched = filter_tracks(records, *track_type, language.as_deref());
                if matched.is_empty() {
                    return Err(MkvError::NoMatchingTrack {
                        file: source.to_path_buf(),
                        selector: self.to_string(),
                    });
                }
                match matched.get(*index) {
                    Some(record) => Ok(record.id),
                    None => Err(MkvError::AmbiguousSelector {
                        file: source.to_path_buf(),
                        selector: self.to_string(),
                        index: *index,
                        matched: matched.len(),
                    }),
                }
            }
        }
    }
}

impl fmt::Display for TrackSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackSelector::Id(id) => write!(f, "{{id: {id}}}"),
            TrackSelector::Filter {
                track_type,
                language,
                index,
            } => {
                write!(f, "{{")?;
                if let Some(t) = track_type {
                    write!(f, "type: {t}, ")?;
                }
                if let Some(l) = language {
                    write!(f, "language: {l}, ")?;
                }
                write!(f, "index: {index}}}")
            }
        }
    }
}
