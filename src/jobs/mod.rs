//! Typed job descriptions loaded from JSON configuration files.
//!
//! Deserialization is the validation boundary: unknown fields are rejected
//! and selector/option shapes are checked by the type system before any
//! external process is spawned.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::{MkvError, MkvResult, OptionMap};
use crate::selector::TrackSelector;

/// Merge-direction job description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
    pub sources: Vec<SourceConfig>,

    /// Declared tracks. The array's order doubles as the track-order
    /// override for the output container.
    #[serde(default)]
    pub tracks: Vec<TrackEntry>,

    pub output_file: PathBuf,

    /// Global mkvmerge options.
    #[serde(default)]
    pub options: OptionMap,

    #[serde(default)]
    pub attachments: Vec<AttachmentConfig>,

    /// Directories whose regular files all become attachments.
    #[serde(default)]
    pub attachment_directories: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub filename: PathBuf,

    /// Per-source scalar options.
    #[serde(default)]
    pub options: OptionMap,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackEntry {
    /// Index into `sources`.
    pub source: usize,

    pub track: TrackSelector,

    #[serde(default)]
    pub options: OptionMap,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttachmentConfig {
    pub filename: PathBuf,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub mimetype: Option<String>,
}

/// Extract-direction job description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractConfig {
    pub source: PathBuf,

    #[serde(default)]
    pub tracks: Vec<TrackTarget>,

    #[serde(default)]
    pub attachments: Vec<IdTarget>,

    #[serde(default)]
    pub timestamps: Vec<IdTarget>,

    #[serde(default)]
    pub cues: Vec<IdTarget>,

    #[serde(default)]
    pub chapters: Option<PathBuf>,

    #[serde(default)]
    pub tags: Option<PathBuf>,
}

/// A track to extract and where to put it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackTarget {
    pub track: TrackSelector,
    pub filename: PathBuf,
}

/// An id-addressed item (attachment, timestamps, cues) and its destination.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdTarget {
    pub id: u64,
    pub filename: PathBuf,
}

/// Load and validate a merge job description.
pub fn load_merge_config(path: &Path) -> MkvResult<MergeConfig> {
    load_config(path)
}

/// Load and validate an extract job description.
pub fn load_extract_config(path: &Path) -> MkvResult<ExtractConfig> {
    load_config(path)
}

fn load_config<T: DeserializeOwned>(path: &Path) -> MkvResult<T> {
    if !path.exists() {
        return Err(MkvError::FileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OptionValue;
    use std::io::Write;

    const MERGE_JSON: &str = r#"{
        "output_file": "out.mkv",
        "sources": [
            {"filename": "a.mkv"},
            {"filename": "b.mkv", "options": {"no-chapters": null}}
        ],
        "tracks": [
            {"source": 0, "track": 0, "options": {"default-track": null}},
            {"source": 1, "track": {"type": "audio", "language": "jpn", "index": 0}}
        ],
        "options": {"title": "Movie"},
        "attachments": [{"filename": "font.ttf", "mimetype": "font/ttf"}],
        "attachment_directories": ["fonts"]
    }"#;

    #[test]
    fn merge_config_round_trip() {
        let config: MergeConfig = serde_json::from_str(MERGE_JSON).unwrap();

        assert_eq!(config.sources.len(), 2);
        assert!(config.sources[1].options.contains("no-chapters"));
        assert_eq!(config.tracks[0].track, TrackSelector::Id(0));
        assert!(matches!(
            config.tracks[1].track,
            TrackSelector::Filter { .. }
        ));
        assert_eq!(
            config.options.get("title"),
            Some(&OptionValue::value("Movie"))
        );
        assert_eq!(config.attachments[0].mimetype.as_deref(), Some("font/ttf"));
        assert_eq!(config.attachment_directories, vec![PathBuf::from("fonts")]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<MergeConfig, _> = serde_json::from_str(
            r#"{"output_file": "o.mkv", "sources": [], "outputs": []}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn extract_config_modes() {
        let config: ExtractConfig = serde_json::from_str(
            r#"{
                "source": "movie.mkv",
                "tracks": [{"track": 1, "filename": "audio.aac"}],
                "timestamps": [{"id": 2, "filename": "ts.txt"}],
                "chapters": "chapters.xml"
            }"#,
        )
        .unwrap();

        assert_eq!(config.source, PathBuf::from("movie.mkv"));
        assert_eq!(config.tracks.len(), 1);
        assert_eq!(config.timestamps[0].id, 2);
        assert!(config.cues.is_empty());
        assert_eq!(config.chapters, Some(PathBuf::from("chapters.xml")));
        assert_eq!(config.tags, None);
    }

    #[test]
    fn missing_config_file_is_reported_with_path() {
        let err = load_merge_config(Path::new("no-such-config.json")).unwrap_err();
        assert!(matches!(err, MkvError::FileNotFound(_)));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        let err = load_merge_config(file.path()).unwrap_err();
        assert!(matches!(err, MkvError::Json(_)));
        assert_eq!(err.exit_code(), 100);
    }
}
