//! Source identification via `mkvmerge -i <file> -F json`.
//!
//! Produces the ordered [`TrackRecord`] snapshot that track selectors and
//! source models resolve against.

use std::ffi::OsStr;
use std::path::Path;

use serde::Deserialize;

use crate::io::CommandRunner;
use crate::models::{MkvError, MkvResult, TrackRecord, TrackType};

#[derive(Debug, Deserialize)]
struct IdentifyOutput {
    #[serde(default)]
    tracks: Vec<IdentifyTrack>,
}

#[derive(Debug, Deserialize)]
struct IdentifyTrack {
    id: u64,
    #[serde(rename = "type")]
    track_type: TrackType,
    properties: IdentifyProperties,
}

#[derive(Debug, Deserialize)]
struct IdentifyProperties {
    language: Option<String>,
    codec_id: String,
}

/// Identify a source file and return its track snapshot.
///
/// Fails with `FileNotFound` for a missing source, `CommandFailed` when
/// mkvmerge exits non-zero, and `MalformedOutput` when the JSON does not
/// have the expected shape.
pub fn identify(
    runner: &CommandRunner,
    mkvmerge: &Path,
    source: &Path,
) -> MkvResult<Vec<TrackRecord>> {
    if !source.exists() {
        return Err(MkvError::FileNotFound(source.to_path_buf()));
    }

    tracing::debug!("identifying {}", source.display());

    let args: [&OsStr; 4] = [
        OsStr::new("-i"),
        source.as_os_str(),
        OsStr::new("-F"),
        OsStr::new("json"),
    ];
    let output = runner.run_captured(mkvmerge, args)?;

    if !output.success {
        return Err(MkvError::CommandFailed {
            tool: "mkvmerge".to_string(),
            exit_code: output.exit_code,
            message: output.stderr,
        });
    }

    parse_identify_json(&output.stdout)
}

/// Parse the identify JSON into track records, preserving track order.
pub fn parse_identify_json(json: &str) -> MkvResult<Vec<TrackRecord>> {
    let parsed: IdentifyOutput =
        serde_json::from_str(json).map_err(|e| MkvError::MalformedOutput {
            tool: "mkvmerge".to_string(),
            message: e.to_string(),
        })?;

    Ok(parsed
        .tracks
        .into_iter()
        .map(|t| TrackRecord::new(t.id, t.track_type, t.properties.language, t.properties.codec_id))
        .collect())
}

/// Filter a track snapshot by type and/or language, preserving order.
///
/// With both filters omitted the whole snapshot is returned.
pub fn filter_tracks<'a>(
    records: &'a [TrackRecord],
    track_type: Option<TrackType>,
    language: Option<&str>,
) -> Vec<&'a TrackRecord> {
    records
        .iter()
        .filter(|r| track_type.is_none_or(|t| r.track_type == t))
        .filter(|r| language.is_none_or(|l| r.language.as_deref() == Some(l)))
        .collect()
}
