//! Merge-side source model.
//!
//! A source couples a file with the identify snapshot taken when it was
//! opened, an ordered set of per-source scalar options, and the ordered
//! sequence of declared tracks with their option sets.

use std::path::{Path, PathBuf};

use crate::io::{CommandRunner, Toolset};
use crate::models::{MkvError, MkvResult, OptionMap, OptionValue, TrackRecord, TrackType};
use crate::probe;

/// One declared track and its options.
#[derive(Debug, Clone)]
pub struct SourceTrack {
    pub id: u64,
    pub options: OptionMap,
}

/// A source file to mux from.
pub struct Source {
    file: PathBuf,
    options: OptionMap,
    tracks: Vec<SourceTrack>,
    info: Vec<TrackRecord>,
}

impl Source {
    /// Build from an already-identified snapshot.
    pub fn new(file: impl Into<PathBuf>, info: Vec<TrackRecord>) -> Self {
        Self {
            file: file.into(),
            options: OptionMap::new(),
            tracks: Vec::new(),
            info,
        }
    }

    /// Open a source file, identifying it with mkvmerge.
    ///
    /// The snapshot is fetched exactly once here; call [`refresh_info`]
    /// after changing the underlying file.
    ///
    /// [`refresh_info`]: Source::refresh_info
    pub fn open(
        runner: &CommandRunner,
        tools: &Toolset,
        file: impl Into<PathBuf>,
    ) -> MkvResult<Self> {
        let file = file.into();
        let info = probe::identify(runner, &tools.mkvmerge, &file)?;
        Ok(Self::new(file, info))
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The cached identify snapshot.
    pub fn info(&self) -> &[TrackRecord] {
        &self.info
    }

    /// Declared tracks, in declaration order.
    pub fn tracks(&self) -> &[SourceTrack] {
        &self.tracks
    }

    /// Set a per-source scalar option. Keys starting with `_` are internal
    /// bookkeeping and are never emitted as flags.
    pub fn set_option(&mut self, name: impl Into<String>, value: OptionValue) {
        self.options.set(name, value);
    }

    pub fn options(&self) -> &OptionMap {
        &self.options
    }

    /// Declare a track with its options.
    ///
    /// Declaring the same id again replaces its options but keeps its
    /// original position, so the declared set never holds duplicates.
    pub fn add_track_options(&mut self, track: u64, options: OptionMap) {
        match self.tracks.iter_mut().find(|t| t.id == track) {
            Some(existing) => existing.options = options,
            None => self.tracks.push(SourceTrack { id: track, options }),
        }
    }

    /// Remove a declared track. Removing an unknown id is a no-op.
    pub fn remove_track_options(&mut self, track: u64) {
        self.tracks.retain(|t| t.id != track);
    }

    /// Re-fetch the identify snapshot after the underlying file changed.
    pub fn refresh_info(&mut self, runner: &CommandRunner, tools: &Toolset) -> MkvResult<()> {
        self.info = probe::identify(runner, &tools.mkvmerge, &self.file)?;
        Ok(())
    }

    /// Emit this source's option fragment.
    ///
    /// Layout: per-type inclusion/exclusion directives, per-source scalar
    /// options, per-track options, then the file path wrapped in `(` `)` so
    /// mkvmerge scopes the preceding flags to this file.
    pub fn emit_options(&self) -> MkvResult<Vec<String>> {
        let mut declared: Vec<(TrackType, Vec<u64>)> = TrackType::ALL
            .iter()
            .map(|t| (*t, Vec::new()))
            .collect();

        // Per-track options, collected first so a bogus id fails before
        // anything is emitted.
        let mut track_args = Vec::new();
        for track in &self.tracks {
            let record = self
                .info
                .iter()
                .find(|r| r.id == track.id)
                .ok_or_else(|| MkvError::TrackNotInSource {
                    file: self.file.clone(),
                    track: track.id,
                })?;

            declared
                .iter_mut()
                .find(|(t, _)| *t == record.track_type)
                .expect("all track types are bucketed")
                .1
                .push(track.id);

            for (name, value) in track.options.iter() {
                match value {
                    OptionValue::Value(v) => {
                        track_args.push(format!("--{name}"));
                        track_args.push(format!("{}:{}", track.id, v));
                    }
                    OptionValue::Flag => track_args.push(format!("--{name}")),
                }
            }
        }

        let mut args = Vec::new();

        for (track_type, ids) in &declared {
            if self.options.contains(track_type.copy_all_key()) {
                continue;
            }
            if ids.is_empty() {
                args.push(track_type.no_flag().to_string());
            } else {
                args.push(track_type.tracks_flag().to_string());
                args.push(
                    ids.iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(","),
                );
            }
        }

        for (name, value) in self.options.iter() {
            if name.starts_with('_') {
                continue;
            }
            match value {
                OptionValue::Value(v) => {
                    args.push(format!("--{name}"));
                    args.push(v.clone());
                }
                OptionValue::Flag => args.push(format!("--{name}")),
            }
        }

        args.extend(track_args);
        args.push("(".to_string());
        args.push(std::path::absolute(&self.file)?.display().to_string());
        args.push(")".to_string());

        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrackType;

    fn snapshot() -> Vec<TrackRecord> {
        vec![
            TrackRecord::new(0, TrackType::Video, None, "V_MPEG4/ISO/AVC"),
            TrackRecord::new(1, TrackType::Audio, Some("jpn".into()), "A_AAC"),
            TrackRecord::new(2, TrackType::Audio, Some("eng".into()), "A_AC3"),
            TrackRecord::new(3, TrackType::Subtitles, Some("eng".into()), "S_TEXT/ASS"),
        ]
    }

    fn abs(path: &str) -> String {
        std::path::absolute(path).unwrap().display().to_string()
    }

    #[test]
    fn empty_source_excludes_every_type() {
        let source = Source::new("a.mkv", snapshot());
        let args = source.emit_options().unwrap();
        let path = abs("a.mkv");
        assert_eq!(
            args,
            vec![
                "--no-video",
                "--no-audio",
                "--no-subtitles",
                "--no-buttons",
                "(",
                path.as_str(),
                ")",
            ]
        );
    }

    #[test]
    fn declared_tracks_get_inclusion_directives() {
        let mut source = Source::new("a.mkv", snapshot());
        source.add_track_options(0, OptionMap::new());
        source.add_track_options(1, OptionMap::new());
        source.add_track_options(2, OptionMap::new());

        let args = source.emit_options().unwrap();
        let path = abs("a.mkv");
        assert_eq!(
            args,
            vec![
                "--video-tracks",
                "0",
                "--audio-tracks",
                "1,2",
                "--no-subtitles",
                "--no-buttons",
                "(",
                path.as_str(),
                ")",
            ]
        );
    }

    #[test]
    fn duplicate_declaration_is_last_write_wins() {
        let mut source = Source::new("a.mkv", snapshot());
        source.add_track_options(
            1,
            OptionMap::from([("language", OptionValue::value("und"))]),
        );
        source.add_track_options(2, OptionMap::new());
        source.add_track_options(
            1,
            OptionMap::from([("language", OptionValue::value("jpn"))]),
        );

        let args = source.emit_options().unwrap();
        let path = abs("a.mkv");
        // No duplicate id, position kept, replaced options in effect.
        assert_eq!(
            args,
            vec![
                "--no-video",
                "--audio-tracks",
                "1,2",
                "--no-subtitles",
                "--no-buttons",
                "--language",
                "1:jpn",
                "(",
                path.as_str(),
                ")",
            ]
        );
    }

    #[test]
    fn copy_all_override_suppresses_directives() {
        let mut source = Source::new("a.mkv", snapshot());
        source.set_option(TrackType::Audio.copy_all_key(), OptionValue::Flag);

        let args = source.emit_options().unwrap();
        assert!(!args.contains(&"--no-audio".to_string()));
        assert!(!args.contains(&"--audio-tracks".to_string()));
        // The reserved key itself is never emitted as a flag.
        assert!(!args.iter().any(|a| a.contains("_copy-audio-tracks")));
        assert!(args.contains(&"--no-video".to_string()));
    }

    #[test]
    fn track_and_scalar_options_emit_flag_and_value_shapes() {
        let mut source = Source::new("a.mkv", snapshot());
        source.set_option("no-chapters", OptionValue::Flag);
        source.set_option("sync", OptionValue::value("0:200"));
        source.add_track_options(
            1,
            OptionMap::from([
                ("language", OptionValue::value("jpn")),
                ("default-track", OptionValue::Flag),
            ]),
        );

        let args = source.emit_options().unwrap();
        let path = abs("a.mkv");
        assert_eq!(
            args,
            vec![
                "--no-video",
                "--audio-tracks",
                "1",
                "--no-subtitles",
                "--no-buttons",
                "--no-chapters",
                "--sync",
                "0:200",
                "--language",
                "1:jpn",
                "--default-track",
                "(",
                path.as_str(),
                ")",
            ]
        );
    }

    #[test]
    fn unknown_track_id_fails_at_emission() {
        let mut source = Source::new("a.mkv", snapshot());
        source.add_track_options(7, OptionMap::new());

        let err = source.emit_options().unwrap_err();
        match err {
            MkvError::TrackNotInSource { track, .. } => assert_eq!(track, 7),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn remove_is_idempotent() {
        let mut source = Source::new("a.mkv", snapshot());
        source.add_track_options(1, OptionMap::new());
        source.remove_track_options(1);
        source.remove_track_options(1);
        assert!(source.tracks().is_empty());
    }
}
