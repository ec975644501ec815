//! Extract job: per-mode demux requests against one source container.

use std::path::{Path, PathBuf};

use crate::io::{CommandRunner, Toolset};
use crate::jobs::{ExtractConfig, IdTarget, TrackTarget};
use crate::models::{MkvError, MkvResult, TrackRecord};
use crate::probe;
use crate::selector::TrackSelector;

/// A complete extract direction job.
///
/// Track-mode entries carry selectors and are resolved against the source's
/// identify snapshot; attachment, timestamps and cues entries take their
/// ids as given, with no existence check.
pub struct ExtractJob {
    tools: Toolset,
    runner: CommandRunner,
    source: PathBuf,
    info: Vec<TrackRecord>,
    tracks: Vec<TrackTarget>,
    attachments: Vec<IdTarget>,
    timestamps: Vec<IdTarget>,
    cues: Vec<IdTarget>,
    chapters: Option<PathBuf>,
    tags: Option<PathBuf>,
}

impl ExtractJob {
    /// Build from an already-identified snapshot.
    pub fn new(tools: Toolset, source: impl Into<PathBuf>, info: Vec<TrackRecord>) -> Self {
        Self {
            tools,
            runner: CommandRunner::new(),
            source: source.into(),
            info,
            tracks: Vec::new(),
            attachments: Vec::new(),
            timestamps: Vec::new(),
            cues: Vec::new(),
            chapters: None,
            tags: None,
        }
    }

    /// Open the source, identifying it with mkvmerge, and take over the
    /// configuration's per-mode requests.
    pub fn from_config(tools: Toolset, config: ExtractConfig) -> MkvResult<Self> {
        if !config.source.exists() {
            return Err(MkvError::FileNotFound(config.source.clone()));
        }

        let runner = CommandRunner::new();
        let info = probe::identify(&runner, &tools.mkvmerge, &config.source)?;

        let mut job = Self::new(tools, config.source, info);
        job.tracks = config.tracks;
        job.attachments = config.attachments;
        job.timestamps = config.timestamps;
        job.cues = config.cues;
        job.chapters = config.chapters;
        job.tags = config.tags;
        Ok(job)
    }

    pub fn request_track(&mut self, track: TrackSelector, filename: impl Into<PathBuf>) {
        self.tracks.push(TrackTarget {
            track,
            filename: filename.into(),
        });
    }

    pub fn request_attachment(&mut self, id: u64, filename: impl Into<PathBuf>) {
        self.attachments.push(IdTarget {
            id,
            filename: filename.into(),
        });
    }

    pub fn request_timestamps(&mut self, id: u64, filename: impl Into<PathBuf>) {
        self.timestamps.push(IdTarget {
            id,
            filename: filename.into(),
        });
    }

    pub fn request_cues(&mut self, id: u64, filename: impl Into<PathBuf>) {
        self.cues.push(IdTarget {
            id,
            filename: filename.into(),
        });
    }

    pub fn set_chapters(&mut self, filename: impl Into<PathBuf>) {
        self.chapters = Some(filename.into());
    }

    pub fn set_tags(&mut self, filename: impl Into<PathBuf>) {
        self.tags = Some(filename.into());
    }

    /// Generate the full token sequence, executable first.
    ///
    /// Modes are emitted in a fixed order: tracks, attachments, timestamps,
    /// cues, chapters, tags. The timestamps mode is emitted under
    /// mkvextract's versioned `timestamps_v2` label, not the configuration
    /// key.
    pub fn generate_command(&self) -> MkvResult<Vec<String>> {
        let mut tokens = vec![
            self.tools.mkvextract.display().to_string(),
            self.source.display().to_string(),
        ];

        if !self.tracks.is_empty() {
            tokens.push("tracks".to_string());
            for target in &self.tracks {
                let id = target.track.resolve(&self.info, &self.source)?;
                tokens.push(format!("{}:{}", id, target.filename.display()));
            }
        }

        for (label, targets) in [
            ("attachments", &self.attachments),
            ("timestamps_v2", &self.timestamps),
            ("cues", &self.cues),
        ] {
            if targets.is_empty() {
                continue;
            }
            tokens.push(label.to_string());
            for target in targets {
                tokens.push(format!("{}:{}", target.id, target.filename.display()));
            }
        }

        if let Some(path) = &self.chapters {
            tokens.push("chapters".to_string());
            tokens.push(path.display().to_string());
        }

        if let Some(path) = &self.tags {
            tokens.push("tags".to_string());
            tokens.push(path.display().to_string());
        }

        Ok(tokens)
    }

    /// Run the extraction directly (no at-file indirection) and return
    /// mkvextract's exit status.
    pub fn run(&self, quiet: bool) -> MkvResult<i32> {
        let tokens = self.generate_command()?;
        tracing::info!("extracting from {}", self.source.display());
        self.runner
            .run_status(&self.tools.mkvextract, &tokens[1..], quiet)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrackType;

    fn toolset() -> Toolset {
        Toolset {
            mkvmerge: PathBuf::from("mkvmerge"),
            mkvextract: PathBuf::from("mkvextract"),
        }
    }

    fn snapshot() -> Vec<TrackRecord> {
        vec![
            TrackRecord::new(0, TrackType::Video, None, "V_MPEG4/ISO/AVC"),
            TrackRecord::new(1, TrackType::Audio, Some("jpn".into()), "A_AAC"),
            TrackRecord::new(2, TrackType::Subtitles, Some("eng".into()), "S_TEXT/ASS"),
        ]
    }

    #[test]
    fn command_starts_with_tool_and_source() {
        let job = ExtractJob::new(toolset(), "movie.mkv", snapshot());
        let tokens = job.generate_command().unwrap();
        assert_eq!(tokens, vec!["mkvextract", "movie.mkv"]);
    }

    #[test]
    fn resolves_track_selectors() {
        let mut job = ExtractJob::new(toolset(), "movie.mkv", snapshot());
        job.request_track(
            TrackSelector::Filter {
                track_type: Some(TrackType::Audio),
                language: Some("jpn".into()),
                index: 0,
            },
            "audio.aac",
        );
        job.request_track(TrackSelector::Id(0), "video.h264");

        let tokens = job.generate_command().unwrap();
        assert_eq!(
            tokens,
            vec!["mkvextract", "movie.mkv", "tracks", "1:audio.aac", "0:video.h264"]
        );
    }

    #[test]
    fn timestamps_mode_uses_versioned_label() {
        let mut job = ExtractJob::new(toolset(), "movie.mkv", snapshot());
        job.request_timestamps(2, "ts.txt");

        let tokens = job.generate_command().unwrap();
        assert_eq!(
            tokens,
            vec!["mkvextract", "movie.mkv", "timestamps_v2", "2:ts.txt"]
        );
    }

    #[test]
    fn modes_are_emitted_in_fixed_order() {
        let mut job = ExtractJob::new(toolset(), "movie.mkv", snapshot());
        job.set_tags("tags.xml");
        job.set_chapters("chapters.xml");
        job.request_cues(0, "cues.txt");
        job.request_attachment(1, "font.ttf");
        job.request_track(TrackSelector::Id(2), "subs.ass");

        let tokens = job.generate_command().unwrap();
        assert_eq!(
            tokens,
            vec![
                "mkvextract",
                "movie.mkv",
                "tracks",
                "2:subs.ass",
                "attachments",
                "1:font.ttf",
                "cues",
                "0:cues.txt",
                "chapters",
                "chapters.xml",
                "tags",
                "tags.xml",
            ]
        );
    }

    #[test]
    fn unresolvable_selector_aborts_generation() {
        let mut job = ExtractJob::new(toolset(), "movie.mkv", snapshot());
        job.request_track(
            TrackSelector::Filter {
                track_type: Some(TrackType::Buttons),
                language: None,
                index: 0,
            },
            "menu.bin",
        );

        let err = job.generate_command().unwrap_err();
        assert!(matches!(err, MkvError::NoMatchingTrack { .. }));
    }
}
