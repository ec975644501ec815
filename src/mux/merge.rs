//! Merge job: aggregates sources, attachments and global options into one
//! mkvmerge invocation.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::io::{CommandRunner, Toolset};
use crate::jobs::MergeConfig;
use crate::models::{MkvError, MkvResult, OptionMap, OptionValue};

use super::{Attachment, Source};

/// How a mux run handles the at-file and the child's output.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Write the options file here instead of a generated temp file.
    pub options_file: Option<PathBuf>,

    /// Directory for the generated temp file when no explicit path is set.
    pub options_dir: Option<PathBuf>,

    /// Delete the options file once the mux finishes. Off by default so a
    /// failed mux leaves the file behind for post-mortem inspection.
    pub delete_options_file: bool,

    /// Discard the child's stdout/stderr.
    pub quiet: bool,
}

/// A complete merge direction job.
pub struct MergeJob {
    tools: Toolset,
    runner: CommandRunner,
    output: PathBuf,
    global_options: OptionMap,
    sources: Vec<Source>,
    attachments: Vec<Attachment>,
    track_order_override: Option<Vec<String>>,
}

impl MergeJob {
    pub fn new(tools: Toolset, output: impl Into<PathBuf>) -> Self {
        Self {
            tools,
            runner: CommandRunner::new(),
            output: output.into(),
            global_options: OptionMap::new(),
            sources: Vec::new(),
            attachments: Vec::new(),
            track_order_override: None,
        }
    }

    /// Build a job from a validated configuration object.
    ///
    /// Sources are identified here, once; track selectors are resolved
    /// against the fresh snapshots, and the configuration's track sequence
    /// becomes the track-order override.
    pub fn from_config(tools: Toolset, config: &MergeConfig) -> MkvResult<Self> {
        let mut job = Self::new(tools, &config.output_file);

        for source_config in &config.sources {
            if !source_config.filename.exists() {
                return Err(MkvError::FileNotFound(source_config.filename.clone()));
            }
            let mut source =
                Source::open(&job.runner, &job.tools, &source_config.filename)?;
            for (name, value) in source_config.options.iter() {
                source.set_option(name, value.clone());
            }
            job.add_source(source);
        }

        let mut order = Vec::new();
        for entry in &config.tracks {
            let source = job.sources.get_mut(entry.source).ok_or_else(|| {
                MkvError::Config(format!(
                    "track entry refers to unknown source {}",
                    entry.source
                ))
            })?;
            let id = entry.track.resolve(source.info(), source.file())?;
            source.add_track_options(id, entry.options.clone());
            order.push(format!("{}:{}", entry.source, id));
        }
        if !order.is_empty() {
            job.set_track_order_override(order);
        }

        for (name, value) in config.options.iter() {
            job.set_global_option(name, value.clone());
        }

        for attachment in &config.attachments {
            if !attachment.filename.exists() {
                return Err(MkvError::FileNotFound(attachment.filename.clone()));
            }
            job.add_attachment(Attachment::new(
                &attachment.filename,
                attachment.name.clone(),
                attachment.mimetype.clone(),
            ));
        }

        for dir in &config.attachment_directories {
            for file in attachment_files(dir)? {
                job.add_attachment(Attachment::new(file, None, None));
            }
        }

        Ok(job)
    }

    pub fn add_source(&mut self, source: Source) {
        self.sources.push(source);
    }

    pub fn add_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn set_global_option(&mut self, name: impl Into<String>, value: OptionValue) {
        self.global_options.set(name, value);
    }

    /// Pin the final track order. The override is taken verbatim; entries
    /// are not validated against the declared source/track pairs.
    pub fn set_track_order_override(&mut self, order: Vec<String>) {
        self.track_order_override = Some(order);
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn sources_mut(&mut self) -> &mut [Source] {
        &mut self.sources
    }

    /// Re-identify every source after the underlying files changed.
    pub fn refresh_sources(&mut self) -> MkvResult<()> {
        for source in &mut self.sources {
            source.refresh_info(&self.runner, &self.tools)?;
        }
        Ok(())
    }

    /// The track order handed to mkvmerge: the override when set, otherwise
    /// derived as each source's declared tracks in declaration order.
    pub fn track_order(&self) -> Vec<String> {
        if let Some(order) = &self.track_order_override {
            return order.clone();
        }
        let mut order = Vec::new();
        for (index, source) in self.sources.iter().enumerate() {
            for track in source.tracks() {
                order.push(format!("{}:{}", index, track.id));
            }
        }
        order
    }

    /// Generate the full token sequence, executable first.
    pub fn generate_command(&self) -> MkvResult<Vec<String>> {
        let mut tokens = vec![self.tools.mkvmerge.display().to_string()];

        tokens.push("--output".to_string());
        tokens.push(std::path::absolute(&self.output)?.display().to_string());

        for (name, value) in self.global_options.iter() {
            match value {
                OptionValue::Value(v) => {
                    tokens.push(format!("--{name}"));
                    tokens.push(v.clone());
                }
                OptionValue::Flag => tokens.push(format!("--{name}")),
            }
        }

        for source in &self.sources {
            tokens.extend(source.emit_options()?);
        }

        for attachment in &self.attachments {
            tokens.extend(attachment.emit_options()?);
        }

        tokens.push("--track-order".to_string());
        tokens.push(self.track_order().join(","));

        Ok(tokens)
    }

    /// Shell-quoted single-line rendering of the generated command.
    pub fn generate_command_line(&self) -> MkvResult<String> {
        Ok(shell_join(&self.generate_command()?))
    }

    /// Run the mux.
    ///
    /// The token list minus the program token is written as a JSON array to
    /// an options file and mkvmerge is invoked with `@<file>`, sidestepping
    /// command-line length limits. Returns mkvmerge's exit status.
    pub fn run(&self, options: &RunOptions) -> MkvResult<i32> {
        let tokens = self.generate_command()?;
        let arg_tokens = &tokens[1..];

        let options_path = match &options.options_file {
            Some(path) => {
                fs::write(path, serde_json::to_string(arg_tokens)?)?;
                path.clone()
            }
            None => {
                let dir = options
                    .options_dir
                    .clone()
                    .unwrap_or_else(std::env::temp_dir);
                let file = NamedTempFile::new_in(dir)?;
                serde_json::to_writer(file.as_file(), arg_tokens)?;
                file.into_temp_path()
                    .keep()
                    .map_err(|e| MkvError::Io(e.error))?
            }
        };

        tracing::info!(
            "muxing to {} via options file {}",
            self.output.display(),
            options_path.display()
        );

        let at_arg = format!("@{}", options_path.display());
        let code = self
            .runner
            .run_status(&self.tools.mkvmerge, [at_arg], options.quiet)?;

        if options.delete_options_file {
            let _ = fs::remove_file(&options_path);
        }

        Ok(code)
    }
}

/// Regular files inside an attachment directory, sorted by name so command
/// generation stays deterministic across runs.
fn attachment_files(dir: &Path) -> MkvResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(MkvError::FileNotFound(dir.to_path_buf()));
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Render tokens as a copy-pasteable shell command line.
pub fn shell_join(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| shell_quote(t))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(token: &str) -> String {
    let safe = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_()".contains(c));
    if safe {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}

/// Render tokens one option per line for log display.
pub fn format_tokens_pretty(tokens: &[String]) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        let next_is_value = i + 1 < tokens.len()
            && !tokens[i + 1].starts_with('-')
            && tokens[i + 1] != "("
            && tokens[i + 1] != ")";
        if token.starts_with('-') && next_is_value {
            out.push_str(&format!("{} {}\n", token, tokens[i + 1]));
            i += 2;
        } else {
            out.push_str(token);
            out.push('\n');
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OptionMap, TrackRecord, TrackType};

    fn toolset() -> Toolset {
        Toolset {
            mkvmerge: PathBuf::from("mkvmerge"),
            mkvextract: PathBuf::from("mkvextract"),
        }
    }

    fn source_with_tracks(file: &str, ids: &[u64]) -> Source {
        let info: Vec<TrackRecord> = (0..4)
            .map(|i| {
                let track_type = if i == 0 {
                    TrackType::Video
                } else {
                    TrackType::Audio
                };
                TrackRecord::new(i, track_type, None, "X_CODEC")
            })
            .collect();
        let mut source = Source::new(file, info);
        for id in ids {
            source.add_track_options(*id, OptionMap::new());
        }
        source
    }

    #[test]
    fn derives_track_order_from_declaration_order() {
        let mut job = MergeJob::new(toolset(), "out.mkv");
        job.add_source(source_with_tracks("a.mkv", &[0, 2]));
        job.add_source(source_with_tracks("b.mkv", &[1, 3]));

        assert_eq!(job.track_order(), vec!["0:0", "0:2", "1:1", "1:3"]);
        // Re-deriving from unchanged sources yields the same sequence.
        assert_eq!(job.track_order(), vec!["0:0", "0:2", "1:1", "1:3"]);
    }

    #[test]
    fn override_takes_precedence_verbatim() {
        let mut job = MergeJob::new(toolset(), "out.mkv");
        job.add_source(source_with_tracks("a.mkv", &[0, 2]));
        job.add_source(source_with_tracks("b.mkv", &[1, 3]));
        job.set_track_order_override(vec![
            "0:0".into(),
            "1:1".into(),
            "0:2".into(),
            "1:3".into(),
        ]);

        let tokens = job.generate_command().unwrap();
        let position = tokens.iter().position(|t| t == "--track-order").unwrap();
        assert_eq!(tokens[position + 1], "0:0,1:1,0:2,1:3");
    }

    #[test]
    fn command_layout_is_fixed() {
        let mut job = MergeJob::new(toolset(), "out.mkv");
        job.set_global_option("no-global-tags", OptionValue::Flag);
        job.set_global_option("title", OptionValue::value("Movie"));
        job.add_source(source_with_tracks("a.mkv", &[0]));

        let tokens = job.generate_command().unwrap();
        assert_eq!(tokens[0], "mkvmerge");
        assert_eq!(tokens[1], "--output");
        assert_eq!(
            tokens[2],
            std::path::absolute("out.mkv").unwrap().display().to_string()
        );
        assert_eq!(tokens[3], "--no-global-tags");
        assert_eq!(tokens[4], "--title");
        assert_eq!(tokens[5], "Movie");
        assert_eq!(tokens.last().unwrap(), "0:0");
        assert_eq!(tokens[tokens.len() - 2], "--track-order");
    }

    #[test]
    fn generation_is_deterministic() {
        let mut job = MergeJob::new(toolset(), "out.mkv");
        job.set_global_option("title", OptionValue::value("Movie"));
        job.add_source(source_with_tracks("a.mkv", &[0, 1]));
        job.add_attachment(Attachment::new("font.ttf", None, None));

        let first = job.generate_command().unwrap();
        let second = job.generate_command().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn shell_join_quotes_only_when_needed() {
        let line = shell_join(&[
            "mkvmerge".to_string(),
            "--title".to_string(),
            "My Movie".to_string(),
        ]);
        assert_eq!(line, "mkvmerge --title 'My Movie'");
    }

    #[test]
    fn pretty_format_pairs_flags_with_values() {
        let tokens = vec![
            "--output".to_string(),
            "out.mkv".to_string(),
            "--no-global-tags".to_string(),
            "(".to_string(),
            "a.mkv".to_string(),
            ")".to_string(),
        ];
        let pretty = format_tokens_pretty(&tokens);
        let lines: Vec<&str> = pretty.lines().collect();
        assert_eq!(
            lines,
            vec!["--output out.mkv", "--no-global-tags", "(", "a.mkv", ")"]
        );
    }
}
