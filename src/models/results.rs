//! Error and result types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by command synthesis and external tool handling.
///
/// None of these are recovered locally. A partial argument list handed to
/// mkvmerge could silently author a broken container, so generation aborts
/// on the first error.
#[derive(Error, Debug)]
pub enum MkvError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("could not locate '{0}' on the search path")]
    ToolNotFound(String),

    #[error("failed to launch {tool}: {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with status {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    #[error("failed to parse {tool} output: {message}")]
    MalformedOutput { tool: String, message: String },

    #[error("source '{}' does not contain track {track}", .file.display())]
    TrackNotInSource { file: PathBuf, track: u64 },

    #[error("no track in '{}' matches selector {selector}", .file.display())]
    NoMatchingTrack { file: PathBuf, selector: String },

    #[error(
        "selector {selector} in '{}' asks for match #{index} but only {matched} track(s) match",
        .file.display()
    )]
    AmbiguousSelector {
        file: PathBuf,
        selector: String,
        index: usize,
        matched: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MkvError {
    /// Process exit code for fatal configuration-side failures.
    ///
    /// These are the wrapper's own codes, distinct from the exit status of
    /// a mux or extract run, which is passed through untouched.
    pub fn exit_code(&self) -> i32 {
        match self {
            MkvError::Config(_) | MkvError::Json(_) => 100,
            MkvError::FileNotFound(_) => 10,
            MkvError::TrackNotInSource { .. }
            | MkvError::NoMatchingTrack { .. }
            | MkvError::AmbiguousSelector { .. } => 60,
            MkvError::ToolNotFound(_)
            | MkvError::ToolLaunch { .. }
            | MkvError::CommandFailed { .. }
            | MkvError::MalformedOutput { .. } => 50,
            MkvError::Io(_) => 1,
        }
    }
}

/// Result type used throughout the crate.
pub type MkvResult<T> = Result<T, MkvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_category() {
        let err = MkvError::Config("bad".into());
        assert_eq!(err.exit_code(), 100);

        let err = MkvError::FileNotFound(PathBuf::from("missing.mkv"));
        assert_eq!(err.exit_code(), 10);

        let err = MkvError::TrackNotInSource {
            file: PathBuf::from("a.mkv"),
            track: 7,
        };
        assert_eq!(err.exit_code(), 60);
    }
}
