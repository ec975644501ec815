//! Merge direction: sources, attachments, and mkvmerge command synthesis.

mod attachment;
mod merge;
mod source;

pub use attachment::Attachment;
pub use merge::{format_tokens_pretty, shell_join, MergeJob, RunOptions};
pub use source::{Source, SourceTrack};
