//! mkvbatch — configuration-driven front end for mkvmerge and mkvextract.
//!
//! Given a declarative JSON description of sources, tracks, attachments
//! and options, this crate synthesizes the exact command line that merges
//! the inputs into one Matroska container, or extracts tracks, attachments,
//! chapters, tags, timestamps and cues out of an existing one. The external
//! binaries are opaque: they consume a generated argument list and return
//! an exit status.
//!
//! Flag ordering matters to mkvmerge and is fixed here: global options
//! first, then each source's scoped options followed by its `( file )`
//! group, then attachments, then the `--track-order` directive.

pub mod config;
pub mod extract;
pub mod io;
pub mod jobs;
pub mod logging;
pub mod models;
pub mod mux;
pub mod probe;
pub mod selector;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
