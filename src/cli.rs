//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mkvbatch",
    about = "Configuration-driven front end for mkvmerge and mkvextract",
    version
)]
pub struct Cli {
    /// Path to the settings file.
    #[arg(long, default_value = "mkvbatch.toml")]
    pub settings: PathBuf,

    /// Show the external tool's own output.
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mux the sources described by a JSON job file into one container.
    Merge {
        /// Merge job description (JSON).
        config: PathBuf,

        /// Write the mkvmerge options file here instead of a temp file.
        #[arg(long)]
        options_file: Option<PathBuf>,

        /// Delete the options file after the mux finishes.
        #[arg(long)]
        delete_options_file: bool,

        /// Print the generated command instead of running it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Extract tracks, attachments, chapters, tags, timestamps or cues.
    Extract {
        /// Extract job description (JSON).
        config: PathBuf,

        /// Print the generated command instead of running it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Identify the tracks of a single file.
    Identify {
        /// File to identify.
        file: PathBuf,
    },
}
