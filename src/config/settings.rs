//! Application settings with TOML-based sections.
//!
//! Each section maps to a TOML table and can be updated independently.

use serde::{Deserialize, Serialize};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Options-file handling.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Explicit tool paths. Empty means "discover on PATH at startup".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default)]
    pub mkvmerge: String,

    #[serde(default)]
    pub mkvextract: String,
}

/// Where the mkvmerge at-file lands and whether it survives the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathSettings {
    /// Directory for generated options files. Empty means the system temp
    /// directory.
    #[serde(default)]
    pub options_file_dir: String,

    /// Delete the options file after a mux. Off by default so failed runs
    /// can be inspected.
    #[serde(default)]
    pub delete_options_file: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default tracing filter, overridden by RUST_LOG.
    #[serde(default = "default_level")]
    pub level: String,

    /// Echo the generated command one option per line before running.
    #[serde(default)]
    pub show_command_pretty: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            show_command_pretty: false,
        }
    }
}
