//! External tool discovery and process execution.

mod runner;

pub use runner::{CommandOutput, CommandRunner};

use std::env;
use std::path::PathBuf;

use crate::config::ToolSettings;
use crate::models::{MkvError, MkvResult};

/// Resolved paths to the external binaries.
///
/// Resolved once by the surrounding application and injected into jobs at
/// construction; nothing in this crate looks the binaries up as ambient
/// state.
#[derive(Debug, Clone)]
pub struct Toolset {
    pub mkvmerge: PathBuf,
    pub mkvextract: PathBuf,
}

impl Toolset {
    /// Locate both binaries on the search path.
    ///
    /// Absence is a startup-time error, not deferred to first use.
    pub fn discover() -> MkvResult<Self> {
        Ok(Self {
            mkvmerge: locate_tool("mkvmerge")?,
            mkvextract: locate_tool("mkvextract")?,
        })
    }

    /// Resolve from settings, falling back to PATH discovery for any tool
    /// without an explicit path configured.
    pub fn from_settings(tools: &ToolSettings) -> MkvResult<Self> {
        let mkvmerge = resolve_tool(&tools.mkvmerge, "mkvmerge")?;
        let mkvextract = resolve_tool(&tools.mkvextract, "mkvextract")?;
        Ok(Self {
            mkvmerge,
            mkvextract,
        })
    }
}

fn resolve_tool(configured: &str, name: &str) -> MkvResult<PathBuf> {
    if configured.is_empty() {
        return locate_tool(name);
    }
    let path = PathBuf::from(configured);
    if !path.is_file() {
        return Err(MkvError::ToolNotFound(configured.to_string()));
    }
    Ok(path)
}

/// Locate an executable on the search path, honoring the platform's
/// executable suffix.
pub fn locate_tool(name: &str) -> MkvResult<PathBuf> {
    let file_name = if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    };

    let search_path = env::var_os("PATH")
        .ok_or_else(|| MkvError::ToolNotFound(name.to_string()))?;

    for dir in env::split_paths(&search_path) {
        let candidate = dir.join(&file_name);
        if candidate.is_file() {
            tracing::debug!("found '{}' at {}", name, candidate.display());
            return Ok(candidate);
        }
    }

    Err(MkvError::ToolNotFound(name.to_string()))
}
