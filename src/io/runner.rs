//! Command runner for external process execution.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::models::{MkvError, MkvResult};

/// Captured output of one external command.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: i32,
}

/// Runs mkvmerge/mkvextract invocations.
///
/// Every call blocks until the child exits; there is no timeout and no
/// cancellation beyond killing the child out of band.
#[derive(Debug, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run with captured stdout/stderr. Used for identify calls where the
    /// output is parsed.
    pub fn run_captured<I, S>(&self, program: &Path, args: I) -> MkvResult<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        tracing::debug!("running (captured): {}", program.display());

        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| MkvError::ToolLaunch {
                tool: program.display().to_string(),
                source: e,
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    /// Run a mux or extract invocation and hand back the child's exit code.
    ///
    /// With `quiet` the child's stdout/stderr are discarded; otherwise they
    /// pass through to the caller's terminal.
    pub fn run_status<I, S>(&self, program: &Path, args: I, quiet: bool) -> MkvResult<i32>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        tracing::debug!("running: {}", program.display());

        let mut command = Command::new(program);
        command.args(args);
        if quiet {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = command.status().map_err(|e| MkvError::ToolLaunch {
            tool: program.display().to_string(),
            source: e,
        })?;

        Ok(status.code().unwrap_or(-1))
    }
}
