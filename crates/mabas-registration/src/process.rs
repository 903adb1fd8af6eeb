//! Child-process plumbing shared by the elastix and transformix engines.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use crate::error::{EngineError, Result};

/// Number of log lines kept in a failure report.
const LOG_TAIL_LINES: usize = 20;

/// Private scratch directory for one engine invocation, removed on drop.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new(prefix: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .map_err(|e| EngineError::io(format!("failed to create engine workspace: {e}")))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// First of `names` that exists in the workspace.
    pub fn find_output(&self, program: &str, names: &[&str]) -> Result<PathBuf> {
        names
            .iter()
            .map(|name| self.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| EngineError::missing_output(program, names.join(" or ")))
    }
}

/// Run `program` to completion, logging its console output at debug level.
///
/// Returns the combined stdout and stderr text.
pub fn run<I, S>(program: &Path, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let name = program.display().to_string();
    let mut command = Command::new(program);
    command.args(args);
    tracing::debug!("running {:?}", command);

    let output = command.output().map_err(|source| EngineError::Spawn {
        program: name.clone(),
        source,
    })?;

    let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
    log.push_str(&String::from_utf8_lossy(&output.stderr));
    for line in log.lines().filter(|l| !l.trim().is_empty()) {
        tracing::debug!("[{}] {}", name, line);
    }

    if !output.status.success() {
        return Err(EngineError::ProcessFailed {
            program: name,
            status: output.status.to_string(),
            log_tail: tail(&log, LOG_TAIL_LINES),
        });
    }
    Ok(log)
}

fn tail(log: &str, lines: usize) -> String {
    let all: Vec<&str> = log.lines().filter(|l| !l.trim().is_empty()).collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
