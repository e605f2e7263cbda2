//! Access to the procfs mount netprobe reads from.
//!
//! Everything is resolved relative to a [`ProcRoot`], so netprobe running in a
//! container can be pointed at the host's `/proc` (bind-mounted elsewhere) and
//! tests can point it at a fixture directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NetProbeError, Result};

/// Environment variable that overrides the procfs mount point.
pub const HOST_PROC_ENV: &str = "HOST_PROC";

const DEFAULT_PROC: &str = "/proc";

/// Root of the procfs tree to inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcRoot(PathBuf);

impl ProcRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProcRoot(path.into())
    }

    /// `$HOST_PROC` when set and non-empty, `/proc` otherwise.
    pub fn from_env() -> Self {
        match std::env::var_os(HOST_PROC_ENV) {
            Some(v) if !v.is_empty() => ProcRoot(PathBuf::from(v)),
            _ => ProcRoot(PathBuf::from(DEFAULT_PROC)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Append a relative path such as `net/dev` to the root.
    pub fn join(&self, sub: impl AsRef<Path>) -> PathBuf {
        self.0.join(sub)
    }
}

impl Default for ProcRoot {
    fn default() -> Self {
        ProcRoot::from_env()
    }
}

/// Read a whole text file as lines, without trailing newlines.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| NetProbeError::io(path, e))?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Read every whitespace-separated integer in a file.
pub fn read_ints(path: &Path) -> Result<Vec<i64>> {
    let content = fs::read_to_string(path).map_err(|e| NetProbeError::io(path, e))?;
    content
        .split_whitespace()
        .map(|tok| {
            tok.parse::<i64>().map_err(|_| {
                NetProbeError::Parse(format!("invalid integer {:?} in {}", tok, path.display()))
            })
        })
        .collect()
}

pub fn path_exists(path: &Path) -> bool {
    path.exists()
}
