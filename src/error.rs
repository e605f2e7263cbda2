use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetProbeError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not formatted correctly: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unsupported: {0}")]
    Unsupported(String),
    #[error("Platform error: {0}")]
    Platform(String),
}

impl NetProbeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NetProbeError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        NetProbeError::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NetProbeError>;
