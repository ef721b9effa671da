use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Cannot enumerate streams of {path}: {source}")]
    Enumeration {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Stream {stream} not found on {path}")]
    StreamNotFound { path: PathBuf, stream: String },

    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write stream {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to delete stream {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Read or write failed part way through a copy. The destination is left
    /// as far as it got.
    #[error("Copy into {path} failed: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid stream name: {0}")]
    InvalidStreamName(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl StreamError {
    /// Path the failing operation was addressing, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            StreamError::Enumeration { path, .. }
            | StreamError::StreamNotFound { path, .. }
            | StreamError::Open { path, .. }
            | StreamError::Write { path, .. }
            | StreamError::Delete { path, .. }
            | StreamError::Copy { path, .. } => Some(path),
            StreamError::InvalidStreamName(_)
            | StreamError::Configuration(_) => None,
        }
    }
}
