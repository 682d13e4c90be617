//! Error taxonomy for reorganize and pack operations

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Error, Debug)]
pub enum ExportError {
    /// A required path was never set by the caller
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive error for {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Coarse classification used when reporting back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    NotFound,
    Io,
}

impl ExportError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ExportError::Configuration(_) => ErrorKind::Configuration,
            ExportError::NotFound(_) => ErrorKind::NotFound,
            ExportError::Io { .. } | ExportError::Archive { .. } => ErrorKind::Io,
        }
    }
}

/// Attach a human readable context to an `io::Result`, the way `anyhow::Context` does
pub trait IoContext<T> {
    fn io_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn io_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| ExportError::io(f(), e))
    }
}
