//! File responder error types

use hyper::StatusCode;
use std::io;
use thiserror::Error;

/// Failure to build a file-backed response
///
/// Every variant carries the resolved filesystem path that was being served.
#[derive(Debug, Error)]
pub enum FileError {
    /// Nothing exists at the resolved path
    #[error("file not found: {path}")]
    NotFound { path: String },

    /// The resolved path names a directory
    #[error("path is a directory: {path}")]
    IsDirectory { path: String },

    /// The entry exists but could not be opened for reading
    #[error("failed to read file '{path}': {source}")]
    ReadFailure {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Resolved path the error refers to
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path } | Self::IsDirectory { path } | Self::ReadFailure { path, .. } => {
                path
            }
        }
    }

    /// HTTP status an outer layer should answer with
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } | Self::IsDirectory { .. } => StatusCode::NOT_FOUND,
            Self::ReadFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
