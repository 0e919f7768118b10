//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// This enum encapsulates all possible errors that can occur during
/// scanning, collection, and export.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Represents an I/O error, typically from file system operations.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// Represents an invalid file-name regex supplied in a request.
    ///
    /// Raised at request-construction time, never during a walk.
    #[error("Invalid file name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Represents a scan root that is missing or not a directory.
    #[error("Scan root is not a valid directory: {0}")]
    NotADirectory(PathBuf),

    /// Represents a serialization failure while building export output.
    #[error("Failed to serialize export data: {0}")]
    Serialize(String),

    /// Represents a failure to write the export output to its destination.
    #[error("Failed to write export to {path}: {source}")]
    ExportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Represents a user-initiated cancellation of a collection run.
    #[error("Operation was cancelled by the user")]
    Cancelled,
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialize(err.to_string())
    }
}

impl From<serde_yml::Error> for CoreError {
    fn from(err: serde_yml::Error) -> Self {
        CoreError::Serialize(err.to_string())
    }
}
