//! Error handling
//!
//! Every failure a link or engine operation can report, with the I/O
//! classification used by the storage layer and a coarse [`ErrorKind`]
//! that callers (HTTP, CLI) map onto their own responses.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::links::Direction;

/// Coarse error category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A positional index or engine name does not exist
    NotFound,
    /// A required field is missing or empty
    Validation,
    /// A move was requested in a direction that leaves the list
    IllegalTransition,
    /// The data directory could not be read or written
    Io,
    /// Persisted content could not be parsed
    Malformed,
}

/// Errors that can occur in link and engine operations
#[derive(Error, Debug)]
pub enum HubError {
    /// Positional index outside `[0, len)`
    #[error("Index out of range: {index} (have {len} links)")]
    IndexOutOfRange { index: i64, len: usize },

    /// No engine with this exact name
    #[error("Engine not found: '{name}'")]
    EngineNotFound { name: String },

    /// A required field was empty or absent
    #[error("Missing fields: '{field}' is required")]
    MissingField { field: &'static str },

    /// Move past either end of the list
    #[error("Cannot move link {index} {direction}")]
    IllegalMove { index: usize, direction: Direction },

    /// Direction string other than "up" or "down"
    #[error("Cannot move in that direction: '{0}'")]
    UnknownDirection(String),

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error(
        "Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again."
    )]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Persisted document exists but cannot be parsed
    #[error("Malformed document in '{path}': {details}")]
    Malformed { path: PathBuf, details: String },

    /// Document could not be serialized
    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl HubError {
    /// Create an error from a failed read with path context
    pub fn from_read(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => HubError::PermissionDenied {
                path,
                source: error,
            },
            _ => HubError::Read {
                path,
                source: error,
            },
        }
    }

    /// Create an error from a failed write with path context
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_write(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => HubError::PermissionDenied {
                path,
                source: error,
            },
            _ if is_disk_full_error(&error) => HubError::DiskFull {
                path,
                source: error,
            },
            _ => HubError::Write {
                path,
                source: error,
            },
        }
    }

    /// The category this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            HubError::IndexOutOfRange { .. } | HubError::EngineNotFound { .. } => {
                ErrorKind::NotFound
            }
            HubError::MissingField { .. } => ErrorKind::Validation,
            HubError::IllegalMove { .. } | HubError::UnknownDirection(_) => {
                ErrorKind::IllegalTransition
            }
            HubError::PermissionDenied { .. }
            | HubError::DiskFull { .. }
            | HubError::Read { .. }
            | HubError::Write { .. }
            | HubError::AtomicWriteFailed { .. } => ErrorKind::Io,
            HubError::Malformed { .. } | HubError::Serialize(_) => ErrorKind::Malformed,
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            HubError::DiskFull { .. } => Some("Free up disk space and try again."),
            HubError::PermissionDenied { .. } => {
                Some("Check file and directory permissions of the data directory.")
            }
            HubError::Malformed { .. } => {
                Some("Fix or move the file aside; linkhub will not overwrite it while it is unreadable.")
            }
            HubError::IndexOutOfRange { .. } => {
                Some("Indices shift after every change. List the links again before retrying.")
            }
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for link and engine operations
pub type HubResult<T> = Result<T, HubError>;
