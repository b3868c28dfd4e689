//! Error types for the treebackup library
//!
//! This module defines every error that can occur while a backup run walks,
//! maps and copies a source tree. Each variant carries the path it refers to
//! so a report message is actionable on its own.
//!
//! Errors fall into two classes with different propagation rules inside the
//! orchestrator:
//!
//! - **Setup errors** (`DirectoryCreate` on the destination root,
//!   `EnumerationFailed`) are recorded and the run continues.
//! - **Copy-loop errors** (everything raised while processing a single file)
//!   abort the remaining file list.
//!
//! Neither class ever escapes [`crate::Backup::run`]: both end up as
//! `success = false` plus a message in the returned report.

use crate::types::BackupType;
use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in the treebackup library
pub type Result<T> = std::result::Result<T, BackupError>;

/// Main error type for all backup operations
#[derive(Debug, Error)]
pub enum BackupError {
    /// A directory (destination root or a mirrored subdirectory) could not be created
    #[error("failed to create directory {path:?}: {source}")]
    DirectoryCreate {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The enumeration root could not be opened or is not a directory
    #[error("failed to enumerate {root:?}: {reason}")]
    EnumerationFailed {
        /// Root of the walk
        root: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// A file path does not lie under the source root it was enumerated from
    #[error("path {path:?} is not under source root {root:?}")]
    PathMapping {
        /// File path that failed to map
        path: PathBuf,
        /// Source root it was expected under
        root: PathBuf,
    },

    /// Reading the source file failed
    #[error("failed to read source file {path:?}: {source}")]
    SourceRead {
        /// Source file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing the destination file failed
    #[error("failed to write destination file {path:?}: {source}")]
    DestinationWrite {
        /// Destination file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading back a destination file failed
    #[error("failed to read destination file {path:?}: {source}")]
    DestinationRead {
        /// Destination file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Copying the permission bits onto the destination failed
    #[error("failed to copy permissions {mode:o} onto {path:?}: {source}")]
    PermissionCopy {
        /// Destination file path
        path: PathBuf,
        /// Mode that was being applied
        mode: u32,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Path does not exist
    #[error("file not found: {path:?}")]
    NotFound {
        /// Path that was stat'd
        path: PathBuf,
    },

    /// Permission denied while reading metadata
    #[error("access denied: {path:?}")]
    AccessDenied {
        /// Path that was stat'd
        path: PathBuf,
    },

    /// Any other failure while reading file metadata
    #[error("failed to read metadata for {path:?}: {source}")]
    MetadataRead {
        /// Path that was stat'd
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Text that does not name a known backup type
    #[error("invalid backup type: {0:?}")]
    InvalidBackupType(String),

    /// Backup type is declared but has no implementation
    #[error("backup type '{0}' is not supported")]
    UnsupportedBackupType(BackupType),

    /// Errors during JSON serialization of reports
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BackupError {
    /// Classify an I/O error from a metadata call into the metadata taxonomy
    pub fn metadata(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => BackupError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => BackupError::AccessDenied { path },
            _ => BackupError::MetadataRead { path, source: err },
        }
    }

    /// Create an enumeration error with a custom reason
    pub fn enumeration(root: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        BackupError::EnumerationFailed {
            root: root.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error belongs to the setup class
    ///
    /// Setup errors are recorded in the report without stopping the run.
    /// A `DirectoryCreate` raised for a mirrored subdirectory inside the copy
    /// loop is still fatal there; the orchestrator decides by phase, this is
    /// only a classification of the error kind.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            BackupError::DirectoryCreate { .. } | BackupError::EnumerationFailed { .. }
        )
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            BackupError::AccessDenied { path } => {
                format!(
                    "Permission denied for {:?}. Check file permissions or run with elevated privileges.",
                    path
                )
            }
            BackupError::DirectoryCreate { path, .. } => {
                format!(
                    "Could not create {:?}. Make sure the parent is writable and not a regular file.",
                    path
                )
            }
            BackupError::InvalidBackupType(name) => {
                format!("Unknown backup type '{}'. Use 'full' or 'incremental'.", name)
            }
            BackupError::UnsupportedBackupType(kind) => {
                format!("'{}' backups are not implemented yet. Use a 'full' backup instead.", kind)
            }
            _ => self.to_string(),
        }
    }
}
