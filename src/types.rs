//! Core data types used throughout the treebackup library
//!
//! ## Overview
//!
//! - **Configuration**: [`BackupConfig`], [`BackupType`] - what to back up and where
//! - **Run state**: [`BackupPhase`] - the phases an orchestration run moves through
//!
//! ## Examples
//!
//! ```rust
//! use treebackup::types::{BackupConfig, BackupType};
//!
//! let config = BackupConfig::new("./project", "/tmp/project_backup")
//!     .with_backup_type(BackupType::Full);
//! assert_eq!(config.backup_type, BackupType::Full);
//! ```

use crate::error::BackupError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Kind of backup to perform
///
/// Only [`BackupType::Full`] has defined behavior. `Incremental` is accepted
/// in configuration but rejected when a run is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupType {
    /// Copy every regular file under the source root
    #[default]
    Full,
    /// Copy only files changed since a prior run (not implemented)
    Incremental,
}

impl BackupType {
    /// Lowercase name used in configuration and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupType::Full => "full",
            BackupType::Incremental => "incremental",
        }
    }
}

impl fmt::Display for BackupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackupType {
    type Err = BackupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(BackupType::Full),
            "incremental" => Ok(BackupType::Incremental),
            other => Err(BackupError::InvalidBackupType(other.to_string())),
        }
    }
}

/// Input to a backup run
///
/// The source path must exist and be readable when the run starts; a missing
/// source surfaces as an enumeration failure in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Directory to back up
    pub source_path: PathBuf,
    /// Directory the source tree is mirrored into
    pub destination_path: PathBuf,
    /// Kind of backup
    #[serde(default)]
    pub backup_type: BackupType,
}

impl BackupConfig {
    /// Create a full backup configuration
    pub fn new(source_path: impl Into<PathBuf>, destination_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            destination_path: destination_path.into(),
            backup_type: BackupType::Full,
        }
    }

    /// Set the backup type
    pub fn with_backup_type(mut self, backup_type: BackupType) -> Self {
        self.backup_type = backup_type;
        self
    }
}

/// Phases of a single orchestration run
///
/// `Idle -> DirectoryPrep -> Enumerating -> CopyingFiles(i) -> Finalized`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupPhase {
    /// Nothing started yet
    Idle,
    /// Ensuring the destination root exists
    DirectoryPrep,
    /// Listing source files
    Enumerating,
    /// Processing the file at this index of the enumerated list
    CopyingFiles(usize),
    /// Report stamped and returned
    Finalized,
}

impl fmt::Display for BackupPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupPhase::Idle => f.write_str("idle"),
            BackupPhase::DirectoryPrep => f.write_str("directory-prep"),
            BackupPhase::Enumerating => f.write_str("enumerating"),
            BackupPhase::CopyingFiles(i) => write!(f, "copying-files({})", i),
            BackupPhase::Finalized => f.write_str("finalized"),
        }
    }
}
