//! Mirror verification
//!
//! Checks that a destination tree is a faithful copy of a source tree: every
//! regular file under the source must exist at its mapped destination path
//! with the same SHA-256 content hash, size and permission mode.
//!
//! Verification only reads. Extra files in the destination are not reported,
//! since a backup never deletes anything there.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use treebackup::verification::verify_mirror;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = verify_mirror(Path::new("./project"), Path::new("/tmp/project_backup"))?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

use crate::enumeration::TreeEnumerator;
use crate::error::{BackupError, Result};
use crate::utils;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of comparing a destination tree against its source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorVerification {
    /// Per-file results, in source enumeration order
    pub file_checks: Vec<FileVerification>,
    /// Total files checked
    pub total_files_checked: usize,
    /// Number of files that matched
    pub files_valid: usize,
    /// Entries that could not be checked at all
    pub errors: Vec<String>,
    /// Time taken for verification in milliseconds
    pub verification_time_ms: u64,
}

impl MirrorVerification {
    /// Check if the destination is a complete, faithful copy
    pub fn is_valid(&self) -> bool {
        self.files_valid == self.total_files_checked && self.errors.is_empty()
    }

    /// Get a summary of the verification
    pub fn summary(&self) -> String {
        if self.is_valid() {
            format!(
                "Mirror is valid ({} files verified in {}ms)",
                self.total_files_checked, self.verification_time_ms
            )
        } else {
            format!(
                "Mirror is invalid: {}/{} files valid, {} errors",
                self.files_valid,
                self.total_files_checked,
                self.errors.len()
            )
        }
    }
}

/// Verification result for a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileVerification {
    /// Source file path
    pub source: PathBuf,
    /// Mapped destination path
    pub destination: PathBuf,
    /// Whether the destination exists
    pub exists: bool,
    /// Whether the content hashes match
    pub content_matches: bool,
    /// Whether the sizes match
    pub size_matches: bool,
    /// Whether the permission modes match
    pub mode_matches: bool,
    /// Error message if a side could not be read
    pub error: Option<String>,
}

impl FileVerification {
    /// Check if the file verification passed
    pub fn is_valid(&self) -> bool {
        self.exists
            && self.content_matches
            && self.size_matches
            && self.mode_matches
            && self.error.is_none()
    }

    fn compare(source: &Path, destination: PathBuf) -> Self {
        let mut check = FileVerification {
            source: source.to_path_buf(),
            exists: destination.is_file(),
            destination,
            content_matches: false,
            size_matches: false,
            mode_matches: false,
            error: None,
        };
        if !check.exists {
            return check;
        }

        if let Err(e) = check.fill_comparison() {
            check.error = Some(e.to_string());
        }
        check
    }

    fn fill_comparison(&mut self) -> Result<()> {
        let src_meta = utils::read_file_metadata(&self.source)?;
        let dst_meta = utils::read_file_metadata(&self.destination)?;
        self.size_matches = src_meta.size == dst_meta.size;
        self.mode_matches = src_meta.permissions == dst_meta.permissions;

        let src_hash = utils::hash_file_content(&self.source).map_err(|e| {
            BackupError::SourceRead {
                path: self.source.clone(),
                source: e,
            }
        })?;
        let dst_hash = utils::hash_file_content(&self.destination).map_err(|e| {
            BackupError::DestinationRead {
                path: self.destination.clone(),
                source: e,
            }
        })?;
        self.content_matches = src_hash == dst_hash;
        Ok(())
    }
}

/// Compare every regular file under `source_root` with its copy under `destination_root`
///
/// # Errors
///
/// Fails only when the source root cannot be enumerated. Per-file problems,
/// including missing destination files, are reported in the result.
pub fn verify_mirror(source_root: &Path, destination_root: &Path) -> Result<MirrorVerification> {
    let start = Instant::now();
    let enumeration = TreeEnumerator::new(source_root).enumerate();
    if let Some(err) = enumeration.error {
        return Err(err);
    }

    let mut report = MirrorVerification::default();
    report.errors.extend(enumeration.skipped.iter().map(|skipped| match &skipped.path {
        Some(path) => format!("{}: {}", path.display(), skipped.reason),
        None => skipped.reason.clone(),
    }));

    for file in enumeration.files.iter() {
        let check = match utils::map_destination(source_root, destination_root, file) {
            Ok(destination) => FileVerification::compare(file, destination),
            Err(e) => {
                report.errors.push(e.to_string());
                continue;
            }
        };

        if !check.is_valid() {
            debug!("Mismatch for {:?}: {:?}", file, check);
        }
        report.total_files_checked += 1;
        report.files_valid += usize::from(check.is_valid());
        report.file_checks.push(check);
    }

    report.verification_time_ms = start.elapsed().as_millis() as u64;
    info!("{}", report.summary());
    Ok(report)
}
