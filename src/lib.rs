//! # treebackup - Full-tree directory backups
//!
//! A library for mirroring a source directory into a destination directory,
//! file by file, with permission bits preserved and a structured report of
//! every run.
//!
//! ## Overview
//!
//! A full backup:
//! - Creates the destination root if it does not exist
//! - Walks the source tree and lists every regular file in a deterministic order
//! - Re-creates each file's relative path under the destination
//! - Copies content and permission mode
//! - Returns a [`BackupReport`] with file count, total bytes, duration and outcome
//!
//! The source is never modified and nothing in the destination is deleted.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use treebackup::{Backup, BackupConfig};
//!
//! let mut backup = Backup::new();
//! let report = backup.run(&BackupConfig::new("./my_project", "/tmp/my_project_backup"));
//!
//! if report.success {
//!     println!("{}", report.summary());
//! } else {
//!     eprintln!("backup failed: {}", report.error_message.unwrap_or_default());
//! }
//! ```
//!
//! ## Failure Semantics
//!
//! Setup is best-effort and the copy loop is fail-fast:
//!
//! - A destination root that cannot be created, or a source that cannot be
//!   enumerated, is recorded in the report and the run continues.
//! - The first file that cannot be copied stops the run. Files enumerated
//!   after it are not copied, and `files_backed_up` counts only the files
//!   copied before it.
//!
//! Runs never return an error or panic on I/O failure. A report holds one
//! error message; when several errors occur the last one wins.
//!
//! A failed copy can leave its destination file partially written. Enable
//! [`BackupBuilder::atomic_writes`] to write through a temporary file and
//! rename it into place instead.
//!
//! ## Verifying a Mirror
//!
//! ```rust,no_run
//! use treebackup::verification::verify_mirror;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let check = verify_mirror(Path::new("./my_project"), Path::new("/tmp/my_project_backup"))?;
//! assert!(check.is_valid(), "{}", check.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`backup`]: Run orchestration and engine configuration
//! - [`enumeration`]: Recursive listing of regular files
//! - [`replication`]: Single-file copy with permission bits
//! - [`report`]: Run reports
//! - [`naming`]: Archive file names
//! - [`verification`]: Destination-against-source comparison
//! - [`types`]: Configuration and run-phase types
//! - [`error`]: Error types and handling

// Public API modules
pub mod backup;
pub mod enumeration;
pub mod error;
pub mod naming;
pub mod replication;
pub mod report;
pub mod types;
pub mod verification;

// Internal modules (not part of public API)
mod utils;

// Re-export main types for convenience
pub use backup::{Backup, BackupBuilder};
pub use enumeration::{Enumeration, TreeEnumerator};
pub use error::{BackupError, Result};
pub use naming::{backup_file_name, INVALID_BACKUP_NAME};
pub use replication::FileReplicator;
pub use report::BackupReport;
pub use types::*;
pub use utils::{ensure_directory, map_destination, read_file_metadata, FileMetadata};
pub use verification::{verify_mirror, MirrorVerification};
