//! Backup orchestration
//!
//! This module provides the [`Backup`] struct, which drives a run through
//! its phases and folds every outcome into a [`BackupReport`]:
//!
//! ```text
//! Idle -> DirectoryPrep -> Enumerating -> CopyingFiles(i) -> Finalized
//! ```
//!
//! ## Failure Policy
//!
//! The two halves of a run treat errors differently:
//!
//! - **Setup is best-effort.** If the destination root cannot be created or
//!   the source cannot be fully enumerated, the error is recorded and the run
//!   goes on with whatever it has.
//! - **The copy loop is fail-fast.** The first file that cannot be mapped,
//!   given a destination directory, copied or sized stops the run. Files
//!   after it are not copied and are not counted.
//!
//! Nothing is returned as an `Err`: callers always get a report, with
//! `success = false` and the last error message when something went wrong.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use treebackup::{Backup, BackupConfig};
//!
//! let mut backup = Backup::new();
//! let report = backup.run(&BackupConfig::new("./project", "/tmp/project_backup"));
//!
//! println!("{}", report);
//! assert_eq!(backup.history().len(), 1);
//! ```

use crate::enumeration::TreeEnumerator;
use crate::error::{BackupError, Result};
use crate::replication::FileReplicator;
use crate::report::{BackupReport, ReportBuilder};
use crate::types::{BackupConfig, BackupPhase, BackupType};
use crate::utils;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

/// Main entry point for backup runs
///
/// A `Backup` holds engine settings and the reports of its past runs. It has
/// no other state between runs.
///
/// # Examples
///
/// ```rust,no_run
/// use treebackup::{BackupBuilder, BackupConfig};
///
/// let mut backup = BackupBuilder::new()
///     .atomic_writes(true)
///     .build();
///
/// let report = backup.perform_full_backup(&BackupConfig::new("./src", "./src_backup"));
/// if !report.success {
///     eprintln!("backup failed: {:?}", report.error_message);
/// }
/// ```
#[derive(Debug, Default)]
pub struct Backup {
    /// Whether enumeration resolves symbolic links
    follow_symlinks: bool,
    /// Copier used for every file
    replicator: FileReplicator,
    /// Reports of completed runs, oldest first
    history: Vec<BackupReport>,
}

impl Backup {
    /// Create a backup engine with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the backup described by `config`
    ///
    /// Dispatches on [`BackupConfig::backup_type`]. Full backups run
    /// [`Backup::perform_full_backup`]; incremental backups are not
    /// implemented and produce a failed report without touching the
    /// filesystem.
    #[instrument(skip(self), fields(backup_type = %config.backup_type))]
    pub fn run(&mut self, config: &BackupConfig) -> BackupReport {
        match config.backup_type {
            BackupType::Full => self.perform_full_backup(config),
            BackupType::Incremental => {
                let started = Instant::now();
                let mut builder = ReportBuilder::new();
                builder.record_error(&BackupError::UnsupportedBackupType(config.backup_type));
                self.finish(builder, started)
            }
        }
    }

    /// Mirror every regular file under the source into the destination
    ///
    /// Ignores [`BackupConfig::backup_type`].
    #[instrument(
        skip(self),
        fields(source = ?config.source_path, destination = ?config.destination_path)
    )]
    pub fn perform_full_backup(&mut self, config: &BackupConfig) -> BackupReport {
        let started = Instant::now();
        let mut builder = ReportBuilder::new();
        info!(
            "Starting full backup of {:?} into {:?}",
            config.source_path, config.destination_path
        );

        log_phase(BackupPhase::DirectoryPrep);
        if let Err(e) = utils::ensure_directory(&config.destination_path) {
            builder.record_error(&e);
        } else {
            debug!("Destination root {:?} ready", config.destination_path);
        }

        log_phase(BackupPhase::Enumerating);
        let enumeration = TreeEnumerator::new(&config.source_path)
            .with_follow_symlinks(self.follow_symlinks)
            .enumerate();
        if let Some(e) = &enumeration.error {
            builder.record_error(e);
        }

        for (index, file) in enumeration.files.iter().enumerate() {
            log_phase(BackupPhase::CopyingFiles(index));
            match self.back_up_file(config, file) {
                Ok(size) => builder.record_file(size),
                Err(e) => {
                    builder.record_error(&e);
                    debug!(
                        "Aborting copy loop after {} files; {} left unprocessed",
                        builder.files_backed_up(),
                        enumeration.files.len() - index - 1
                    );
                    break;
                }
            }
        }

        self.finish(builder, started)
    }

    /// Reports of all completed runs, oldest first
    pub fn history(&self) -> &[BackupReport] {
        &self.history
    }

    /// Report of the most recent run
    pub fn last_report(&self) -> Option<&BackupReport> {
        self.history.last()
    }

    /// Map, prepare, copy and size a single file
    fn back_up_file(&self, config: &BackupConfig, file: &Path) -> Result<u64> {
        let destination =
            utils::map_destination(&config.source_path, &config.destination_path, file)?;
        if let Some(parent) = destination.parent() {
            utils::ensure_directory(parent)?;
        }
        self.replicator.replicate(file, &destination)?;
        let size = utils::read_file_metadata(file)?.size;
        debug!("Backed up {:?} ({} bytes)", file, size);
        Ok(size)
    }

    /// Stamp the report, keep a copy in the history and hand it out
    fn finish(&mut self, builder: ReportBuilder, started: Instant) -> BackupReport {
        let report = builder.finalize(started);
        log_phase(BackupPhase::Finalized);
        info!(
            success = report.success,
            files = report.files_backed_up,
            bytes = report.total_size_bytes,
            "Backup finished in {}",
            report.duration_display()
        );
        self.history.push(report.clone());
        report
    }
}

fn log_phase(phase: BackupPhase) {
    trace!("Entering phase {}", phase);
}

/// Builder for configuring a [`Backup`]
///
/// # Examples
///
/// ```rust
/// use treebackup::BackupBuilder;
///
/// let backup = BackupBuilder::new()
///     .follow_symlinks(true)
///     .atomic_writes(true)
///     .build();
/// assert!(backup.history().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct BackupBuilder {
    follow_symlinks: bool,
    atomic_writes: bool,
}

impl BackupBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve symbolic links while enumerating the source
    ///
    /// When disabled (the default), links are skipped.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Write each destination through a temporary file and rename
    pub fn atomic_writes(mut self, atomic: bool) -> Self {
        self.atomic_writes = atomic;
        self
    }

    /// Build the backup engine
    pub fn build(self) -> Backup {
        Backup {
            follow_symlinks: self.follow_symlinks,
            replicator: FileReplicator::new().with_atomic_writes(self.atomic_writes),
            history: Vec::new(),
        }
    }
}
