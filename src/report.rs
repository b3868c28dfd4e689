//! Backup run reports
//!
//! A [`BackupReport`] is the only output of a backup run. It is built by a
//! crate-internal [`ReportBuilder`] while the run is in progress and stamped
//! with its completion time and duration exactly once, when the builder is
//! consumed by [`ReportBuilder::finalize`]. After that the report is a plain
//! value owned by the caller.
//!
//! ## Error Slot
//!
//! A report carries a single error message. When several errors occur in one
//! run (for example a failed destination root followed by a failed copy) the
//! last one observed wins; earlier ones are only visible in the log.

use crate::error::{BackupError, Result};
use crate::utils::format_bytes;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::warn;

/// Outcome of a single backup run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupReport {
    /// When the run completed
    pub timestamp: DateTime<Local>,
    /// Number of files fully copied
    pub files_backed_up: u64,
    /// Sum of the source sizes of the copied files
    pub total_size_bytes: u64,
    /// Wall-clock time the run took
    pub duration: Duration,
    /// Whether no error was recorded
    pub success: bool,
    /// Last error recorded during the run
    pub error_message: Option<String>,
}

impl BackupReport {
    /// Completion time as `YYYY-MM-DD HH:MM:SS`
    pub fn timestamp_display(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Duration in seconds with two decimals, e.g. `"0.42 seconds"`
    pub fn duration_display(&self) -> String {
        format!("{:.2} seconds", self.duration.as_secs_f64())
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        let outcome = if self.success { "succeeded" } else { "failed" };
        let mut summary = format!(
            "Backup {}: {} files, {} in {}",
            outcome,
            self.files_backed_up,
            format_bytes(self.total_size_bytes),
            self.duration_display()
        );
        if let Some(message) = &self.error_message {
            summary.push_str(&format!(" ({})", message));
        }
        summary
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for BackupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Backup Success: {}", self.success)?;
        writeln!(f, "Files Backed Up: {}", self.files_backed_up)?;
        writeln!(f, "Total Size: {} bytes", self.total_size_bytes)?;
        writeln!(f, "Duration: {}", self.duration_display())?;
        write!(f, "Timestamp: {}", self.timestamp_display())?;
        if let Some(message) = &self.error_message {
            write!(f, "\nError: {}", message)?;
        }
        Ok(())
    }
}

/// Mutable accumulator for a report under construction
#[derive(Debug)]
pub(crate) struct ReportBuilder {
    files_backed_up: u64,
    total_size_bytes: u64,
    success: bool,
    error_message: Option<String>,
}

impl ReportBuilder {
    /// Start an empty, successful report
    pub(crate) fn new() -> Self {
        Self {
            files_backed_up: 0,
            total_size_bytes: 0,
            success: true,
            error_message: None,
        }
    }

    /// Count one copied file of `size` bytes
    pub(crate) fn record_file(&mut self, size: u64) {
        self.files_backed_up += 1;
        self.total_size_bytes += size;
    }

    /// Mark the run failed and overwrite the error slot
    pub(crate) fn record_error(&mut self, err: &BackupError) {
        warn!("Recording backup error: {}", err);
        self.success = false;
        self.error_message = Some(err.to_string());
    }

    /// Files counted so far
    pub(crate) fn files_backed_up(&self) -> u64 {
        self.files_backed_up
    }

    /// Stamp completion time and elapsed duration since `started`
    pub(crate) fn finalize(self, started: Instant) -> BackupReport {
        BackupReport {
            timestamp: Local::now(),
            files_backed_up: self.files_backed_up,
            total_size_bytes: self.total_size_bytes,
            duration: started.elapsed(),
            success: self.success,
            error_message: self.error_message,
        }
    }
}
