//! Archive file naming
//!
//! Produces names such as `full_backup_2024-05-01_13-45-09.tar` that embed
//! the backup type and a second-precision timestamp. The copy pipeline does
//! not use these names; they exist for callers that package a finished
//! mirror into an archive.
//!
//! Unknown backup types do not fail. [`backup_file_name`] returns the
//! [`INVALID_BACKUP_NAME`] sentinel instead, which callers must treat as an
//! error signal. [`BackupType::archive_name`] is the typed alternative that
//! cannot produce the sentinel.

use crate::types::BackupType;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

/// Returned in place of a file name when the backup type is not recognized
pub const INVALID_BACKUP_NAME: &str = "Wrong backup type";

/// Timestamp layout embedded in archive names
const NAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Archive name for `backup_type` stamped with the current local time
pub fn backup_file_name(backup_type: &str) -> String {
    backup_file_name_at(backup_type, &Local::now())
}

/// Archive name for `backup_type` stamped with `at`
///
/// Returns [`INVALID_BACKUP_NAME`] unless `backup_type` is exactly `"full"`
/// or `"incremental"`.
pub fn backup_file_name_at<Tz>(backup_type: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match backup_type.parse::<BackupType>() {
        Ok(kind) => kind.archive_name(at),
        Err(_) => INVALID_BACKUP_NAME.to_string(),
    }
}

impl BackupType {
    /// Archive name for this backup type stamped with `at`
    pub fn archive_name<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        format!("{}_backup_{}.tar", self.as_str(), at.format(NAME_TIMESTAMP_FORMAT))
    }
}
