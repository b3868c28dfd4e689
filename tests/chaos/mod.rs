//! Chaos tests for treebackup
//!
//! Injects filesystem failures at each stage of a run and checks that the
//! report reflects them without the process crashing: setup failures are
//! recorded and the run continues, copy failures stop the remaining files.

use ::treebackup::*;
use tempfile::TempDir;
use std::fs;
use std::path::Path;

/// Source tree whose files enumerate as `a.txt`, `b/c.txt`, `d.txt`
pub fn three_file_source() -> TempDir {
    let source = TempDir::new().unwrap();
    fs::write(source.path().join("a.txt"), b"first").unwrap();
    fs::create_dir(source.path().join("b")).unwrap();
    fs::write(source.path().join("b").join("c.txt"), b"second").unwrap();
    fs::write(source.path().join("d.txt"), b"third").unwrap();
    source
}

/// Whether the current process bypasses permission checks
#[cfg(unix)]
pub fn permissions_enforced(probe_dir: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    let probe = probe_dir.join(".probe");
    fs::write(&probe, b"x").unwrap();
    fs::set_permissions(&probe, fs::Permissions::from_mode(0o000)).unwrap();
    let enforced = fs::read(&probe).is_err();
    fs::set_permissions(&probe, fs::Permissions::from_mode(0o600)).unwrap();
    fs::remove_file(&probe).unwrap();
    enforced
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_uncreatable_destination_root() {
        let source = three_file_source();
        let scratch = TempDir::new().unwrap();

        // A regular file blocks the destination path for every user
        let blocker = scratch.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let destination = blocker.join("backup");

        let report = Backup::new().run(&BackupConfig::new(source.path(), &destination));

        assert!(!report.success);
        assert!(report.error_message.as_deref().is_some_and(|m| !m.is_empty()));
        assert_eq!(report.files_backed_up, 0);
        assert!(logs_contain("Recording backup error"));
    }

    #[test]
    fn test_subdirectory_failure_stops_remaining_files() {
        let source = three_file_source();
        let backup_dir = TempDir::new().unwrap();

        // `b` already exists in the destination as a file
        fs::write(backup_dir.path().join("b"), b"collision").unwrap();

        let report = Backup::new().run(&BackupConfig::new(source.path(), backup_dir.path()));

        assert!(!report.success);
        assert_eq!(report.files_backed_up, 1);
        assert_eq!(report.total_size_bytes, 5);
        assert!(report.error_message.unwrap().contains("failed to create directory"));
        assert!(backup_dir.path().join("a.txt").exists());
        assert!(!backup_dir.path().join("d.txt").exists());
    }

    #[test]
    fn test_write_failure_stops_remaining_files() {
        let source = three_file_source();
        let backup_dir = TempDir::new().unwrap();

        // A directory where the copy of `b/c.txt` should go
        fs::create_dir_all(backup_dir.path().join("b").join("c.txt")).unwrap();

        let report = Backup::new().run(&BackupConfig::new(source.path(), backup_dir.path()));

        assert!(!report.success);
        assert_eq!(report.files_backed_up, 1);
        assert!(report.error_message.unwrap().contains("failed to write destination file"));
        assert!(!backup_dir.path().join("d.txt").exists());
    }

    #[test]
    fn test_later_error_overwrites_setup_error() {
        let backup_dir = TempDir::new().unwrap();
        let blocker = backup_dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();

        // Destination fails first, then the missing source fails enumeration
        let report = Backup::new().run(&BackupConfig::new(
            backup_dir.path().join("missing-source"),
            blocker.join("backup"),
        ));

        assert!(!report.success);
        assert!(report.error_message.unwrap().contains("failed to enumerate"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_mid_enumeration() {
        use std::os::unix::fs::PermissionsExt;

        let source = three_file_source();
        if !permissions_enforced(source.path()) {
            // Running with elevated privileges
            return;
        }
        let backup_dir = TempDir::new().unwrap();
        let unreadable = source.path().join("b").join("c.txt");
        fs::set_permissions(&unreadable, fs::Permissions::from_mode(0o000)).unwrap();

        let report = Backup::new().run(&BackupConfig::new(source.path(), backup_dir.path()));
        fs::set_permissions(&unreadable, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(!report.success);
        assert_eq!(report.files_backed_up, 1);
        assert!(report.error_message.unwrap().contains("failed to read source file"));
        assert!(backup_dir.path().join("a.txt").exists());
        assert!(!backup_dir.path().join("d.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let source = three_file_source();
        if !permissions_enforced(source.path()) {
            return;
        }
        let locked = source.path().join("b");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let enumeration = TreeEnumerator::new(source.path()).enumerate();
        let backup_dir = TempDir::new().unwrap();
        let report = Backup::new().run(&BackupConfig::new(source.path(), backup_dir.path()));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // The walk goes on past the locked directory
        assert!(enumeration.is_complete());
        assert_eq!(enumeration.skipped.len(), 1);
        assert_eq!(enumeration.files.len(), 2);
        assert!(report.success);
        assert_eq!(report.files_backed_up, 2);
    }
}
