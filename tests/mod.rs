//! Main test module for treebackup
//!
//! This module includes all test suites:
//! - Integration tests for complete backup runs
//! - Chaos tests for failure handling
//! - Property-based tests for invariants

pub mod chaos;

#[cfg(test)]
mod edge_cases {
    use ::treebackup::*;
    use tempfile::TempDir;
    use std::fs;

    #[test]
    fn test_reference_scenario() {
        let source = TempDir::new().unwrap();
        let backup_dir = TempDir::new().unwrap();
        let destination = backup_dir.path().join("backup");

        fs::write(source.path().join("a.txt"), b"hello").unwrap();
        fs::create_dir(source.path().join("sub")).unwrap();
        fs::write(source.path().join("sub").join("b.txt"), b"0123456789").unwrap();

        let config = BackupConfig::new(source.path(), &destination)
            .with_backup_type(BackupType::Full);
        let report = Backup::new().run(&config);

        assert!(report.success);
        assert_eq!(report.files_backed_up, 2);
        assert_eq!(report.total_size_bytes, 15);
        assert!(report.error_message.is_none());
        assert_eq!(fs::read(destination.join("a.txt")).unwrap(), b"hello");
        assert_eq!(fs::read(destination.join("sub").join("b.txt")).unwrap(), b"0123456789");
    }

    #[test]
    fn test_empty_directory() {
        let source = TempDir::new().unwrap();
        let backup_dir = TempDir::new().unwrap();
        let destination = backup_dir.path().join("nested").join("backup");

        fs::create_dir_all(source.path().join("only").join("dirs")).unwrap();

        let report = Backup::new().run(&BackupConfig::new(source.path(), &destination));
        assert!(report.success);
        assert_eq!(report.files_backed_up, 0);
        assert_eq!(report.total_size_bytes, 0);

        // Root is created, empty subdirectories are not mirrored
        assert!(destination.is_dir());
        assert!(!destination.join("only").exists());
    }

    #[test]
    fn test_empty_files_are_counted() {
        let source = TempDir::new().unwrap();
        let backup_dir = TempDir::new().unwrap();

        fs::write(source.path().join("empty.txt"), b"").unwrap();

        let report = Backup::new().run(&BackupConfig::new(source.path(), backup_dir.path()));
        assert!(report.success);
        assert_eq!(report.files_backed_up, 1);
        assert_eq!(report.total_size_bytes, 0);
        assert!(backup_dir.path().join("empty.txt").is_file());
    }

    #[test]
    fn test_special_filenames() {
        let source = TempDir::new().unwrap();
        let backup_dir = TempDir::new().unwrap();

        let special_names = vec![
            "file with spaces.txt",
            "file-with-dashes.txt",
            "file.with.dots.txt",
            "file@with#special$chars.txt",
            "file(with)parens.txt",
            "file[with]brackets.txt",
            "файл.txt",
            "文件.txt",
            "🚀🌟💾.txt",
        ];

        let mut created = Vec::new();
        for name in &special_names {
            if fs::write(source.path().join(name), format!("Content of {}", name)).is_ok() {
                created.push(*name);
            }
        }

        let report = Backup::new().run(&BackupConfig::new(source.path(), backup_dir.path()));
        assert!(report.success);
        assert_eq!(report.files_backed_up, created.len() as u64);

        for name in &created {
            let content = fs::read_to_string(backup_dir.path().join(name)).unwrap();
            assert_eq!(content, format!("Content of {}", name));
        }
    }

    #[test]
    fn test_permission_preservation() {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let source = TempDir::new().unwrap();
            let backup_dir = TempDir::new().unwrap();

            let files = vec![
                ("readable.txt", 0o644),
                ("executable.sh", 0o755),
                ("readonly.txt", 0o444),
                ("useronly.txt", 0o600),
                ("group.txt", 0o640),
            ];

            for (name, mode) in &files {
                let path = source.path().join(name);
                fs::write(&path, format!("Content of {}", name)).unwrap();
                fs::set_permissions(&path, fs::Permissions::from_mode(*mode)).unwrap();
            }

            let report = Backup::new().run(&BackupConfig::new(source.path(), backup_dir.path()));
            assert!(report.success);

            for (name, mode) in &files {
                let metadata = fs::metadata(backup_dir.path().join(name)).unwrap();
                assert_eq!(
                    metadata.permissions().mode() & 0o777,
                    *mode,
                    "Permission mismatch for {}",
                    name
                );
            }
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_file_backed_up_twice() {
        use std::os::unix::fs::PermissionsExt;

        let source = TempDir::new().unwrap();
        let backup_dir = TempDir::new().unwrap();
        if !crate::chaos::permissions_enforced(source.path()) {
            return;
        }

        let file = source.path().join("ro.txt");
        fs::write(&file, b"locked").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o444)).unwrap();

        let mut backup = Backup::new();
        let config = BackupConfig::new(source.path(), backup_dir.path());
        let first = backup.run(&config);
        let second = backup.run(&config);

        assert!(first.success, "{:?}", first.error_message);
        assert!(second.success, "{:?}", second.error_message);
        assert_eq!(second.files_backed_up, first.files_backed_up);
        assert_eq!(second.total_size_bytes, 6);

        let copy = backup_dir.path().join("ro.txt");
        assert_eq!(fs::read(&copy).unwrap(), b"locked");
        assert_eq!(fs::metadata(&copy).unwrap().permissions().mode() & 0o777, 0o444);
    }

    #[test]
    fn test_existing_destination_is_reused() {
        let source = TempDir::new().unwrap();
        let backup_dir = TempDir::new().unwrap();

        fs::write(source.path().join("a.txt"), b"new").unwrap();
        fs::write(backup_dir.path().join("a.txt"), b"stale contents").unwrap();
        fs::write(backup_dir.path().join("unrelated.txt"), b"keep me").unwrap();

        let report = Backup::new().run(&BackupConfig::new(source.path(), backup_dir.path()));
        assert!(report.success);

        // Overwritten, and nothing is deleted
        assert_eq!(fs::read(backup_dir.path().join("a.txt")).unwrap(), b"new");
        assert_eq!(fs::read(backup_dir.path().join("unrelated.txt")).unwrap(), b"keep me");
    }

    #[test]
    fn test_source_is_untouched() {
        let source = TempDir::new().unwrap();
        let backup_dir = TempDir::new().unwrap();

        fs::write(source.path().join("a.txt"), b"original").unwrap();
        let before = fs::read_dir(source.path()).unwrap().count();

        Backup::new().run(&BackupConfig::new(source.path(), backup_dir.path()));

        assert_eq!(fs::read_dir(source.path()).unwrap().count(), before);
        assert_eq!(fs::read(source.path().join("a.txt")).unwrap(), b"original");
    }

    #[test]
    fn test_naming_helper() {
        assert!(backup_file_name("incremental").starts_with("incremental_backup_"));
        assert!(backup_file_name("full").starts_with("full_backup_"));
        assert_eq!(backup_file_name("bogus"), INVALID_BACKUP_NAME);
    }
}
