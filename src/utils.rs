//! Utility functions for treebackup
//!
//! This module holds the small filesystem primitives the backup pipeline is
//! assembled from:
//!
//! ### File Operations
//! - File metadata extraction (size and permission mode)
//! - Permission handling (cross-platform)
//! - File content hashing (SHA-256)
//!
//! ### Path Manipulation
//! - Re-rooting a source file path under the destination root
//! - Idempotent directory creation
//!
//! ### Formatting
//! - Byte formatting (human-readable sizes)
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use crate::utils::{map_destination, ensure_directory};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dest = map_destination(
//!     Path::new("/home/user/project"),
//!     Path::new("/backup"),
//!     Path::new("/home/user/project/src/main.rs"),
//! )?;
//! assert_eq!(dest, Path::new("/backup/src/main.rs"));
//!
//! ensure_directory(dest.parent().unwrap())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//!
//! All utility functions are stateless and can be called concurrently from
//! multiple threads without synchronization.

use crate::error::{BackupError, Result};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Mode applied to directories created by [`ensure_directory`] (before umask)
pub const DIRECTORY_MODE: u32 = 0o755;

/// Size and permission bits of a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    /// File size in bytes
    pub size: u64,
    /// Permission bits including special bits (e.g., 0o644, 0o4755)
    pub permissions: u32,
}

/// Stat a file for its size and permission mode
///
/// Follows symbolic links, so the size reported for a link is the size of
/// its target.
///
/// # Errors
///
/// - [`BackupError::NotFound`] if the path does not exist
/// - [`BackupError::AccessDenied`] if the path cannot be stat'd
/// - [`BackupError::MetadataRead`] for any other I/O failure
pub fn read_file_metadata(path: &Path) -> Result<FileMetadata> {
    let metadata = fs::metadata(path).map_err(|e| BackupError::metadata(path, e))?;
    trace!("Read metadata for {:?}: {} bytes", path, metadata.len());

    Ok(FileMetadata {
        size: metadata.len(),
        permissions: permissions_of(&metadata),
    })
}

/// Get Unix permissions from metadata
///
/// Strips the file type bits so only permission and special bits remain.
#[cfg(unix)]
pub fn permissions_of(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

/// Get permissions from metadata (Windows implementation)
#[cfg(windows)]
pub fn permissions_of(metadata: &fs::Metadata) -> u32 {
    // Only the read-only attribute maps onto mode bits
    let mut mode = if metadata.permissions().readonly() { 0o444 } else { 0o644 };
    if metadata.is_dir() {
        mode |= 0o111;
    }
    mode
}

/// Set Unix permissions
#[cfg(unix)]
pub fn set_permissions(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

/// Set permissions (Windows implementation)
#[cfg(windows)]
pub fn set_permissions(path: &Path, mode: u32) -> std::io::Result<()> {
    // On Windows only the owner write bit is meaningful
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_readonly(mode & 0o200 == 0);
    fs::set_permissions(path, perms)
}

/// Re-root a source file path under the destination root
///
/// Strips `source_root` from `file` lexically and joins the remainder onto
/// `destination_root`, preserving every intermediate directory segment.
/// Symbolic links in the prefix are not resolved.
///
/// # Errors
///
/// - [`BackupError::PathMapping`] if `file` is not strictly under `source_root`
///
/// # Example
///
/// ```rust,ignore
/// use crate::utils::map_destination;
/// use std::path::Path;
///
/// let dest = map_destination(
///     Path::new("/src"),
///     Path::new("/dst"),
///     Path::new("/src/sub/b.txt"),
/// ).unwrap();
/// assert_eq!(dest, Path::new("/dst/sub/b.txt"));
/// ```
pub fn map_destination(
    source_root: &Path,
    destination_root: &Path,
    file: &Path,
) -> Result<PathBuf> {
    let mapping_error = || BackupError::PathMapping {
        path: file.to_path_buf(),
        root: source_root.to_path_buf(),
    };

    let relative = file.strip_prefix(source_root).map_err(|_| mapping_error())?;
    // The root itself has no place inside the destination
    if relative.as_os_str().is_empty() {
        return Err(mapping_error());
    }

    Ok(destination_root.join(relative))
}

/// Ensure a directory exists, creating missing parents
///
/// An already existing directory is a success. New directories are created
/// with [`DIRECTORY_MODE`] on Unix.
///
/// # Errors
///
/// - [`BackupError::DirectoryCreate`] if creation fails, including when the
///   path (or one of its parents) is an existing non-directory file
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIRECTORY_MODE);
    }

    builder.create(path).map_err(|source| BackupError::DirectoryCreate {
        path: path.to_path_buf(),
        source,
    })?;
    trace!("Created directory {:?}", path);
    Ok(())
}

/// Hash a file's content using SHA-256
///
/// Streams the file through an 8KB buffer and returns the hash as a
/// 64-character hexadecimal string.
pub fn hash_file_content(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Format bytes in human-readable form
///
/// Uses binary units (1024-based). Values below 1 KB are shown as whole
/// numbers, larger values with two decimals.
///
/// ```rust,ignore
/// assert_eq!(format_bytes(1023), "1023 B");
/// assert_eq!(format_bytes(1536), "1.50 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}
