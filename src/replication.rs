//! Single-file copy with permission bits
//!
//! [`FileReplicator`] copies one file in three steps, each with its own
//! error variant:
//!
//! 1. Read the whole source into memory ([`BackupError::SourceRead`])
//! 2. Write it to the destination, overwriting ([`BackupError::DestinationWrite`])
//! 3. Apply the source's permission mode ([`BackupError::PermissionCopy`])
//!
//! Any failure aborts the copy of that file. In the default mode the
//! destination is written in place and a failure in step 2 or 3 can leave it
//! partially written; nothing is rolled back. With atomic writes enabled the
//! content goes to a temporary file next to the destination which is then
//! renamed over it, so the destination holds either the old or the new
//! content.

use crate::error::{BackupError, Result};
use crate::utils;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::trace;

/// Copies file content and permission bits
#[derive(Debug, Clone, Copy, Default)]
pub struct FileReplicator {
    atomic_writes: bool,
}

impl FileReplicator {
    /// Create a replicator that writes destinations in place
    pub fn new() -> Self {
        Self::default()
    }

    /// Write through a temporary file and rename it over the destination
    pub fn with_atomic_writes(mut self, atomic: bool) -> Self {
        self.atomic_writes = atomic;
        self
    }

    /// Copy `source` to `destination` and return the number of bytes written
    ///
    /// The parent directory of `destination` must already exist.
    pub fn replicate(&self, source: &Path, destination: &Path) -> Result<u64> {
        let source_read = |e| BackupError::SourceRead {
            path: source.to_path_buf(),
            source: e,
        };

        // Mode comes from the same handle the content is read through
        let mut file = File::open(source).map_err(source_read)?;
        let mode = utils::permissions_of(&file.metadata().map_err(source_read)?);
        let mut content = Vec::new();
        file.read_to_end(&mut content).map_err(source_read)?;
        drop(file);

        let written = if self.atomic_writes {
            write_atomic(destination, &content)
        } else {
            write_in_place(destination, &content)
        };
        written.map_err(|e| BackupError::DestinationWrite {
            path: destination.to_path_buf(),
            source: e,
        })?;

        utils::set_permissions(destination, mode).map_err(|e| BackupError::PermissionCopy {
            path: destination.to_path_buf(),
            mode,
            source: e,
        })?;

        trace!(
            "Replicated {:?} -> {:?} ({} bytes, mode {:o})",
            source,
            destination,
            content.len(),
            mode
        );
        Ok(content.len() as u64)
    }
}

/// Overwrite `path` with `content`, first granting owner write on a read-only file
///
/// A previous run leaves read-only sources mirrored read-only. The source mode
/// is re-applied after the write.
fn write_in_place(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Ok(metadata) = fs::symlink_metadata(path) {
        if metadata.is_file() && metadata.permissions().readonly() {
            utils::set_permissions(path, utils::permissions_of(&metadata) | 0o200)?;
        }
    }
    fs::write(path, content)
}

/// Write `content` into a temporary sibling of `path`, then rename it into place
fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
