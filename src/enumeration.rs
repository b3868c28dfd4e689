//! Recursive file enumeration for treebackup
//!
//! The [`TreeEnumerator`] lists every regular file under a root directory in
//! a deterministic order: siblings are visited sorted by file name and
//! directories are descended into depth-first, never emitted themselves.
//!
//! ## Error Policy
//!
//! A single bad entry (a broken symbolic link, an unreadable subdirectory)
//! must not abort the walk. Such entries are logged, recorded in
//! [`Enumeration::skipped`] and the walk continues. Only a root that cannot
//! be opened fails the enumeration, with whatever was gathered so far
//! returned alongside the error.
//!
//! ## Symbolic Links
//!
//! By default links are not followed and are skipped, since they are not
//! regular files. With [`TreeEnumerator::with_follow_symlinks`] links are
//! resolved; a link to a file is emitted under the link's own path.
//!
//! ## Example
//!
//! ```rust,no_run
//! use treebackup::enumeration::TreeEnumerator;
//!
//! let enumeration = TreeEnumerator::new("./project").enumerate();
//! for file in &enumeration.files {
//!     println!("{}", file.display());
//! }
//! if let Some(err) = &enumeration.error {
//!     eprintln!("walk failed: {}", err);
//! }
//! ```

use crate::error::{BackupError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Recursive lister of regular files under a root directory
///
/// The root is not canonicalized. Emitted paths are the root joined with each
/// file's relative path, so a relative root yields relative paths.
#[derive(Debug, Clone)]
pub struct TreeEnumerator {
    /// Root directory to walk
    root: PathBuf,
    /// Whether to resolve symbolic links during traversal
    follow_symlinks: bool,
}

/// An entry the walk could not process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Path of the entry, when the walker could report one
    pub path: Option<PathBuf>,
    /// Why it was skipped
    pub reason: String,
}

/// Outcome of a walk
///
/// `files` always holds everything gathered, even when `error` is set.
#[derive(Debug, Default)]
pub struct Enumeration {
    /// Regular files found, in walk order
    pub files: Vec<PathBuf>,
    /// Entries skipped because they could not be read
    pub skipped: Vec<SkippedEntry>,
    /// Set when the root itself could not be walked
    pub error: Option<BackupError>,
}

impl Enumeration {
    /// Whether the root was walked to the end
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Discard partial results and turn a failed walk into an error
    pub fn into_result(self) -> Result<Vec<PathBuf>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.files),
        }
    }
}

impl TreeEnumerator {
    /// Create an enumerator for `root` that does not follow symbolic links
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
        }
    }

    /// Set symbolic link following behavior
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Walk the tree and collect every regular file
    pub fn enumerate(&self) -> Enumeration {
        let mut enumeration = Enumeration::default();

        match fs::metadata(&self.root) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                enumeration.error = Some(BackupError::enumeration(&self.root, "not a directory"));
                return enumeration;
            }
            Err(e) => {
                enumeration.error = Some(BackupError::enumeration(&self.root, e.to_string()));
                return enumeration;
            }
        }

        let walker = WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    // The root vanished or became unreadable after the check above
                    enumeration.error = Some(BackupError::enumeration(&self.root, e.to_string()));
                    break;
                }
                Err(e) => {
                    warn!("Error accessing entry at {:?}: {}", e.path(), e);
                    enumeration.skipped.push(SkippedEntry {
                        path: e.path().map(Path::to_path_buf),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_file() {
                enumeration.files.push(entry.into_path());
            } else if !file_type.is_dir() {
                debug!("Skipping non-regular entry {:?}", entry.path());
            }
        }

        debug!(
            "Enumerated {} files under {:?} ({} skipped)",
            enumeration.files.len(),
            self.root,
            enumeration.skipped.len()
        );
        enumeration
    }
}
