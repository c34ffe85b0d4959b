//! Recursive enumeration of desired-state files
//!
//! Walks a directory tree of arbitrary depth and yields every regular
//! file carrying the configured extension. Entries that are neither
//! regular files nor directories, and entries the traversal cannot read
//! (including symlink loops, which walkdir detects when following
//! links), are collected as anomalies rather than failing the walk.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Result of walking a desired-state tree
///
/// `files` is in directory-traversal order, not sorted; callers needing
/// determinism must sort explicitly.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// Files matching the configured extension
    pub files: Vec<PathBuf>,
    /// Non-fatal anomalies encountered during traversal
    pub anomalies: Vec<String>,
}

/// Recursive walker for desired-state trees
pub struct TreeWalker {
    extension: String,
}

impl TreeWalker {
    /// Create a walker yielding files with the given extension
    #[must_use]
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Walk `root` recursively, collecting matching files and anomalies
    #[must_use]
    pub fn walk(&self, root: &Path) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // Loop detection and unreadable entries land here
                    outcome.anomalies.push(e.to_string());
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }

            if !file_type.is_file() {
                outcome.anomalies.push(format!(
                    "skipping {}: not a regular file or directory",
                    entry.path().display()
                ));
                continue;
            }

            if entry
                .path()
                .extension()
                .is_some_and(|ext| ext == self.extension.as_str())
            {
                outcome.files.push(entry.path().to_path_buf());
            }
        }

        outcome
    }
}
