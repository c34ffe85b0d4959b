//! On-disk cache of current-state documents
//!
//! Each exported template is written to a path mirroring the remote
//! group hierarchy, minus the root-group prefix. The cache is the only
//! durable artifact of a run besides the drift report; entries are
//! overwritten unconditionally and never read back within the same run.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::Document;
use crate::error::{Error, Result};

/// Writes current-state documents to a mirrored directory tree
pub struct CacheWriter {
    root: PathBuf,
    root_group: String,
    extension: String,
}

impl CacheWriter {
    /// Create a writer rooted at `root` for groups under `root_group`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, root_group: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            root_group: root_group.into(),
            extension: extension.into(),
        }
    }

    /// Write a template document to its cache path, overwriting any
    /// previous entry
    ///
    /// Intermediate directories are created as needed. Returns the path
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if directory creation or the write fails.
    pub fn write(&self, group_name: &str, template_name: &str, document: &Document) -> Result<PathBuf> {
        let dir = self.root.join(Self::relative_group_path(&self.root_group, group_name));

        fs::create_dir_all(&dir)
            .map_err(|e| Error::io(format!("creating cache directory {}", dir.display()), e))?;

        let path = dir.join(format!("{template_name}.{}", self.extension));
        let text = serde_json::to_string_pretty(document)
            .map_err(|e| Error::parse(template_name, e))?;

        fs::write(&path, text)
            .map_err(|e| Error::io(format!("writing cache entry {}", path.display()), e))?;

        debug!("cached {template_name} to {}", path.display());
        Ok(path)
    }

    /// Derive the cache-relative directory for a group name
    ///
    /// The root-group prefix is stripped; what remains is the nested
    /// group path (`Root/db/sql` becomes `db/sql`).
    fn relative_group_path(root_group: &str, group_name: &str) -> PathBuf {
        let stripped = group_name
            .strip_prefix(root_group)
            .unwrap_or(group_name)
            .trim_start_matches('/');

        if stripped.is_empty() {
            PathBuf::new()
        } else {
            stripped.split('/').collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_root_group_template() {
        let tmp = TempDir::new().unwrap();
        let writer = CacheWriter::new(tmp.path(), "Root", "json");

        let path = writer.write("Root", "tmplA", &json!({"x": 1})).unwrap();

        assert_eq!(path, tmp.path().join("tmplA.json"));
        assert!(path.exists());
    }

    #[test]
    fn test_write_nested_group_creates_directories() {
        let tmp = TempDir::new().unwrap();
        let writer = CacheWriter::new(tmp.path(), "Root", "json");

        let path = writer
            .write("Root/db/sql", "Postgres by Agent", &json!({"y": 2}))
            .unwrap();

        assert_eq!(path, tmp.path().join("db/sql/Postgres by Agent.json"));
        assert!(path.exists());
    }

    #[test]
    fn test_write_overwrites_existing_entry() {
        let tmp = TempDir::new().unwrap();
        let writer = CacheWriter::new(tmp.path(), "Root", "json");

        writer.write("Root", "tmplA", &json!({"version": 1})).unwrap();
        let path = writer.write("Root", "tmplA", &json!({"version": 2})).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let document: Document = serde_json::from_str(&content).unwrap();
        assert_eq!(document["version"], 2);
    }

    #[test]
    fn test_written_entry_round_trips() {
        let tmp = TempDir::new().unwrap();
        let writer = CacheWriter::new(tmp.path(), "Root", "json");
        let document = json!({"zabbix_export": {"templates": [{"name": "tmplA"}]}});

        let path = writer.write("Root", "tmplA", &document).unwrap();

        let read_back: Document =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(read_back, document);
    }

    #[test]
    fn test_relative_path_for_unprefixed_group() {
        // Groups passing the substring filter without the literal prefix
        // keep their full name as the relative path
        let rel = CacheWriter::relative_group_path("Root", "Shared/Root/x");

        assert_eq!(rel, PathBuf::from("Shared/Root/x"));
    }
}
