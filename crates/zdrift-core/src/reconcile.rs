//! Reconciliation of current state against desired state
//!
//! This module drives a full run: discover the namespace, export and
//! cache every template (current state), load the desired-state tree,
//! and compute a per-template diff result. Reconciliation is
//! one-directional: every current-state template yields a result,
//! templates present only in the desired tree are never reported.

mod orchestrator;
mod reporting;

pub use orchestrator::ReconcileEngine;
pub use reporting::ReconcileReporter;

use indexmap::IndexMap;

use crate::comparison::DiffEntry;
use crate::document::Document;

/// Insertion-ordered mapping from template name to document
///
/// Built once for current state (group-sorted, then enumeration order
/// within each group) and once for desired state. Iteration order is
/// the population order.
pub type StateMap = IndexMap<String, Document>;

/// Per-template reconciliation outcome
#[derive(Debug, Clone, PartialEq)]
pub enum DiffResult {
    /// Present in both states; an empty entry list means no drift
    Matched {
        /// Structural diff entries, empty when the documents are equal
        entries: Vec<DiffEntry>,
    },
    /// Present in current state but absent from the desired tree
    Unmatched,
}

/// Result of a full reconciliation run
///
/// Owns the state maps for the duration of the run; nothing here is
/// persisted. The cache directory is the only durable artifact.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Current state, as exported from the remote system
    pub current: StateMap,
    /// Desired state, absent in snapshot-only mode
    pub desired: Option<StateMap>,
    /// Per-template results in current-state order
    pub results: Vec<(String, DiffResult)>,
}

impl RunReport {
    /// Number of templates exported and cached
    #[must_use]
    pub fn cached(&self) -> usize {
        self.current.len()
    }

    /// Whether the run performed caching only
    #[must_use]
    pub fn is_snapshot_only(&self) -> bool {
        self.desired.is_none()
    }

    /// Number of templates matching their desired state exactly
    #[must_use]
    pub fn in_sync(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, r)| matches!(r, DiffResult::Matched { entries } if entries.is_empty()))
            .count()
    }

    /// Number of templates with a non-empty diff
    #[must_use]
    pub fn drifted(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, r)| matches!(r, DiffResult::Matched { entries } if !entries.is_empty()))
            .count()
    }

    /// Number of templates with no desired-state counterpart
    #[must_use]
    pub fn unmatched(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, r)| matches!(r, DiffResult::Unmatched))
            .count()
    }

    /// Whether any template drifted or went unmatched
    #[must_use]
    pub fn has_drift(&self) -> bool {
        self.drifted() > 0 || self.unmatched() > 0
    }
}

#[cfg(test)]
mod integration_tests {
    use std::fs;
    use std::path::Path;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::api::{Group, TemplateSource, TemplateSummary};
    use crate::cache::CacheWriter;
    use crate::error::Result;

    /// In-memory remote with one root group and one nested group
    struct FakeRemote;

    impl TemplateSource for FakeRemote {
        fn list_groups(&self) -> Result<Vec<Group>> {
            Ok(vec![
                Group {
                    name: "Root/db".to_string(),
                    id: "2".to_string(),
                },
                Group {
                    name: "Root".to_string(),
                    id: "1".to_string(),
                },
                Group {
                    name: "Other".to_string(),
                    id: "3".to_string(),
                },
            ])
        }

        fn list_templates(&self, group_id: &str) -> Result<Vec<TemplateSummary>> {
            let rows = match group_id {
                "1" => vec![TemplateSummary {
                    name: "tmplA".to_string(),
                    id: "100".to_string(),
                }],
                "2" => vec![TemplateSummary {
                    name: "tmplB".to_string(),
                    id: "200".to_string(),
                }],
                _ => vec![],
            };
            Ok(rows)
        }

        fn export_template(&self, template_id: &str) -> Result<String> {
            let document = match template_id {
                "100" => json!({"x": 1}),
                _ => json!({"y": 2}),
            };
            Ok(document.to_string())
        }
    }

    fn write_desired(dir: &Path, name: &str, document: &serde_json::Value) {
        fs::write(dir.join(format!("{name}.json")), document.to_string()).unwrap();
    }

    #[test]
    fn test_run_snapshot_only_caches_and_reports_nothing() {
        let cache_dir = TempDir::new().unwrap();
        let cache = CacheWriter::new(cache_dir.path(), "Root", "json");
        let engine = ReconcileEngine::new("Root", "json");

        let report = engine.run(&FakeRemote, &cache, None).unwrap();

        assert!(report.is_snapshot_only());
        assert_eq!(report.cached(), 2);
        assert!(report.results.is_empty());

        // Cache mirrors the group hierarchy minus the root prefix
        assert!(cache_dir.path().join("tmplA.json").exists());
        assert!(cache_dir.path().join("db/tmplB.json").exists());
    }

    #[test]
    fn test_run_reports_drift_and_unmatched() {
        let cache_dir = TempDir::new().unwrap();
        let desired_dir = TempDir::new().unwrap();
        write_desired(desired_dir.path(), "tmplA", &json!({"x": 2}));

        let cache = CacheWriter::new(cache_dir.path(), "Root", "json");
        let engine = ReconcileEngine::new("Root", "json");

        let report = engine
            .run(&FakeRemote, &cache, Some(desired_dir.path()))
            .unwrap();

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.drifted(), 1);
        assert_eq!(report.unmatched(), 1);
        assert!(report.has_drift());

        // Group-sorted processing puts the Root template first
        let (name, result) = &report.results[0];
        assert_eq!(name, "tmplA");
        match result {
            DiffResult::Matched { entries } => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].path, "x");
            }
            DiffResult::Unmatched => panic!("tmplA has a desired-state file"),
        }

        assert_eq!(report.results[1], ("tmplB".to_string(), DiffResult::Unmatched));
    }

    #[test]
    fn test_run_with_identical_desired_state_is_all_in_sync() {
        let cache_dir = TempDir::new().unwrap();
        let desired_dir = TempDir::new().unwrap();
        write_desired(desired_dir.path(), "tmplA", &json!({"x": 1}));
        write_desired(desired_dir.path(), "tmplB", &json!({"y": 2}));

        let cache = CacheWriter::new(cache_dir.path(), "Root", "json");
        let engine = ReconcileEngine::new("Root", "json");

        let report = engine
            .run(&FakeRemote, &cache, Some(desired_dir.path()))
            .unwrap();

        assert_eq!(report.in_sync(), 2);
        assert_eq!(report.drifted(), 0);
        assert_eq!(report.unmatched(), 0);
        assert!(!report.has_drift());
    }

    #[test]
    fn test_run_ignores_desired_only_templates() {
        let cache_dir = TempDir::new().unwrap();
        let desired_dir = TempDir::new().unwrap();
        write_desired(desired_dir.path(), "tmplA", &json!({"x": 1}));
        write_desired(desired_dir.path(), "tmplB", &json!({"y": 2}));
        write_desired(desired_dir.path(), "retired", &json!({"z": 3}));

        let cache = CacheWriter::new(cache_dir.path(), "Root", "json");
        let engine = ReconcileEngine::new("Root", "json");

        let report = engine
            .run(&FakeRemote, &cache, Some(desired_dir.path()))
            .unwrap();

        // Reconciliation is one-directional: "retired" never appears
        assert_eq!(report.results.len(), 2);
        assert!(report.results.iter().all(|(name, _)| name != "retired"));
    }

    #[test]
    fn test_run_missing_desired_root_is_fatal() {
        let cache_dir = TempDir::new().unwrap();
        let cache = CacheWriter::new(cache_dir.path(), "Root", "json");
        let engine = ReconcileEngine::new("Root", "json");

        let missing = cache_dir.path().join("no-such-tree");
        let result = engine.run(&FakeRemote, &cache, Some(&missing));

        assert!(result.is_err());
    }
}
