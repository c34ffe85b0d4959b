//! Reconciliation orchestration - coordinates the run workflow

use std::path::Path;

use tracing::{info, warn};

use super::{DiffResult, RunReport, StateMap};
use crate::api::TemplateSource;
use crate::cache::CacheWriter;
use crate::comparison;
use crate::discovery::NamespaceDiscoverer;
use crate::document;
use crate::error::{Error, Result};
use crate::walker::TreeWalker;

/// Main reconciliation engine
pub struct ReconcileEngine {
    root_group: String,
    extension: String,
}

impl ReconcileEngine {
    /// Create an engine for the given root group and file extension
    #[must_use]
    pub fn new(root_group: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            root_group: root_group.into(),
            extension: extension.into(),
        }
    }

    /// Execute a full run: discover, export, cache, and reconcile
    ///
    /// With no desired root the run stops after caching (snapshot-only
    /// mode) and the report carries no results.
    ///
    /// # Errors
    ///
    /// The first remote, parse, or I/O failure aborts the run; the cache
    /// may be left partially written.
    pub fn run(
        &self,
        source: &dyn TemplateSource,
        cache: &CacheWriter,
        desired_root: Option<&Path>,
    ) -> Result<RunReport> {
        let discoverer = NamespaceDiscoverer::new(self.root_group.as_str());
        let templates = discoverer.discover(source)?;
        info!("discovered {} templates under {}", templates.len(), self.root_group);

        let mut current = StateMap::new();
        for template in templates {
            info!("exporting {} ({})", template.name, template.id);

            let raw = source.export_template(&template.id)?;
            let parsed = document::parse(&raw, &template.name)?;

            cache.write(&template.group.name, &template.name, &parsed)?;

            if current.insert(template.name.clone(), parsed).is_some() {
                warn!(
                    "duplicate template name {}, keeping the last export",
                    template.name
                );
            }
        }

        let (desired, results) = match desired_root {
            None => {
                info!("no desired-state root given, snapshot only");
                (None, Vec::new())
            }
            Some(root) => {
                let desired = self.load_desired(root)?;
                let results = Self::reconcile(&current, &desired);
                (Some(desired), results)
            }
        };

        Ok(RunReport {
            current,
            desired,
            results,
        })
    }

    /// Load the desired-state tree into a state map
    fn load_desired(&self, root: &Path) -> Result<StateMap> {
        if !root.is_dir() {
            return Err(Error::io(
                format!("desired-state root {}", root.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        let outcome = TreeWalker::new(self.extension.as_str()).walk(root);
        for anomaly in &outcome.anomalies {
            warn!("{anomaly}");
        }

        let mut desired = StateMap::new();
        for path in outcome.files {
            let Some(name) = document::template_name(&path) else {
                continue;
            };

            let parsed = document::load(&path)?;
            if desired.insert(name.clone(), parsed).is_some() {
                warn!(
                    "duplicate desired-state file for {name}, keeping {}",
                    path.display()
                );
            }
        }

        Ok(desired)
    }

    /// Match current state against desired state by template name
    ///
    /// Iterates `current` in its population order. Names present only in
    /// `desired` yield no result.
    #[must_use]
    pub fn reconcile(current: &StateMap, desired: &StateMap) -> Vec<(String, DiffResult)> {
        current
            .iter()
            .map(|(name, current_document)| {
                let result = match desired.get(name) {
                    Some(desired_document) => DiffResult::Matched {
                        entries: comparison::diff(current_document, desired_document),
                    },
                    None => DiffResult::Unmatched,
                };
                (name.clone(), result)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::Change;
    use serde_json::json;

    fn state(pairs: &[(&str, serde_json::Value)]) -> StateMap {
        pairs
            .iter()
            .map(|(name, document)| ((*name).to_string(), document.clone()))
            .collect()
    }

    #[test]
    fn test_reconcile_empty_desired_is_all_unmatched() {
        let current = state(&[("tmplA", json!({"x": 1})), ("tmplB", json!({"y": 2}))]);
        let desired = StateMap::new();

        let results = ReconcileEngine::reconcile(&current, &desired);

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|(_, r)| *r == DiffResult::Unmatched));
    }

    #[test]
    fn test_reconcile_identical_states_is_all_in_sync() {
        let pairs = [("tmplA", json!({"x": 1})), ("tmplB", json!({"y": 2}))];
        let current = state(&pairs);
        let desired = state(&pairs);

        let results = ReconcileEngine::reconcile(&current, &desired);

        assert!(results
            .iter()
            .all(|(_, r)| matches!(r, DiffResult::Matched { entries } if entries.is_empty())));
    }

    #[test]
    fn test_reconcile_mixed_scenario() {
        let current = state(&[("tmplA", json!({"x": 1})), ("tmplB", json!({"y": 2}))]);
        let desired = state(&[("tmplA", json!({"x": 2}))]);

        let results = ReconcileEngine::reconcile(&current, &desired);

        assert_eq!(results.len(), 2);

        match &results[0] {
            (name, DiffResult::Matched { entries }) => {
                assert_eq!(name, "tmplA");
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].path, "x");
                assert_eq!(
                    entries[0].change,
                    Change::Changed {
                        old: json!(1),
                        new: json!(2)
                    }
                );
            }
            other => panic!("unexpected result {other:?}"),
        }

        assert_eq!(results[1], ("tmplB".to_string(), DiffResult::Unmatched));
    }

    #[test]
    fn test_reconcile_preserves_current_population_order() {
        let current = state(&[
            ("zeta", json!(1)),
            ("alpha", json!(2)),
            ("mid", json!(3)),
        ]);
        let desired = StateMap::new();

        let results = ReconcileEngine::reconcile(&current, &desired);

        let names: Vec<&str> = results.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }
}
