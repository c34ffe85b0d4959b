//! Namespace discovery for the remote template hierarchy
//!
//! Enumerates every group under the configured root group and every
//! template within those groups, producing the handles the
//! reconciliation engine fetches and caches. Groups are processed in
//! ascending lexicographic name order so that cache-write side effects
//! are deterministic across runs.

use tracing::debug;

use crate::api::{Group, TemplateSource};
use crate::error::Result;

/// A discovered template with its owning group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    /// Template name, the join key between current and desired state
    pub name: String,
    /// Opaque remote identifier, used only for export
    pub id: String,
    /// Group the template was enumerated under
    pub group: Group,
}

/// Discovers the template namespace under a root group
pub struct NamespaceDiscoverer {
    root_group: String,
}

impl NamespaceDiscoverer {
    /// Create a discoverer scoped to the given root group
    #[must_use]
    pub fn new(root_group: impl Into<String>) -> Self {
        Self {
            root_group: root_group.into(),
        }
    }

    /// Enumerate all templates in groups matching the root group
    ///
    /// A group is included iff its name contains the root-group name as a
    /// case-sensitive substring, mirroring the remote system's own filter
    /// semantics. Template order within a group is whatever the remote
    /// returns.
    ///
    /// # Errors
    ///
    /// Any remote failure propagates unmodified; there is no retry and no
    /// partial result.
    pub fn discover(&self, source: &dyn TemplateSource) -> Result<Vec<TemplateRef>> {
        let mut groups: Vec<Group> = source
            .list_groups()?
            .into_iter()
            .filter(|group| group.name.contains(&self.root_group))
            .collect();

        groups.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("discovered {} matching groups", groups.len());

        let mut templates = Vec::new();
        for group in groups {
            let listed = source.list_templates(&group.id)?;
            debug!(
                "group {} ({}) holds {} templates",
                group.name,
                group.id,
                listed.len()
            );

            for summary in listed {
                templates.push(TemplateRef {
                    name: summary.name,
                    id: summary.id,
                    group: group.clone(),
                });
            }
        }

        Ok(templates)
    }
}
