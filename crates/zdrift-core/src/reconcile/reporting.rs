//! Drift report rendering and run statistics

use std::fmt::Write;

use super::{DiffResult, RunReport};
use crate::comparison::DriftRenderer;

/// Drift report generator
pub struct ReconcileReporter;

impl ReconcileReporter {
    /// Create a new reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generate the full report: per-template results plus the summary
    ///
    /// With `verbose` set, drifted templates additionally get a unified
    /// diff of their pretty-printed documents.
    #[must_use]
    pub fn generate_report(report: &RunReport, verbose: bool) -> String {
        let mut output = String::new();

        for (name, result) in &report.results {
            match result {
                DiffResult::Matched { entries } if entries.is_empty() => {
                    writeln!(output, "{name}: in sync")
                        .expect("Writing to String should never fail");
                }
                DiffResult::Matched { entries } => {
                    writeln!(output, "{name}: drift ({} changes)", entries.len())
                        .expect("Writing to String should never fail");
                    output.push_str(&DriftRenderer::render_entries(entries));

                    if verbose {
                        if let (Some(current), Some(desired)) = (
                            report.current.get(name),
                            report.desired.as_ref().and_then(|d| d.get(name)),
                        ) {
                            output.push_str(&DriftRenderer::unified(name, current, desired));
                        }
                    }
                }
                DiffResult::Unmatched => {
                    writeln!(output, "{name}: unmatched (no desired-state file)")
                        .expect("Writing to String should never fail");
                }
            }
        }

        output.push_str(&Self::generate_summary(report));
        output
    }

    /// Generate the summary block
    #[must_use]
    pub fn generate_summary(report: &RunReport) -> String {
        let mut output = String::new();

        output.push_str("\n=== Reconciliation Summary ===\n");
        output.push_str(&format!("Cached:    {}\n", report.cached()));

        if report.is_snapshot_only() {
            output.push_str("Status: snapshot only (no desired state configured)\n");
            return output;
        }

        output.push_str(&format!("In sync:   {}\n", report.in_sync()));
        output.push_str(&format!("Drifted:   {}\n", report.drifted()));
        output.push_str(&format!("Unmatched: {}\n", report.unmatched()));

        if report.has_drift() {
            output.push_str("Status: ✗ Drift detected\n");
        } else {
            output.push_str("Status: ✓ No drift detected\n");
        }

        output
    }
}
