//! Rendering of diff entries and unified document diffs

use std::fmt::Write;

use similar::{ChangeTag, TextDiff};

use super::{Change, DiffEntry};
use crate::document::Document;

const BRIEF_LIMIT: usize = 80;

/// Renders diff entries and unified diffs for the drift report
pub struct DriftRenderer;

impl DriftRenderer {
    /// Create a new renderer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render a list of entries, one line each, indented for the report
    #[must_use]
    pub fn render_entries(entries: &[DiffEntry]) -> String {
        let mut output = String::new();

        for entry in entries {
            output.push_str("  ");
            output.push_str(&Self::render_entry(entry));
            output.push('\n');
        }

        output
    }

    /// Render a single entry as `~ path: old -> new` / `+ path: new` /
    /// `- path: old`
    #[must_use]
    pub fn render_entry(entry: &DiffEntry) -> String {
        match &entry.change {
            Change::Added { new } => format!("+ {}: {}", entry.path, brief(new)),
            Change::Removed { old } => format!("- {}: {}", entry.path, brief(old)),
            Change::Changed { old, new } => {
                format!("~ {}: {} -> {}", entry.path, brief(old), brief(new))
            }
        }
    }

    /// Generate a color-coded unified diff of two pretty-printed documents
    ///
    /// Deletions are lines present only in the current document, insertions
    /// lines present only in the desired one.
    #[must_use]
    pub fn unified(name: &str, current: &Document, desired: &Document) -> String {
        let current_text = format!("{current:#}\n");
        let desired_text = format!("{desired:#}\n");

        const DIFF_CONTEXT_LINES: usize = 3;

        let diff = TextDiff::from_lines(&current_text, &desired_text);

        let mut output = String::new();

        writeln!(output, "\x1b[1m--- {name} (current)\x1b[0m")
            .expect("Writing to String should never fail");
        writeln!(output, "\x1b[1m+++ {name} (desired)\x1b[0m")
            .expect("Writing to String should never fail");

        for (idx, group) in diff.grouped_ops(DIFF_CONTEXT_LINES).iter().enumerate() {
            if idx > 0 {
                output.push_str("...\n");
            }

            for op in group {
                for change in diff.iter_changes(op) {
                    let (sign, color) = match change.tag() {
                        ChangeTag::Delete => ("-", "\x1b[31m"), // Red
                        ChangeTag::Insert => ("+", "\x1b[32m"), // Green
                        ChangeTag::Equal => (" ", "\x1b[0m"),   // No color
                    };

                    let newline = if change.value().ends_with('\n') {
                        ""
                    } else {
                        "\n"
                    };

                    write!(output, "{color}{sign}{}{newline}\x1b[0m", change.value())
                        .expect("Writing to String should never fail");
                }
            }
        }

        output
    }
}

impl Default for DriftRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Compact single-line rendering of a value, truncated for readability
fn brief(value: &Document) -> String {
    let text = value.to_string();

    if text.chars().count() > BRIEF_LIMIT {
        let head: String = text.chars().take(BRIEF_LIMIT - 3).collect();
        format!("{head}...")
    } else {
        text
    }
}
