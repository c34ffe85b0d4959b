//! Recursive structural diff over nested documents

use serde_json::Value;

use super::{Change, DiffEntry};
use crate::document::Document;

/// Compute the structural diff between a current and a desired document
///
/// Objects are compared by key, arrays by index (a length mismatch
/// reports the trailing elements as added or removed), everything else
/// as a scalar leaf. A type mismatch at a path is reported as a single
/// changed leaf carrying both subtrees. Equal documents yield an empty
/// diff.
#[must_use]
pub fn diff(current: &Document, desired: &Document) -> Vec<DiffEntry> {
    let mut entries = Vec::new();
    diff_value("", current, desired, &mut entries);
    entries
}

fn diff_value(path: &str, current: &Value, desired: &Value, entries: &mut Vec<DiffEntry>) {
    match (current, desired) {
        (Value::Object(current_map), Value::Object(desired_map)) => {
            for (key, current_child) in current_map {
                let child_path = join(path, key);
                match desired_map.get(key) {
                    Some(desired_child) => {
                        diff_value(&child_path, current_child, desired_child, entries);
                    }
                    None => entries.push(DiffEntry {
                        path: child_path,
                        change: Change::Removed {
                            old: current_child.clone(),
                        },
                    }),
                }
            }

            for (key, desired_child) in desired_map {
                if !current_map.contains_key(key) {
                    entries.push(DiffEntry {
                        path: join(path, key),
                        change: Change::Added {
                            new: desired_child.clone(),
                        },
                    });
                }
            }
        }
        (Value::Array(current_items), Value::Array(desired_items)) => {
            let shared = current_items.len().min(desired_items.len());

            for index in 0..shared {
                diff_value(
                    &join(path, &index.to_string()),
                    &current_items[index],
                    &desired_items[index],
                    entries,
                );
            }

            for (index, old) in current_items.iter().enumerate().skip(shared) {
                entries.push(DiffEntry {
                    path: join(path, &index.to_string()),
                    change: Change::Removed { old: old.clone() },
                });
            }

            for (index, new) in desired_items.iter().enumerate().skip(shared) {
                entries.push(DiffEntry {
                    path: join(path, &index.to_string()),
                    change: Change::Added { new: new.clone() },
                });
            }
        }
        _ => {
            if current != desired {
                entries.push(DiffEntry {
                    path: path.to_string(),
                    change: Change::Changed {
                        old: current.clone(),
                        new: desired.clone(),
                    },
                });
            }
        }
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}/{segment}")
    }
}
