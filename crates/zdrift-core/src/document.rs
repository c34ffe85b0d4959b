//! Loading and parsing of configuration documents
//!
//! A document is the full exported configuration of a template: an
//! arbitrarily nested JSON value. The same representation is used for
//! remote exports, desired-state files, and the tool's own configuration
//! file. Loading performs no caching and no retries; callers own both.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// A parsed configuration document
///
/// The tagged-variant shape of [`serde_json::Value`]
/// (null/bool/number/string/array/object) is what the structural diff
/// recurses over.
pub type Document = Value;

/// Load and parse a document from a file on disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Parse`]
/// if its content is not well-formed JSON.
pub fn load(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("reading {}", path.display()), e))?;

    parse(&text, &path.display().to_string())
}

/// Parse a document from raw text
///
/// `context` names the source of the text (a file path or a template
/// name) for error reporting.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the text is not well-formed JSON.
pub fn parse(text: &str, context: &str) -> Result<Document> {
    serde_json::from_str(text).map_err(|e| Error::parse(context, e))
}

/// Derive a template name from a desired-state file path
///
/// The name is the file stem: `desired/Linux servers.json` names the
/// template `Linux servers`.
#[must_use]
pub fn template_name(path: &Path) -> Option<String> {
    path.file_stem().map(|stem| stem.to_string_lossy().into_owned())
}
