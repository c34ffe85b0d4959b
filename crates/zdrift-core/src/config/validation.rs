//! Schema validation of the config document and runtime arguments

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use jsonschema::JSONSchema;
use serde_json::Value;
use tracing::debug;

use crate::document;
use crate::error::{Error, Result};

/// Schema name for the configuration document
pub const CONFIG_SCHEMA: &str = "zdrift.config.json";
/// Schema name for the parsed runtime arguments
pub const ARGS_SCHEMA: &str = "zdrift.args.json";

/// Named schema documents loaded from the validation directory
pub struct SchemaStore {
    schemas: HashMap<String, Value>,
}

impl SchemaStore {
    /// Load every `.json` schema document in `dir`, keyed by file name
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be read and
    /// [`Error::Parse`] if a schema document is not well-formed JSON.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut schemas = HashMap::new();

        let entries = fs::read_dir(dir)
            .map_err(|e| Error::io(format!("reading validation directory {}", dir.display()), e))?;

        for entry in entries {
            let entry = entry
                .map_err(|e| Error::io(format!("reading validation directory {}", dir.display()), e))?;
            let path = entry.path();

            if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let schema = document::load(&path)?;
            debug!("loaded schema {name}");
            schemas.insert(name, schema);
        }

        Ok(Self { schemas })
    }

    /// Validate an instance against a named schema
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the schema is unknown, cannot be
    /// compiled, or the instance violates it. All violations are reported
    /// in one message.
    pub fn validate(&self, name: &str, instance: &Value) -> Result<()> {
        let schema = self
            .schemas
            .get(name)
            .ok_or_else(|| Error::Validation(format!("unknown schema {name}")))?;

        let compiled = JSONSchema::compile(schema)
            .map_err(|e| Error::Validation(format!("schema {name} does not compile: {e}")))?;

        if let Err(violations) = compiled.validate(instance) {
            let detail: Vec<String> = violations.map(|v| v.to_string()).collect();
            return Err(Error::Validation(format!(
                "{name}: {}",
                detail.join("; ")
            )));
        }

        Ok(())
    }
}
