//! Configuration loading, discovery, and schema validation
//!
//! This module handles:
//! - Config file discovery from the CLI flag, the working tree, and XDG
//! - JSON parsing with serde
//! - Schema validation of the config document and runtime arguments

mod discovery;
mod types;
mod validation;

pub use discovery::ConfigDiscovery;
pub use types::{CacheConfig, Config, RemoteConfig};
pub use validation::{ARGS_SCHEMA, CONFIG_SCHEMA, SchemaStore};

use std::path::Path;

use tracing::debug;

use crate::document;
use crate::error::{Error, Result};

/// Coordinates discovery, schema validation, and parsing of the
/// configuration document
pub struct ConfigManager;

impl ConfigManager {
    /// Create a new configuration manager
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Discover, validate, and parse the configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if no config file can be found or
    /// the document fails its schema, and the loader's errors if it
    /// cannot be read or parsed.
    pub fn load(cli_path: Option<&Path>, schemas: &SchemaStore) -> Result<Config> {
        let Some(path) = ConfigDiscovery::discover(cli_path).resolve() else {
            return Err(Error::Validation(
                "no configuration file found (pass --config or create etc/config/zdrift.config.json)"
                    .to_string(),
            ));
        };

        debug!("loading configuration from {}", path.display());
        let raw = document::load(&path)?;

        schemas.validate(CONFIG_SCHEMA, &raw)?;

        serde_json::from_value(raw).map_err(|e| Error::parse(path.display().to_string(), e))
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
