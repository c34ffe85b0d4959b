//! Configuration types and structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Remote API connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// API endpoint URL (the `api_jsonrpc.php` address)
    pub url: String,
    /// Login name
    pub username: String,
    /// Login password, passed through to the API untouched
    pub password: String,
    /// Root group name; only groups containing this name are reconciled
    pub root_group: String,
}

/// Cache layout settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory the current-state tree is mirrored under
    pub dir: PathBuf,
    /// File extension for cache entries and desired-state files
    pub extension: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("var/cache"),
            extension: "json".to_string(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Remote connection settings
    pub remote: RemoteConfig,
    /// Cache layout settings
    #[serde(default)]
    pub cache: CacheConfig,
}
