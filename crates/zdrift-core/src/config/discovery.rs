//! Configuration file discovery from multiple locations

use std::path::{Path, PathBuf};

const PROJECT_CONFIG: &str = "etc/config/zdrift.config.json";

/// Configuration file locations in order of precedence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFiles {
    /// Config from CLI flag (highest precedence)
    pub cli: Option<PathBuf>,
    /// Project config (`etc/config/zdrift.config.json`, searched upward)
    pub project: Option<PathBuf>,
    /// Global XDG config
    pub global: Option<PathBuf>,
}

impl ConfigFiles {
    /// The highest-precedence config file that exists, if any
    #[must_use]
    pub fn resolve(self) -> Option<PathBuf> {
        self.cli.or(self.project).or(self.global)
    }
}

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Create a new config discovery instance
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Discover all available configuration files
    ///
    /// Returns a [`ConfigFiles`] struct with paths to discovered configs.
    #[must_use]
    pub fn discover(cli_path: Option<&Path>) -> ConfigFiles {
        let cli = cli_path.and_then(|p| {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                None
            }
        });

        let project = Self::find_file(PROJECT_CONFIG);
        let global = Self::find_global_config();

        ConfigFiles {
            cli,
            project,
            global,
        }
    }

    /// Find a config file in the current directory or parent directories
    fn find_file(name: &str) -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let candidate = current.join(name);
            if candidate.exists() && candidate.is_file() {
                return Some(candidate);
            }

            // Move to parent directory
            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Find global config in XDG config directory
    fn find_global_config() -> Option<PathBuf> {
        let config_dir = dirs::config_dir()?;
        let global_config = config_dir.join("zdrift").join("config.json");

        if global_config.exists() && global_config.is_file() {
            Some(global_config)
        } else {
            None
        }
    }
}
