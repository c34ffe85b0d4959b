use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

/// Zabbix Template Drift Detection Tool
///
/// Exports and caches every template under the configured root group, and
/// reports structural drift against a desired-state directory of JSON files
#[derive(Parser, Debug, Serialize)]
#[command(name = "zdrift")]
#[command(long_about = None, version)]
pub struct Cli {
    /// Desired-state directory (omit for snapshot-only mode)
    #[arg(value_name = "DESIRED_DIR")]
    pub desired_dir: Option<PathBuf>,

    /// Use specific config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the schema documents for config and argument validation
    #[arg(long, value_name = "PATH", default_value = "etc/validation")]
    pub validation_dir: PathBuf,

    /// Also write a debug-level log to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose output (unified diffs for drifted templates)
    #[arg(short, long)]
    pub verbose: bool,
}
