//! Logging setup for console and optional file output

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber once at process start.
///
/// Console output goes to stderr at INFO (DEBUG with `--verbose`),
/// overridable via the `RUST_LOG` environment variable. When a log file
/// is given it additionally receives DEBUG-level output without ANSI
/// colors; the file handle lives as long as the process and is flushed
/// as it is written.
pub fn init(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let console_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_filter(console_filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory {}", parent.display())
                })?;
            }

            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .with_filter(LevelFilter::DEBUG);

            tracing_subscriber::registry()
                .with(console_layer)
                .with(file_layer)
                .try_init()?;
        }
        None => {
            tracing_subscriber::registry()
                .with(console_layer)
                .try_init()?;
        }
    }

    Ok(())
}
