mod cli;
mod logging;

use std::process;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use cli::Cli;
use zdrift_core::api::ApiClient;
use zdrift_core::cache::CacheWriter;
use zdrift_core::config::{ARGS_SCHEMA, ConfigManager, SchemaStore};
use zdrift_core::reconcile::{ReconcileEngine, ReconcileReporter};

fn main() {
    // Set up Ctrl+C handler for graceful interruption
    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        process::exit(130); // Standard exit code for SIGINT
    }) {
        eprintln!("Failed to set Ctrl+C handler: {e}");
    }

    // Argument parsing is an explicit result: help and version print and
    // exit 0, a bad argument prints usage and exits 2
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    if let Err(err) = logging::init(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("Failed to initialise logging: {err}");
        process::exit(1);
    }

    if let Err(err) = run(&cli) {
        error!("{err:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    info!("starting zdrift");

    let schemas =
        SchemaStore::load(&cli.validation_dir).context("Failed to load validation schemas")?;

    let config = ConfigManager::load(cli.config.as_deref(), &schemas)
        .context("Failed to load configuration")?;

    let args_document = serde_json::to_value(cli).context("Failed to serialize arguments")?;
    schemas
        .validate(ARGS_SCHEMA, &args_document)
        .context("Runtime arguments failed validation")?;

    let mut client = ApiClient::new(config.remote.url.clone())?;
    client.login(&config.remote.username, &config.remote.password)?;
    info!("connected to Zabbix API {}", client.api_version()?);

    let cache = CacheWriter::new(
        config.cache.dir.clone(),
        config.remote.root_group.clone(),
        config.cache.extension.clone(),
    );
    let engine = ReconcileEngine::new(
        config.remote.root_group.clone(),
        config.cache.extension.clone(),
    );

    // An empty DESIRED_DIR argument means snapshot-only, same as omitting it
    let desired_root = cli
        .desired_dir
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty());

    let report = engine.run(&client, &cache, desired_root)?;

    let rendered = ReconcileReporter::generate_report(&report, cli.verbose);
    println!("{rendered}");

    Ok(())
}
