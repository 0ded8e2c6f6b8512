//! ncmirror
//!
//! Keeps a local directory in step with the public netCDF and composite
//! resources of an iRODS-backed repository.

mod cli;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;
use mirror_core::{ConfigLayer, MirrorConfig, SyncEngine};
use mirror_remote::IrodsClient;

use cli::Cli;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let config = load_config(&cli)?;
    let remote = match &cli.icommands_dir {
        Some(dir) => IrodsClient::with_icommands_dir(dir),
        None => IrodsClient::new(),
    };
    let engine = SyncEngine::new(remote, config)?.with_options(cli.sync_options());

    let report = match cli.resource_id() {
        Some(id) => engine.sync_one(id)?,
        None => engine.sync_all()?,
    };

    if cli.json {
        output::print_json(&report)?;
    } else {
        output::print_report(&report);
    }

    if !report.success() {
        return Err(CliError::SyncFailed {
            failed: report.failures.len(),
        });
    }
    Ok(())
}

/// Global config file, then `--config`, then arguments and environment.
fn load_config(cli: &Cli) -> Result<MirrorConfig> {
    let mut layer = ConfigLayer::load_global(None)?.unwrap_or_default();
    if let Some(path) = &cli.config {
        tracing::debug!(path = %path.display(), "loading config file");
        layer = layer.overlay(ConfigLayer::load(path)?);
    }
    Ok(layer.overlay(cli.config_layer()).resolve()?)
}
