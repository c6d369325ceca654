//! Folio - a markdown post corpus loader and front-matter indexer.

mod build;
mod cli;
mod config;
mod corpus;
mod logger;
mod utils;

use anyhow::Result;
use build::{build_index, check_corpus};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use std::path::Path;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static Config = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Build { .. } => build_index(config),
        Commands::Check { .. } => check_corpus(config),
    }
}

/// Load and validate configuration from CLI arguments.
///
/// The config file is optional; defaults apply when it is absent.
fn load_config(cli: &'static Cli) -> Result<Config> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        Config::from_path(&config_path)?
    } else {
        Config::default()
    };
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}
