pub mod cli;
pub mod config;
pub mod converter;
pub mod currency;
pub mod log;
pub mod notify;
pub mod providers;
pub mod rate_provider;
pub mod rates;

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::providers::table::TableRateProvider;

/// Commands the library can run on behalf of the CLI.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Convert {
        amount: Option<String>,
        from: Option<String>,
        to: Option<String>,
    },
    Rates {
        base: Option<String>,
    },
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let catalog = Arc::new(config.catalog()?);
    let table = Arc::new(config.rate_table()?);
    let provider = TableRateProvider::new(Arc::clone(&table), config.missing_rate);

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&config, catalog, table, provider, amount, from, to).await
        }
        AppCommand::Rates { base } => cli::rates::run(&config, &catalog, &provider, base).await,
        AppCommand::Currencies => cli::currencies::run(&catalog),
    }
}
