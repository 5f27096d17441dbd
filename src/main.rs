mod cli;
mod config;
mod contracts;
mod error;
mod models;
mod services;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use crate::cli::{Cli, LogLevel, Report};
use crate::config::AppConfig;
use crate::contracts::execution::{AlloyClientFactory, SignedAccount};
use crate::contracts::ChainRegistry;
use crate::error::StarportError;
use crate::services::StarportService;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.unwrap_or(LogLevel::Info));

    let code = match run(cli).await {
        Ok(report) => {
            println!("{}", report.to_json());
            report.exit_code()
        }
        Err(e) => {
            error!("❌ {:#}", e);
            e.downcast_ref::<StarportError>()
                .map(StarportError::exit_code)
                .unwrap_or(1)
        }
    };

    std::process::exit(code);
}

fn init_tracing(level: LogLevel) {
    let level: LevelFilter = level.into();
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<Report> {
    let invocation = cli.invocation()?;
    info!("Starting Starport CLI");

    let config = AppConfig::load(cli.config.as_deref())
        .map_err(|e| StarportError::InvalidConfig(format!("{:#}", e)))?;
    info!("Configuration loaded successfully");

    let registry = ChainRegistry::from_config(&config);
    let mut service =
        StarportService::new(registry, &config.settings, Arc::new(AlloyClientFactory));

    service.resolve(invocation.chain())?;
    if invocation.needs_signer() {
        let private_key = config.settings.load_private_key()?;
        service = service.with_account(SignedAccount::from_private_key(&private_key)?);
    }

    Ok(cli::dispatch(invocation, &service).await?)
}
