mod bootstrap_config;
mod commands;
mod config;

use crate::config::load_config;
use bootstrap_config::BootstrapConfig;
use common::util::logging;
use data_harvester::fetch::FetchError;
use log::{debug, error, SetLoggerError};
use std::fmt::{Display, Formatter};
use std::process::ExitCode;
use store::StoreError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(target: "main", "{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), TdcError> {
    let bootstrap_config = BootstrapConfig::read();

    logging::initialize_logging(bootstrap_config.log_level.clone().into())?;

    let config_path = bootstrap_config.config_path();
    let mut config = load_config(&config_path)?;
    debug!(target: "main", "Local store at {}", config.local_path().display());

    commands::run(bootstrap_config.command, &mut config, &config_path).await
}

#[derive(thiserror::Error, Debug)]
pub enum TdcError {
    Logging(#[from] SetLoggerError),
    Config(#[from] config::ConfigError),
    Store(#[from] StoreError),
    Fetch(#[from] FetchError),
}

impl Display for TdcError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let err: &dyn Display = match self {
            TdcError::Logging(err) => err,
            TdcError::Config(err) => err,
            TdcError::Store(err) => err,
            TdcError::Fetch(err) => err,
        };
        let prefix = match self {
            TdcError::Logging(_) => "Initializing logging",
            TdcError::Config(_) => "Reading config file",
            TdcError::Store(_) => "Accessing store",
            TdcError::Fetch(_) => "Fetching remote file",
        };
        write!(f, "{}: {}", prefix, err)
    }
}
