use clap::{Parser, Subcommand};
use common::types::config::default_config_file;
use common::types::version::Increment;
use log::LevelFilter;
use std::path::PathBuf;

/// Transport Data Commons tools.
#[derive(Parser, Clone)]
#[command(name = "tdc", version, about)]
pub struct BootstrapConfig {
    /// User config file [default: {user config dir}/transport-data/config.json]
    #[clap(short('c'), long("config"), env("TDC_CONFIG"))]
    pub config_file: Option<PathBuf>,
    #[clap(short('l'), long("log-level"), env("TDC_LOG_LEVEL"), default_value_t, value_enum)]
    pub log_level: LogLevel,
    #[command(subcommand)]
    pub command: Command,
}

impl BootstrapConfig {
    pub fn read() -> Self {
        BootstrapConfig::parse()
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_file.clone().unwrap_or_else(default_config_file)
    }
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Command {
    /// Manipulate the local store and the registry
    #[command(subcommand)]
    Store(StoreCommand),
    /// Show or change the user config
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Download a remote file into the cache
    Fetch {
        /// Provider ID, used as the cache subdirectory
        provider: String,
        url: String,
        /// Download again even if a cached copy exists
        #[arg(long)]
        force: bool,
    },
    /// Information about TDCI itself
    #[command(subcommand)]
    Org(OrgCommand),
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum StoreCommand {
    /// Clone the registry into the data directory
    Clone,
    /// List stored artefacts of one maintainer
    List {
        #[arg(long)]
        maintainer: String,
    },
    /// Show one artefact, given a full or partial URN
    Show { urn: String },
    /// Copy an artefact from the local store into the registry
    AddToRegistry { urn: String },
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum ConfigCommand {
    Show,
    /// Set KEY: cache_path, data_path, registry_remote_url or store.<MAINTAINER>
    Set { key: String, value: String },
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum OrgCommand {
    /// Regenerate and store the TDCI agency scheme
    Refresh {
        /// Store under a new version; a bare flag bumps the minor version
        #[arg(long, value_enum, num_args = 0..=1, default_missing_value = "minor")]
        increment: Option<IncrementLevel>,
    },
    /// List registered data providers and the structures they provide
    Providers,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum IncrementLevel {
    Major,
    Minor,
    Patch,
}

impl From<IncrementLevel> for Increment {
    fn from(value: IncrementLevel) -> Self {
        match value {
            IncrementLevel::Major => Increment::MAJOR,
            IncrementLevel::Minor => Increment::MINOR,
            IncrementLevel::Patch => Increment::PATCH,
        }
    }
}

/// The increment requested by an optional `--increment` flag.
pub fn increment_for(level: Option<IncrementLevel>) -> Increment {
    level.map_or(Increment::NONE, Increment::from)
}

#[derive(clap::ValueEnum, Clone, Default)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}
