use common::types::config::{Config, StoreName};
use log::info;
use std::fmt::{Display, Formatter};
use std::fs::{create_dir_all, File};
use std::io;
use std::path::{Path, PathBuf};

/// Read the user config at `path`; a missing file gives the defaults.
pub(super) fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        info!(target: "config", "No config file at {path:?}; using defaults");
        return Ok(Config::default());
    }

    let config_file = File::open(path)?;
    let config: Config = serde_json::from_reader(config_file)?;

    info!(target: "config", "Config read successfully from {path:?}");

    Ok(config)
}

pub(super) fn save_config(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let config_file = File::create(path)?;
    serde_json::to_writer_pretty(config_file, config)?;

    info!(target: "config", "Config written to {path:?}");

    Ok(())
}

/// Update one `key` of `config`. `store.{MAINTAINER}` keys take `local` or `registry`.
pub(super) fn set_value(config: &mut Config, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "cache_path" => config.cache_path = PathBuf::from(value),
        "data_path" => config.data_path = PathBuf::from(value),
        "registry_remote_url" => config.registry_remote_url = value.to_string(),
        _ => {
            let Some(maintainer) = key.strip_prefix("store.").filter(|m| !m.is_empty()) else {
                return Err(ConfigError::UnknownKey(key.to_string()));
            };
            let store = match value {
                "local" => StoreName::Local,
                "registry" => StoreName::Registry,
                _ => return Err(ConfigError::InvalidValue(key.to_string(), value.to_string())),
            };
            config.store.insert(maintainer.to_string(), store);
        }
    }

    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    IO(#[from] io::Error),
    Json(#[from] serde_json::Error),
    UnknownKey(String),
    InvalidValue(String, String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IO(err) => write!(f, "{}", err),
            ConfigError::Json(err) => write!(f, "{}", err),
            ConfigError::UnknownKey(key) => write!(f, "Unknown config key '{}'", key),
            ConfigError::InvalidValue(key, value) => write!(f, "Invalid value '{}' for '{}'", value, key),
        }
    }
}
