use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_REGISTRY_REMOTE_URL: &str = "https://github.com/transport-data/registry.git";

/// Name of a sub-store of the union store.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreName {
    #[default]
    Local,
    Registry,
}

impl Display for StoreName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StoreName::Local => write!(f, "local"),
            StoreName::Registry => write!(f, "registry"),
        }
    }
}

/// User configuration, read from `config.json` in the user config directory.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Downloaded remote files
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    /// Parent of the local store and the registry clone
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_registry_remote_url")]
    pub registry_remote_url: String,
    /// Maintainer ID → sub-store. Unmapped maintainers use the local store.
    #[serde(default = "default_store_map")]
    pub store: BTreeMap<String, StoreName>,
}

impl Config {
    pub fn local_path(&self) -> PathBuf {
        self.data_path.join("local")
    }

    pub fn registry_path(&self) -> PathBuf {
        self.data_path.join("registry")
    }

    pub fn store_for(&self, maintainer: &str) -> StoreName {
        self.store.get(maintainer).copied().unwrap_or_default()
    }

    /// A configuration with every path below `root`, used by tests and for
    /// throwaway stores.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            cache_path: root.join("cache"),
            data_path: root.join("data"),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            data_path: default_data_path(),
            registry_remote_url: default_registry_remote_url(),
            store: default_store_map(),
        }
    }
}

fn user_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(std::env::temp_dir).join("transport-data")
}

fn default_cache_path() -> PathBuf {
    user_dir(dirs::cache_dir())
}

fn default_data_path() -> PathBuf {
    user_dir(dirs::data_dir())
}

fn default_registry_remote_url() -> String {
    DEFAULT_REGISTRY_REMOTE_URL.to_string()
}

fn default_store_map() -> BTreeMap<String, StoreName> {
    BTreeMap::from([("TDCI".to_string(), StoreName::Registry)])
}

/// Default location of `config.json`.
pub fn default_config_file() -> PathBuf {
    user_dir(dirs::config_dir()).join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"store": {"TEST": "registry"}}"#).unwrap();

        assert_eq!(DEFAULT_REGISTRY_REMOTE_URL, config.registry_remote_url);
        assert_eq!(StoreName::Registry, config.store_for("TEST"));
        assert_eq!(StoreName::Local, config.store_for("TDCI"));
        assert_eq!(StoreName::Local, config.store_for("OTHER"));
    }

    #[test]
    fn test_default_routing() {
        let config = Config::rooted_at("/tmp/tdc");
        assert_eq!(StoreName::Registry, config.store_for("TDCI"));
        assert_eq!(PathBuf::from("/tmp/tdc/data/registry"), config.registry_path());
        assert_eq!(PathBuf::from("/tmp/tdc/data/local"), config.local_path());
    }
}
