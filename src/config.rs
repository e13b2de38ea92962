//! `solgraph.toml` configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use solgraph_core::{PLACEHOLDER_KINDS, ResolveOptions};
use solgraph_indexer::LoadOptions;
use solgraph_server::ServerConfig;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "solgraph.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub manifest: ManifestSection,
    pub resolve: ResolveOptions,
    pub server: ServerSection,
    pub watch: WatchSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestSection {
    /// Project type GUIDs skipped when reading the manifest.
    pub excluded_kinds: Vec<String>,
}

impl Default for ManifestSection {
    fn default() -> Self {
        ManifestSection {
            excluded_kinds: PLACEHOLDER_KINDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        let defaults = ServerConfig::default();
        ServerSection {
            host: defaults.host,
            port: defaults.port,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchSection {
    pub enabled: bool,
    pub debounce_ms: u64,
}

impl Default for WatchSection {
    fn default() -> Self {
        WatchSection {
            enabled: true,
            debounce_ms: 300,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The explicit file if given, else `solgraph.toml` next to the
    /// manifest, else defaults.
    pub fn locate(explicit: Option<&Path>, manifest: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        let candidate = manifest
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!("Using config file {}", candidate.display());
            Self::load_file(&candidate)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            excluded_kinds: self.manifest.excluded_kinds.clone(),
            resolve: self.resolve,
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.watch.debounce_ms)
    }
}
