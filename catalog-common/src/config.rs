//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "CATALOG_ROOT_FOLDER";

/// Directory name used under the platform config/data directories
const APP_DIR: &str = "composer-catalog";

/// Database file name inside the root folder
const DATABASE_FILE: &str = "catalog.db";

/// Optional settings read from `config.toml`
///
/// Every field is optional; command-line arguments and environment
/// variables take precedence over anything found here.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub rate_limit_per_minute: Option<u32>,
    pub static_dir: Option<PathBuf>,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load from the platform config file.
    ///
    /// A missing file yields defaults silently; an unreadable or malformed
    /// file yields defaults with a warning. Startup never fails here.
    pub fn load() -> Self {
        match config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path, with the same fallback rules as [`TomlConfig::load`]
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                warn!("Ignoring malformed config file {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                warn!("Could not read config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Root folder resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. `CATALOG_ROOT_FOLDER` environment variable
/// 3. `root_folder` key of the TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// Path of the catalog database inside a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE)
}

/// Platform config file location (`~/.config/composer-catalog/config.toml` on Linux)
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("./composer_catalog_data"))
}
