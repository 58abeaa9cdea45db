//! catalog-api configuration
//!
//! Command-line arguments (with environment fallbacks) layered over the
//! optional TOML config file, layered over compiled defaults.

use catalog_common::config::{database_path, resolve_root_folder, TomlConfig};
use catalog_common::{Error, Result};
use clap::Parser;
use std::num::NonZeroU32;
use std::path::PathBuf;

use crate::rate_limit::DEFAULT_REQUESTS_PER_MINUTE;

/// Default listening port
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind host (all interfaces, IPv6 and IPv4 where dual-stack)
pub const DEFAULT_HOST: &str = "::";

/// Command-line arguments for catalog-api
#[derive(Parser, Debug, Default)]
#[command(name = "catalog-api")]
#[command(about = "Composer catalog HTTP service")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "CATALOG_PORT")]
    pub port: Option<u16>,

    /// Generic `PORT` from the hosting environment, used when `--port` and
    /// `CATALOG_PORT` are both unset
    #[arg(long = "env-port", env = "PORT", hide = true)]
    pub env_port: Option<u16>,

    /// Host or address to bind
    #[arg(long, env = "CATALOG_HOST")]
    pub host: Option<String>,

    /// Root folder holding the database (also read from CATALOG_ROOT_FOLDER)
    #[arg(short, long)]
    pub root_folder: Option<PathBuf>,

    /// Database file, overriding <root_folder>/catalog.db
    #[arg(long, env = "CATALOG_DATABASE_PATH")]
    pub database: Option<PathBuf>,

    /// Directory of static assets to serve
    #[arg(long, env = "CATALOG_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Requests allowed per minute across all clients
    #[arg(long, env = "CATALOG_RATE_LIMIT_PER_MINUTE")]
    pub rate_limit: Option<NonZeroU32>,

    /// TOML config file, overriding the platform default location
    #[arg(long, env = "CATALOG_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub rate_limit_per_minute: NonZeroU32,
}

impl ServiceConfig {
    /// Merge arguments over TOML over defaults
    pub fn resolve(args: Args, toml: TomlConfig) -> Result<Self> {
        let database_path = match args.database {
            Some(path) => path,
            None => database_path(&resolve_root_folder(args.root_folder.as_deref(), &toml)),
        };

        let rate_limit_per_minute = match args.rate_limit {
            Some(limit) => limit,
            None => {
                let raw = toml.rate_limit_per_minute.unwrap_or(DEFAULT_REQUESTS_PER_MINUTE);
                NonZeroU32::new(raw).ok_or_else(|| {
                    Error::Config("rate_limit_per_minute must be greater than zero".to_string())
                })?
            }
        };

        Ok(Self {
            host: args
                .host
                .or(toml.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args
                .port
                .or(args.env_port)
                .or(toml.port)
                .unwrap_or(DEFAULT_PORT),
            database_path,
            static_dir: args.static_dir.or(toml.static_dir),
            rate_limit_per_minute,
        })
    }
}
