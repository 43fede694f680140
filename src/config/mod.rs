mod file_config;

pub use file_config::FileConfig;

use crate::server::{config::DEFAULT_MAX_BODY_BYTES, RequestsLoggingLevel, ServerConfig};
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = crate::server::config::DEFAULT_PORT;
pub const DEFAULT_DB_PATH: &str = "local.db";

/// CLI arguments that can be overridden by the TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub bind_address: IpAddr,
    pub db_path: PathBuf,
    pub demo_albums: bool,
    pub logging_level: RequestsLoggingLevel,
    pub max_body_bytes: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            demo_albums: true,
            logging_level: RequestsLoggingLevel::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub bind_address: IpAddr,
    pub db_path: PathBuf,
    pub demo_albums: bool,
    pub logging_level: RequestsLoggingLevel,
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = match file.port {
            Some(port) => validate_port(port)?,
            None => cli.port,
        };

        let bind_address = match file.bind_address {
            Some(address) => address
                .parse::<IpAddr>()
                .map_err(|_| anyhow!("bind_address is invalid. Currently set to: `{}`", address))?,
            None => cli.bind_address,
        };

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.db_path.clone());
        if db_path.is_dir() {
            bail!("db_path points to a directory: {:?}", db_path);
        }

        let demo_albums = file.demo_albums.unwrap_or(cli.demo_albums);

        let logging_level = match file.logging_level {
            Some(level) => parse_logging_level(&level)
                .ok_or_else(|| anyhow!("Unknown logging_level `{}`", level))?,
            None => cli.logging_level.clone(),
        };

        let max_body_bytes = file.max_body_bytes.unwrap_or(cli.max_body_bytes);
        if max_body_bytes == 0 {
            bail!("max_body_bytes must be greater than zero");
        }

        Ok(Self {
            port,
            bind_address,
            db_path,
            demo_albums,
            logging_level,
            max_body_bytes,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            bind_address: self.bind_address,
            port: self.port,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

fn validate_port(port: i64) -> Result<u16> {
    match u16::try_from(port) {
        Ok(port) if port > 0 => Ok(port),
        _ => bail!("listenPort is invalid. Currently set to: `{}`", port),
    }
}

/// Parses the listen port as given on the command line or in `listenPort`.
pub fn parse_port(s: &str) -> Result<u16> {
    let port = s
        .trim()
        .parse::<i64>()
        .map_err(|_| anyhow!("listenPort is invalid. Currently set to: `{}`", s))?;
    validate_port(port)
}

/// Parses a logging level string into RequestsLoggingLevel.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
