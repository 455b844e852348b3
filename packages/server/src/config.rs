use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use vlo_core::{DatabaseSetup, Error, MetadataValues, RepositoryInfo, Result};

use crate::cli::Cli;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Upper bound on handling one request, reading and writing included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub request_timeout: Duration,
    pub repository: RepositoryInfo,
    pub metadata: MetadataValues,
    pub database: DatabaseSetup,
}

fn parse_listen_addr(value: &str) -> Result<SocketAddr> {
    value
        .parse()
        .map_err(|e| Error::Config(format!("invalid LISTEN_ADDR '{value}': {e}")))
}

fn parse_timeout(value: &str) -> Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::Config(format!(
            "invalid REQUEST_TIMEOUT_SECS '{value}': expected a positive number of seconds"
        ))),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let listen_addr = match env::var("LISTEN_ADDR") {
            Ok(value) if !value.trim().is_empty() => parse_listen_addr(value.trim())?,
            _ => parse_listen_addr(DEFAULT_LISTEN_ADDR)?,
        };

        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(value) if !value.trim().is_empty() => parse_timeout(&value)?,
            _ => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            listen_addr,
            request_timeout,
            repository: RepositoryInfo::from_env(),
            metadata: MetadataValues::from_env()?,
            database: DatabaseSetup::from_env()?,
        })
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(addr) = cli.listen {
            self.listen_addr = addr;
        }
        if let Some(ref base_url) = cli.base_url {
            self.repository = self.repository.with_base_url(base_url.as_str());
        }
        self
    }
}
