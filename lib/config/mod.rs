use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::domain::shelves::TrackerConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

pub struct Config {
    /// Required only for Postgres storage.
    pub db_url: Option<String>,
    /// Default: 127.0.0.1:8080
    pub grpc_addr: SocketAddr,
    /// REST gateway, health and metrics. Default: 0.0.0.0:3000
    pub http_addr: SocketAddr,
    pub tracker: TrackerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let grpc_addr = parse_or(&lookup, "GRPC_ADDR", SocketAddr::from(([127, 0, 0, 1], 8080)))?;
        let http_addr = parse_or(&lookup, "HTTP_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?;

        let defaults = TrackerConfig::default();
        let tracker = TrackerConfig {
            stage_interval: Duration::from_millis(parse_or(
                &lookup,
                "STAGE_INTERVAL_MS",
                defaults.stage_interval.as_millis() as u64,
            )?),
            expiration: Duration::from_secs(parse_or(
                &lookup,
                "OPERATION_EXPIRATION_SECS",
                defaults.expiration.as_secs(),
            )?),
            sweep_interval: Duration::from_secs(parse_or(
                &lookup,
                "SWEEP_INTERVAL_SECS",
                defaults.sweep_interval.as_secs(),
            )?),
        };

        if tracker.stage_interval.is_zero() || tracker.sweep_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "STAGE_INTERVAL_MS/SWEEP_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            db_url,
            grpc_addr,
            http_addr,
            tracker,
        })
    }

    pub fn require_db_url(&self) -> Result<&str, ConfigError> {
        self.db_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
