use std::path::PathBuf;

use chrono_tz::Tz;
use thiserror::Error;

use crate::code::DEFAULT_CODE_LENGTH;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (and an optional `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub timezone: Tz,
    pub data_dir: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub code_length: usize,
    pub max_code_attempts: usize,
    pub max_dates: usize,
    pub expose_index: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            timezone: chrono_tz::America::Los_Angeles,
            data_dir: None,
            static_dir: None,
            code_length: DEFAULT_CODE_LENGTH,
            max_code_attempts: 16,
            max_dates: 62,
            expose_index: false,
        }
    }
}

/// Parses a boolean value from various string representations
fn parse_bool(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    lower == "yes" || lower == "true" || lower == "1"
}

fn parse_positive(key: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        }),
    }
}

pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(value.to_string()))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is normal; real env vars still apply
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests need not touch the process env
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(host) = lookup("MEETSYNC_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("MEETSYNC_PORT") {
            config.port = parse_port(&port)?;
        }
        if let Some(tz) = lookup("MEETSYNC_TIMEZONE") {
            config.timezone = tz
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::UnknownTimezone(tz.clone()))?;
        }
        config.data_dir = lookup("MEETSYNC_DATA_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from);
        config.static_dir = lookup("MEETSYNC_STATIC_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from);
        if let Some(len) = lookup("MEETSYNC_CODE_LENGTH") {
            config.code_length = parse_positive("MEETSYNC_CODE_LENGTH", &len)?;
        }
        if let Some(attempts) = lookup("MEETSYNC_CODE_ATTEMPTS") {
            config.max_code_attempts = parse_positive("MEETSYNC_CODE_ATTEMPTS", &attempts)?;
        }
        if let Some(max) = lookup("MEETSYNC_MAX_DATES") {
            config.max_dates = parse_positive("MEETSYNC_MAX_DATES", &max)?;
        }
        if let Some(expose) = lookup("MEETSYNC_EXPOSE_INDEX") {
            config.expose_index = parse_bool(&expose);
        }

        Ok(config)
    }
}
