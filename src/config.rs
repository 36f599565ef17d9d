//! Runtime configuration loaded from the process environment.

use std::{env, num::ParseIntError};

use thiserror::Error;

use crate::state::cache::DEFAULT_CAPACITY;

const DEFAULT_PORT: &str = "8080";
const DEFAULT_HOSTNAME: &str = "localhost";
const DEFAULT_ALLOWED_ORIGINS: &str = "*";
const DEFAULT_MLB_API_URL: &str = "https://statsapi.mlb.com";

/// Failures while parsing configuration values; fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {var}")]
    InvalidNumber {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listening port.
    pub port: u16,
    /// Bind host.
    pub hostname: String,
    /// CORS origin whitelist; `*` allows any origin.
    pub allowed_origins: Vec<String>,
    /// Base URL of the upstream data provider.
    pub mlb_api_url: String,
    /// Bound on the number of cached games.
    pub cache_capacity: usize,
}

impl AppConfig {
    /// Read configuration from the environment, applying defaults for every
    /// missing value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = get_env("PORT_", DEFAULT_PORT);
        let port = port.parse().map_err(|source| ConfigError::InvalidNumber {
            var: "PORT_",
            value: port.clone(),
            source,
        })?;

        let capacity = get_env("CACHE_CAPACITY", &DEFAULT_CAPACITY.to_string());
        let cache_capacity = capacity
            .parse()
            .map_err(|source| ConfigError::InvalidNumber {
                var: "CACHE_CAPACITY",
                value: capacity.clone(),
                source,
            })?;

        Ok(Self {
            port,
            hostname: get_env("HOSTNAME_", DEFAULT_HOSTNAME),
            allowed_origins: parse_origins(&get_env("ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS)),
            mlb_api_url: get_env("MLB_API_URL", DEFAULT_MLB_API_URL),
            cache_capacity,
        })
    }

    /// Address string handed to the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split the comma-separated origin whitelist, dropping empty fragments.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_split_on_commas_and_trim() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://a.example, http://b.example"),
            vec!["http://a.example", "http://b.example"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn from_env_applies_defaults() {
        // No test in this crate writes these variables, so reading the
        // process environment here is race-free.
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.hostname, "localhost");
        assert_eq!(config.allowed_origins, vec!["*"]);
        assert_eq!(config.mlb_api_url, "https://statsapi.mlb.com");
        assert_eq!(config.cache_capacity, DEFAULT_CAPACITY);
        assert_eq!(config.bind_addr(), "localhost:8080");
    }
}
