//! Server configuration.

use std::net::SocketAddr;

use crate::error::{Result, ServerError};

pub const DATABASE_URL_VAR: &str = "ELECTORAL_DATABASE_URL";
pub const BIND_ADDR_VAR: &str = "ELECTORAL_BIND_ADDR";
pub const MAX_CONNECTIONS_VAR: &str = "ELECTORAL_DB_MAX_CONNECTIONS";

/// Runtime configuration for the HTTP server and its store
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SeaORM connection URL
    pub database_url: String,
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,
    /// Upper bound of the connection pool
    pub max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let db_path = std::env::temp_dir().join("electoral-admin.db");
        Self {
            database_url: format!("sqlite:{}?mode=rwc", db_path.display()),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_connections: 8,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a key lookup, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(DATABASE_URL_VAR) {
            if url.trim().is_empty() {
                return Err(ServerError::Config(format!("{} is empty", DATABASE_URL_VAR)));
            }
            config.database_url = url;
        }

        if let Some(addr) = lookup(BIND_ADDR_VAR) {
            config.bind_addr = addr.parse().map_err(|e| {
                ServerError::Config(format!("{}={:?} is not a socket address: {}", BIND_ADDR_VAR, addr, e))
            })?;
        }

        if let Some(max) = lookup(MAX_CONNECTIONS_VAR) {
            config.max_connections = match max.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ServerError::Config(format!(
                        "{}={:?} must be a positive integer",
                        MAX_CONNECTIONS_VAR, max
                    )))
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert!(config.database_url.starts_with("sqlite:"));
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_connections, 8);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (DATABASE_URL_VAR, "sqlite::memory:"),
            (BIND_ADDR_VAR, "0.0.0.0:9000"),
            (MAX_CONNECTIONS_VAR, "2"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:9000");
        assert_eq!(config.max_connections, 2);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ServerConfig::from_lookup(lookup_from(&[(BIND_ADDR_VAR, "localhost")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[(MAX_CONNECTIONS_VAR, "0")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[(MAX_CONNECTIONS_VAR, "many")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[(DATABASE_URL_VAR, " ")])).is_err());
    }
}
