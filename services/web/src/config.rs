//! services/web/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// Shortest accepted `SECRET_KEY`, in bytes.
pub const MIN_SECRET_KEY_LEN: usize = 16;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub log_level: Level,
    /// Signs the session cookie. Never logged.
    pub secret_key: Vec<u8>,
    pub session_cookie_secure: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("database_max_connections", &self.database_max_connections)
            .field("log_level", &self.log_level)
            .field("secret_key", &"<redacted>")
            .field("session_cookie_secure", &self.session_cookie_secure)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server and Database Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse::<u32>().map_err(|e| {
                ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string(), e.to_string())
            })?,
            None => 5,
        };

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Session Settings ---
        let secret_key = lookup("SECRET_KEY")
            .ok_or_else(|| ConfigError::MissingVar("SECRET_KEY".to_string()))?
            .into_bytes();
        if secret_key.len() < MIN_SECRET_KEY_LEN {
            return Err(ConfigError::InvalidValue(
                "SECRET_KEY".to_string(),
                format!("must be at least {} bytes", MIN_SECRET_KEY_LEN),
            ));
        }

        let session_cookie_secure = match lookup("SESSION_COOKIE_SECURE") {
            Some(raw) => raw.parse::<bool>().map_err(|_| {
                ConfigError::InvalidValue(
                    "SESSION_COOKIE_SECURE".to_string(),
                    format!("'{}' is not true or false", raw),
                )
            })?,
            None => false,
        };

        Ok(Self {
            bind_address,
            database_url,
            database_max_connections,
            log_level,
            secret_key,
            session_cookie_secure,
        })
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
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/notes_app"),
            ("SECRET_KEY", "0123456789abcdef"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.log_level, Level::INFO);
        assert!(!config.session_cookie_secure);
    }

    #[test]
    fn missing_database_url_is_reported() {
        let err = Config::from_lookup(lookup_from(&[("SECRET_KEY", "0123456789abcdef")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(var) if var == "DATABASE_URL"));
    }

    #[test]
    fn short_secret_key_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/notes_app"),
            ("SECRET_KEY", "short"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "SECRET_KEY"));
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/notes_app"),
            ("SECRET_KEY", "0123456789abcdef"),
        ]))
        .unwrap();
        assert!(!format!("{:?}", config).contains("0123456789abcdef"));
    }
}
