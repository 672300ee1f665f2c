//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, so a bare `shopbook-server` starts a working local instance.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port to listen on.
    pub port: u16,

    /// Path to the SQLite database file.
    pub database_path: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable      | Default          |
    /// |---------------|------------------|
    /// | `PORT`        | `3000`           |
    /// | `SHOPBOOK_DB` | `./shopbook.db`  |
    pub fn load() -> Result<Self, ConfigError> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?;

        let database_path = env::var("SHOPBOOK_DB")
            .unwrap_or_else(|_| "./shopbook.db".to_string())
            .into();

        Ok(ServerConfig {
            port,
            database_path,
        })
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only meaningful when the variables are unset, which is the normal
        // test environment.
        if env::var("PORT").is_err() && env::var("SHOPBOOK_DB").is_err() {
            let config = ServerConfig::load().unwrap();
            assert_eq!(config.port, 3000);
            assert_eq!(config.database_path, PathBuf::from("./shopbook.db"));
        }
    }
}
