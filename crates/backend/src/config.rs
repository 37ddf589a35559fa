//! Backend configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPAPP_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `SHOPAPP_MAX_DB_CONNECTIONS` - Pool size cap (default: 10)
//! - `SHOPAPP_DEFAULT_PAGE_SIZE` - Listing page size when the caller gives none (default: 10)

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_MAX_DB_CONNECTIONS: u32 = 10;
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Backend configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Maximum connections held by the pool
    pub max_db_connections: u32,
    /// Page size applied when a listing request carries none
    pub default_page_size: u32,
}

impl BackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first if one is present (development convenience).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a numeric
    /// variable fails to parse.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = require_env("SHOPAPP_DATABASE_URL")?.into();
        let max_db_connections =
            parse_env("SHOPAPP_MAX_DB_CONNECTIONS", DEFAULT_MAX_DB_CONNECTIONS)?;
        let default_page_size = parse_env("SHOPAPP_DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;

        Ok(Self {
            database_url,
            max_db_connections,
            default_page_size,
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn parse_env(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_applies() {
        // Variable not set anywhere in the test environment.
        let value = parse_env("SHOPAPP_TEST_UNSET_VARIABLE", 7).expect("default");
        assert_eq!(value, 7);
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_parse_env_rejects_garbage() {
        // SAFETY: test-only env mutation, variable name is unique to this test.
        unsafe { std::env::set_var("SHOPAPP_TEST_GARBAGE_VARIABLE", "not-a-number") };
        let err = parse_env("SHOPAPP_TEST_GARBAGE_VARIABLE", 1).expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_require_env_missing() {
        let err = require_env("SHOPAPP_TEST_MISSING_VARIABLE").expect_err("must fail");
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }
}
