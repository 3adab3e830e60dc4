//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SUPERUBER_DATABASE_PATH` - SQLite file, or `:memory:` (default: superuber.sqlite3)
//! - `SUPERUBER_HOST` - Bind address (default: 127.0.0.1)
//! - `SUPERUBER_PORT` - Listen port (default: 3000)
//! - `SUPERUBER_LOG_LEVEL` - trace|debug|info|warn|error (default: build-mode dependent)
//! - `SUPERUBER_LOG_DIR` - Absolute directory for rolling log files (default: stderr)
//! - `SUPERUBER_PASSWORD_SCHEME` - plaintext|argon2 (default: plaintext)
//! - `SUPERUBER_VERIFICATION_POLICY` - literal|mark_fulfilled (default: literal)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use superuber_core::{default_log_level, PasswordScheme, VerificationPolicy};
use thiserror::Error;

const DEFAULT_DATABASE_PATH: &str = "superuber.sqlite3";
const DEFAULT_PORT: u16 = 3000;
const IN_MEMORY_DATABASE: &str = ":memory:";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database: DatabaseLocation,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// `None` logs to stderr.
    pub log_dir: Option<String>,
    pub password_scheme: PasswordScheme,
    pub verification_policy: VerificationPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database: DatabaseLocation::File(PathBuf::from(DEFAULT_DATABASE_PATH)),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            log_level: default_log_level().to_string(),
            log_dir: None,
            password_scheme: PasswordScheme::default(),
            verification_policy: VerificationPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment (and `.env`, if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database = match var("SUPERUBER_DATABASE_PATH") {
            Some(path) if path.trim() == IN_MEMORY_DATABASE => DatabaseLocation::InMemory,
            Some(path) => DatabaseLocation::File(PathBuf::from(path.trim())),
            None => defaults.database,
        };

        let host: IpAddr = match var("SUPERUBER_HOST") {
            Some(host) => host
                .trim()
                .parse()
                .map_err(|e| invalid("SUPERUBER_HOST", e))?,
            None => defaults.host,
        };

        let port: u16 = match var("SUPERUBER_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|e| invalid("SUPERUBER_PORT", e))?,
            None => defaults.port,
        };

        let password_scheme: PasswordScheme = match var("SUPERUBER_PASSWORD_SCHEME") {
            Some(value) => value
                .parse()
                .map_err(|e: String| invalid("SUPERUBER_PASSWORD_SCHEME", e))?,
            None => defaults.password_scheme,
        };

        let verification_policy: VerificationPolicy = match var("SUPERUBER_VERIFICATION_POLICY") {
            Some(value) => value
                .parse()
                .map_err(|e: String| invalid("SUPERUBER_VERIFICATION_POLICY", e))?,
            None => defaults.verification_policy,
        };

        Ok(Self {
            database,
            host,
            port,
            log_level: var("SUPERUBER_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: var("SUPERUBER_LOG_DIR"),
            password_scheme,
            verification_policy,
        })
    }

    /// Get the socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn invalid(key: &str, err: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}
