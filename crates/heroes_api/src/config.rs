//! Environment-driven server configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `DB_URI` | `sqlite:///app.db` |
//! | `HEROES_HOST` | `127.0.0.1` |
//! | `PORT` | `5555` |
//! | `HEROES_LOG_LEVEL` | `debug` (debug builds) / `info` (release) |
//! | `HEROES_LOG_DIR` | unset, logs go to stderr |
//! | `HEROES_BODY_LIMIT` | `1048576` |
//!
//! Variables are read through `config::Environment`; empty values count
//! as unset.

use crate::http::DEFAULT_BODY_LIMIT;
use config::{Config, Environment};
use heroes_core::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_DATABASE_URI: &str = "sqlite:///app.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5555;

/// Configuration loading failure.
#[derive(Debug)]
pub enum ConfigError {
    /// A variable could not be read or converted to its field type.
    Load(config::ConfigError),
    /// A variable parsed but is outside its allowed range.
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "failed to load configuration: {err}"),
            Self::Invalid { key, value, reason } => {
                write!(f, "invalid {key} `{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(value: config::ConfigError) -> Self {
        Self::Load(value)
    }
}

/// Resolved server settings.
///
/// Field names map onto lowercased variable names (`DB_URI` -> `db_uri`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(rename = "db_uri", default = "default_database_uri")]
    pub database_uri: String,
    #[serde(rename = "heroes_host", default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(rename = "heroes_log_level", default = "default_level")]
    pub log_level: String,
    #[serde(rename = "heroes_log_dir", default)]
    pub log_dir: Option<String>,
    #[serde(rename = "heroes_body_limit", default = "default_body_limit")]
    pub body_limit: usize,
}

fn default_database_uri() -> String {
    DEFAULT_DATABASE_URI.to_string()
}

fn default_host() -> IpAddr {
    DEFAULT_HOST
        .parse()
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_level() -> String {
    default_log_level().to_string()
}

fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}

impl ServerConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::default())
    }

    /// Reads settings from an explicit variable map instead of the process
    /// environment.
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self, ConfigError> {
        Self::load(Environment::default().source(Some(vars)))
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(environment.ignore_empty(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.body_limit == 0 {
            return Err(ConfigError::Invalid {
                key: "HEROES_BODY_LIMIT",
                value: self.body_limit.to_string(),
                reason: "expected a positive byte count",
            });
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerConfig, DEFAULT_DATABASE_URI, DEFAULT_HOST, DEFAULT_PORT};
    use crate::http::DEFAULT_BODY_LIMIT;
    use std::net::IpAddr;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ServerConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.database_uri, DEFAULT_DATABASE_URI);
        assert_eq!(config.host, DEFAULT_HOST.parse::<IpAddr>().unwrap());
        assert_eq!(config.bind_addr().to_string(), format!("{DEFAULT_HOST}:{DEFAULT_PORT}"));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.body_limit, DEFAULT_BODY_LIMIT);
    }

    #[test]
    fn environment_values_override_defaults() {
        let config = ServerConfig::from_vars(vars(&[
            ("DB_URI", "sqlite:////tmp/heroes.db"),
            ("HEROES_HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("HEROES_LOG_LEVEL", "warn"),
            ("HEROES_LOG_DIR", "/var/log/heroes"),
            ("HEROES_BODY_LIMIT", "2048"),
        ]))
        .unwrap();
        assert_eq!(config.database_uri, "sqlite:////tmp/heroes.db");
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/heroes"));
        assert_eq!(config.body_limit, 2048);
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = ServerConfig::from_vars(vars(&[("DB_URI", ""), ("PORT", "")])).unwrap();
        assert_eq!(config.database_uri, DEFAULT_DATABASE_URI);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn unrelated_variables_are_ignored() {
        let config = ServerConfig::from_vars(vars(&[("HOME", "/root"), ("PATH", "/bin")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn unparseable_values_fail_to_load() {
        for (key, value) in [("PORT", "eighty"), ("HEROES_HOST", "localhost:1")] {
            let err = ServerConfig::from_vars(vars(&[(key, value)])).unwrap_err();
            assert!(matches!(err, ConfigError::Load(_)), "{key}: {err}");
        }
    }

    #[test]
    fn zero_body_limit_is_rejected() {
        let err = ServerConfig::from_vars(vars(&[("HEROES_BODY_LIMIT", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "HEROES_BODY_LIMIT",
                ..
            }
        ));
    }
}
