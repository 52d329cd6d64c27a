//! Unified Application Configuration
//!
//! Centralized configuration for the whole application, loaded from
//! `ZAINTZA_*` environment variables with sensible defaults and
//! validated before use.

use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidValue(String),
}

/// Unified application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        let config = Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("ZAINTZA_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("ZAINTZA_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("ZAINTZA_PORT".to_string()))?;
        Ok(Self { host, port })
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("port must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Database configuration
///
/// When no URL is set the server runs on the in-memory repositories.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL (unset = in-memory mode)
    pub url: Option<String>,

    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("ZAINTZA_DB_URL").ok();
        let max_connections = std::env::var("ZAINTZA_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidValue("ZAINTZA_DB_MAX_CONNECTIONS".to_string()))?;
        Ok(Self {
            url,
            max_connections,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "max_connections must be > 0".to_string(),
            ));
        }
        if let Some(url) = &self.url {
            if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                return Err(ConfigError::InvalidValue(
                    "database URL must be PostgreSQL".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is not set
    pub level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self> {
        let level = std::env::var("ZAINTZA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        Ok(Self { level })
    }

    pub fn validate(&self) -> Result<()> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::InvalidValue(format!(
                "unknown log level: {}",
                self.level
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_validation() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_url_scheme_checked() {
        let config = DatabaseConfig {
            url: Some("mysql://localhost/zaintza".to_string()),
            max_connections: 20,
        };
        assert!(config.validate().is_err());

        let config = DatabaseConfig {
            url: Some("postgresql://localhost/zaintza".to_string()),
            max_connections: 20,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_in_memory_mode_is_valid() {
        let config = DatabaseConfig {
            url: None,
            max_connections: 20,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_validation() {
        let config = LoggingConfig {
            level: "verbose".to_string(),
        };
        assert!(config.validate().is_err());
    }
}
