use crate::error::ConfigError;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

/// Where the HTTP server binds.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Connection string and pool limits for PostgreSQL.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// The full connection string, normally taken from `DATABASE_URL`.
    pub url: String,
    /// Upper bound on concurrently checked-out connections.
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Connections older than this are closed and replaced.
    pub max_lifetime_secs: u64,
    pub idle_timeout_secs: u64,
    /// Server-side `statement_timeout`, also the client-side limit on each query.
    pub statement_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive such as "info" or "web_server=debug,info".
    pub level: String,
    /// When set, logs go to a daily rolling file in this directory instead of stdout.
    pub directory: Option<PathBuf>,
}

impl Settings {
    /// Rejects settings that would only fail later at connect or bind time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "DATABASE_URL must be set".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.database.statement_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "database.statement_timeout_secs must be at least 1".to_string(),
            ));
        }
        self.server.bind_address()?;
        Ok(())
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("invalid server bind address: {e}")))
    }
}

impl DatabaseSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn statement_timeout(&self) -> Duration {
        Duration::from_secs(self.statement_timeout_secs)
    }
}
