//! # Node Configuration
//!
//! Unified configuration for the server, the store and the dispatch surface.
//!
//! ## Environment
//!
//! | Variable                 | Field                |
//! |--------------------------|----------------------|
//! | `PORT`                   | `server.port`        |
//! | `HOST`                   | `server.host`        |
//! | `BASE_PATH`              | `server.base_path`   |
//! | `FIREFLY_DB`             | `storage.db_path`    |
//! | `FIREFLY_ADMIN_SECRET`   | `dispatch.secrets.admin`   |
//! | `FIREFLY_MONITOR_SECRET` | `dispatch.secrets.monitor` |
//!
//! The built-in secrets are for development only; startup warns when they
//! are still in use.

use ff_05_event_dispatch::{DispatchConfig, Secrets};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has an invalid value: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("BASE_PATH must be empty or start with '/' and not end with '/': {0:?}")]
    InvalidBasePath(String),

    #[error("Signon secrets must not be empty")]
    EmptySecret,

    #[error("Admin and monitor secrets must differ")]
    SharedSecret,

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// HTTP / WebSocket server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Prefix for every route, e.g. `/firefly`.
    pub base_path: String,
    /// Inbound frames larger than this are dropped.
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            base_path: String::new(),
            max_message_size: 64 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn socket_path(&self) -> String {
        format!("{}/socket", self.base_path)
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("firefly.sqlite3"),
        }
    }
}

impl NodeConfig {
    /// Load from the process environment on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` to resolve variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("PORT") {
            config.server.port = parse("PORT", value)?;
        }
        if let Some(value) = lookup("HOST") {
            config.server.host = parse("HOST", value)?;
        }
        if let Some(value) = lookup("BASE_PATH") {
            config.server.base_path = value;
        }
        if let Some(value) = lookup("FIREFLY_DB") {
            config.storage.db_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("FIREFLY_ADMIN_SECRET") {
            config.dispatch.secrets.admin = value;
        }
        if let Some(value) = lookup("FIREFLY_MONITOR_SECRET") {
            config.dispatch.secrets.monitor = value;
        }

        Ok(config)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_path = &self.server.base_path;
        if !base_path.is_empty() && (!base_path.starts_with('/') || base_path.ends_with('/')) {
            return Err(ConfigError::InvalidBasePath(base_path.clone()));
        }

        let secrets = &self.dispatch.secrets;
        if secrets.admin.is_empty() || secrets.monitor.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if secrets.admin == secrets.monitor {
            return Err(ConfigError::SharedSecret);
        }

        if self.dispatch.monitor_interval == Duration::ZERO {
            return Err(ConfigError::Zero("dispatch.monitor_interval"));
        }
        if self.dispatch.inbox_capacity == 0 {
            return Err(ConfigError::Zero("dispatch.inbox_capacity"));
        }
        if self.server.max_message_size == 0 {
            return Err(ConfigError::Zero("server.max_message_size"));
        }
        Ok(())
    }

    /// Whether either signon secret is still the built-in development value.
    pub fn is_default_secret(&self) -> bool {
        let defaults = Secrets::default();
        self.dispatch.secrets.admin == defaults.admin
            || self.dispatch.secrets.monitor == defaults.monitor
    }
}

fn parse<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { var, value })
}
