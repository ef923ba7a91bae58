//! Server settings loaded via OrthoConfig.
//!
//! Values come from defaults, `USERS_*` environment variables and command
//! line flags, in increasing order of precedence.

use std::net::{SocketAddr, ToSocketAddrs};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Settings controlling the listener and the persistence backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERS")]
pub struct ServerSettings {
    /// Host or IP address to bind.
    #[ortho_config(default = String::from(DEFAULT_BIND_HOST))]
    pub bind_host: String,
    /// TCP port to bind.
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
    /// PostgreSQL connection URL; the in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    #[ortho_config(default = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

/// Failures resolving settings into runtime values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The bind host did not resolve to any address.
    #[error("could not resolve bind address {host}:{port}: {message}")]
    UnresolvedBindAddress {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
        /// Resolver error text.
        message: String,
    },
}

impl ServerSettings {
    /// Database URL with blank values treated as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Resolve the bind host and port into a socket address.
    ///
    /// # Errors
    /// Returns [`SettingsError::UnresolvedBindAddress`] when the host does not
    /// resolve.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.bind_host.as_str();
        let port = self.port;
        let unresolved = |message: String| SettingsError::UnresolvedBindAddress {
            host: host.to_owned(),
            port,
            message,
        };
        (host, port)
            .to_socket_addrs()
            .map_err(|err| unresolved(err.to_string()))?
            .next()
            .ok_or_else(|| unresolved("no addresses returned".to_owned()))
    }
}
