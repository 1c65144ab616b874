//! TOML configuration for vroomd
//!
//! Every section and key is optional; the defaults serve on
//! `0.0.0.0:8000` with one-day sessions.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [auth]
//! session_ttl_secs = 86400
//! min_password_length = 8
//! purge_interval_secs = 300
//!
//! [scans]
//! max_responses = 512
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use vroom_api::ApiConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub scans: ScansConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Lifetime of a login token
    pub session_ttl_secs: u64,
    pub min_password_length: usize,
    /// How often expired sessions are swept; 0 disables the sweeper
    pub purge_interval_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 24 * 60 * 60,
            min_password_length: 8,
            purge_interval_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScansConfig {
    /// Maximum adapter responses accepted in one scan upload
    pub max_responses: usize,
}

impl Default for ScansConfig {
    fn default() -> Self {
        Self { max_responses: 512 }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply command-line overrides
    pub fn merge_with_args(mut self, host: Option<IpAddr>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn purge_interval(&self) -> Option<Duration> {
        match self.auth.purge_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Runtime settings for the API layer
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            session_ttl: Duration::from_secs(self.auth.session_ttl_secs),
            min_password_length: self.auth.min_password_length,
            max_scan_responses: self.scans.max_responses,
        }
    }
}
