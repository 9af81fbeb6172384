//! Server configuration
//!
//! Reads config from env vars:
//!   HOST               bind host, IP literal or resolvable name (default: 0.0.0.0)
//!   PORT               bind port (default: 8080)
//!   STATIC_DIR         bundled SPA directory holding index.html (default: dist)
//!   AGRI_SERVICES_FILE optional YAML service catalog (default: built-in catalog)

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::catalog::ServiceCatalog;
use crate::error::ConfigError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATIC_DIR: &str = "dist";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub catalog: ServiceCatalog,
}

impl ServerConfig {
    /// Configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidVar {
                    var: "PORT",
                    value: value.clone(),
                    message: e.to_string(),
                })?,
            None => DEFAULT_PORT,
        };

        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let catalog = match lookup("AGRI_SERVICES_FILE") {
            Some(path) => ServiceCatalog::from_file(path)?,
            None => ServiceCatalog::builtin(),
        };

        Ok(Self {
            host,
            port,
            static_dir,
            catalog,
        })
    }

    /// Socket address to bind; host names are resolved and the first
    /// address wins
    pub async fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidVar {
            var: "HOST",
            value: self.host.clone(),
            message,
        };
        let mut addrs = tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| invalid(e.to_string()))?;
        addrs
            .next()
            .ok_or_else(|| invalid("host resolved to no addresses".to_string()))
    }

    /// The SPA entry document
    pub fn index_file(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            catalog: ServiceCatalog::builtin(),
        }
    }
}
