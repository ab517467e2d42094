//! HTTP server configuration

use anyhow::{Context, Result};
use ::config::{Config, Environment};
use serde::Deserialize;

/// Default request body limit, sized for base64-encoded report images
pub const DEFAULT_MAX_BODY_BYTES: i64 = 50 * 1024 * 1024;

/// Server configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `HOST`: Interface to bind (default: 0.0.0.0)
    /// - `PORT`: Port to listen on (default: 3001)
    /// - `MAX_BODY_BYTES`: Request body limit (default: 50 MiB)
    pub fn from_env() -> Result<Self> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3001_i64)?
            .set_default("max_body_bytes", DEFAULT_MAX_BODY_BYTES)?
            .add_source(Environment::default().try_parsing(true))
            .build()
            .context("Failed to read server configuration")?
            .try_deserialize()
            .context("Invalid server configuration")
    }

    /// Address to bind the listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
