//! Configuration for the stirrup CLI

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Main CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Connection to the management server
    pub server: ServerConfig,

    /// Desired bootstrap state
    pub bootstrap: BootstrapConfig,
}

/// Connection settings for the management server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Management API base URL, including the API version segment
    /// (e.g. `https://mgmt.example.com/v3`)
    pub url: String,

    /// PEM bundle with additional trusted CA certificates
    pub ca_cert_file: Option<PathBuf>,

    /// Skip TLS certificate verification
    pub insecure: bool,

    /// Whether the target server runs in bootstrap mode
    pub bootstrap: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Desired values for the bootstrap reconciliation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Desired admin password; empty lets the server generate one
    pub password: String,

    /// Desired admin token lifetime in minutes; 0 means no expiry
    pub token_ttl: u64,

    /// Force admin token rotation on the next update
    pub token_update: bool,

    /// Opt the installation into telemetry
    pub telemetry: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            ca_cert_file: None,
            insecure: false,
            bootstrap: true,
            timeout_secs: 30,
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            password: String::new(),
            token_ttl: 0,
            token_update: false,
            telemetry: false,
        }
    }
}

impl Settings {
    /// Load configuration from an optional file, with `STIRRUP_*`
    /// environment variables layered on top
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("STIRRUP").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
