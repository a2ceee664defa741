//! # Configuration Utilities
//!
//! Configuration structures and parsing utilities for the client binaries.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: ClientConfig = load_config("config/client.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Complete configuration for the steganography client.
///
/// # Example TOML
///
/// ```toml
/// [service]
/// base_url = "http://127.0.0.1:8000"
///
/// [transfer]
/// request_timeout_secs = 30
/// output_dir = "downloads"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Where the steganography service is reachable
    pub service: ServiceInfo,
    /// Request timing and download parameters
    #[serde(default)]
    pub transfer: TransferConfig,
}

/// Location of the steganography service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Base URL of the service (e.g., "http://127.0.0.1:8000")
    pub base_url: String,
}

/// Request timing and download parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Deadline for each outbound request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Directory where encoded downloads are written
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_output_dir() -> String {
    "downloads".to_string()
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service: ServiceInfo {
                base_url: "http://127.0.0.1:8000".to_string(),
            },
            transfer: TransferConfig::default(),
        }
    }
}
