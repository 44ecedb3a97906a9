//! TOML configuration for the printer link.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::DeviceAddress;
use crate::transport::DEFAULT_RFCOMM_CHANNEL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub printer: PrinterConfig,

    #[serde(default)]
    pub device: DeviceConfig,
}

/// Cosmetic printer settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PrinterConfig {
    /// Friendly name used in logs only.
    #[serde(default)]
    pub name: String,
}

/// Bluetooth link settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceConfig {
    /// Peer address, six colon-separated hex octets.
    #[serde(default)]
    pub address: String,

    /// RFCOMM channel the printer listens on.
    #[serde(default = "default_channel")]
    pub channel: u8,

    /// Upper bound on the connect handshake, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            channel: default_channel(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

// Default value functions
fn default_channel() -> u8 {
    DEFAULT_RFCOMM_CHANNEL
}
fn default_connect_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Parse a TOML configuration string.
    pub fn parse_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.address.is_empty() {
            return Err(ConfigError::Invalid(
                "device address must be specified".to_string(),
            ));
        }
        if self.device.address.parse::<DeviceAddress>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "'{}' is not a valid device address",
                self.device.address
            )));
        }
        // RFCOMM channels run 1..=30.
        if self.device.channel == 0 || self.device.channel > 30 {
            return Err(ConfigError::Invalid(format!(
                "RFCOMM channel must be in 1..=30, got {}",
                self.device.channel
            )));
        }
        if self.device.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "connect_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.device.connect_timeout_secs)
    }
}

/// Load configuration from a TOML file.
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(config_path)?;
    let config = Config::parse_toml(&contents)?;
    tracing::info!("Loaded configuration from: {}", config_path);
    Ok(config)
}
