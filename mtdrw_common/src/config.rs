//! Configuration loading traits and types.
//!
//! TOML layout:
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! service_name = "mtdrw"
//!
//! [unlock]
//! i_want_a_brick = false
//! max_devices = 64
//! ```
//!
//! The `[unlock]` table is the only policy surface: `i_want_a_brick` is the
//! explicit opt-in gate without which no device is ever touched, and
//! `max_devices` bounds the ascending scan (and sizes the unlocked set).

use crate::consts::{DEFAULT_MAX_DEVICES, MAX_DEVICES_CEILING, MTDRW_SERVICE_NAME};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

/// Common configuration fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_service_name() -> String {
    MTDRW_SERVICE_NAME.to_string()
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

impl SharedConfig {
    /// Validate the shared configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Unlock policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockConfig {
    /// Explicit opt-in to the unsafe override. Defaults to false; the unlock
    /// pass refuses to run unless this is set.
    #[serde(default)]
    pub i_want_a_brick: bool,

    /// Upper bound (exclusive) on the device index scan. Also sizes the
    /// unlocked set, so partitions at or past this index are invisible.
    #[serde(default = "default_max_devices")]
    pub max_devices: usize,
}

fn default_max_devices() -> usize {
    DEFAULT_MAX_DEVICES
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            i_want_a_brick: false,
            max_devices: DEFAULT_MAX_DEVICES,
        }
    }
}

impl UnlockConfig {
    /// Validate the unlock configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if `max_devices` is zero or
    /// exceeds `MAX_DEVICES_CEILING`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_devices == 0 {
            return Err(ConfigError::ValidationError(
                "max_devices must be at least 1".to_string(),
            ));
        }
        if self.max_devices > MAX_DEVICES_CEILING {
            return Err(ConfigError::ValidationError(format!(
                "max_devices {} exceeds ceiling {}",
                self.max_devices, MAX_DEVICES_CEILING
            )));
        }
        Ok(())
    }
}

/// Top-level mtdrw configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MtdRwConfig {
    /// Common fields.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Unlock policy.
    #[serde(default)]
    pub unlock: UnlockConfig,
}

impl MtdRwConfig {
    /// Validate all sections.
    ///
    /// # Errors
    /// Returns the first `ConfigError::ValidationError` encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.unlock.validate()
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
