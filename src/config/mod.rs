//! Configuration management for the loader registry
//!
//! Handles configuration loading from TOML files with per-field defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::registry::RegistryError;

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (e.g., "info", "debug", "dynload=debug")
    ///
    /// RUST_LOG takes precedence when set.
    #[serde(default)]
    pub filter: Option<String>,
}

/// Registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Maximum number of loaders run concurrently per batch
    ///
    /// `None` means unbounded fan-out.
    #[serde(default)]
    pub max_concurrent_loads: Option<usize>,

    /// Logging configuration
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl RegistryConfig {
    /// Load configuration from a TOML file.
    ///
    /// Missing fields fall back to their defaults. Unreadable files,
    /// invalid TOML, and a zero concurrency bound all surface as
    /// [`RegistryError::InvalidConfig`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RegistryError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: RegistryConfig = toml::from_str(&content).map_err(|e| {
            RegistryError::InvalidConfig(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot drive a load.
    fn validate(&self) -> Result<(), RegistryError> {
        if self.max_concurrent_loads == Some(0) {
            return Err(RegistryError::InvalidConfig(
                "max_concurrent_loads must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
