//! Configuration system for the portal RBAC gate
//!
//! Configuration values are resolved in the following order (highest priority wins):
//!
//! 1. **Code** (builder methods) - Highest priority
//! 2. **Environment Variables** (`PORTAL_*`) - Override file config
//! 3. **Config File** (portal.toml) - Override defaults
//! 4. **Defaults** - Lowest priority
//!
//! # Example
//!
//! ```no_run
//! use portal_rbac::config::PortalConfig;
//!
//! let config = PortalConfig::load()?;
//! let config = PortalConfig::load_from("config/portal.toml")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod lookup;
pub mod rbac;

pub use lookup::{LookupBackend, LookupConfig};
pub use rbac::RbacConfig;

use crate::logging::LoggingConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "portal.toml";

/// Complete portal configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub rbac: RbacConfig,
    pub lookup: LookupConfig,
    pub logging: LoggingConfig,
}

impl PortalConfig {
    /// Load configuration with full supersedence chain
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file (missing file = defaults)
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        }

        config.apply_env_vars();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.rbac.merge(other.rbac);
        self.lookup.merge(other.lookup);
        self.logging = other.logging;
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.rbac.apply_env_vars();
        self.lookup.apply_env_vars();
        self.logging.apply_env_vars();
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.rbac.validate()?;
        self.lookup.validate()?;
        Ok(())
    }
}
