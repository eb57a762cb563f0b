//! Role lookup configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Which role directory answers lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupBackend {
    /// Empty in-process directory, filled from code
    #[default]
    Memory,
    /// TOML/JSON directory file
    File,
    /// PostgREST (Supabase) users table
    Rest,
}

impl FromStr for LookupBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "rest" | "supabase" => Ok(Self::Rest),
            other => Err(format!("unknown lookup backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub backend: LookupBackend,
    pub directory_path: Option<String>,
    pub rest_url: Option<String>,
    pub api_key: Option<String>,
    pub table: String,
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            backend: LookupBackend::Memory,
            directory_path: None,
            rest_url: None,
            api_key: None,
            table: "users".to_string(),
            timeout_secs: 10,
        }
    }
}

impl LookupConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(backend) = env::var("PORTAL_LOOKUP_BACKEND") {
            match backend.parse() {
                Ok(backend) => self.backend = backend,
                Err(e) => log::warn!("Ignoring PORTAL_LOOKUP_BACKEND: {}", e),
            }
        }
        if let Ok(path) = env::var("PORTAL_LOOKUP_DIRECTORY") {
            self.directory_path = Some(path);
        }
        if let Ok(url) = env::var("PORTAL_LOOKUP_REST_URL") {
            self.rest_url = Some(url);
        }
        if let Ok(key) = env::var("PORTAL_LOOKUP_API_KEY") {
            self.api_key = Some(key);
        }
        if let Ok(table) = env::var("PORTAL_LOOKUP_TABLE") {
            self.table = table;
        }
        if let Ok(timeout) = env::var("PORTAL_LOOKUP_TIMEOUT_SECS") {
            self.timeout_secs = timeout.parse().unwrap_or(10);
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.backend {
            LookupBackend::File if self.directory_path.is_none() => {
                bail!("lookup.directory_path is required when backend = \"file\"")
            }
            LookupBackend::Rest if self.rest_url.is_none() => {
                bail!("lookup.rest_url is required when backend = \"rest\"")
            }
            _ => {}
        }
        if self.timeout_secs == 0 {
            bail!("lookup.timeout_secs must be greater than 0");
        }
        Ok(())
    }
}
