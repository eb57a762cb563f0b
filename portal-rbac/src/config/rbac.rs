//! RBAC guard configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RbacConfig {
    /// Where denied principals are sent when redirecting
    pub fallback_path: String,
    /// Show an access-denied view instead of redirecting
    pub show_access_denied: bool,
    /// Hold off role fetches while the identity provider is mid-interaction
    pub defer_during_interaction: bool,
    /// Query parameter carrying the original location on redirects
    pub return_param: String,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            fallback_path: "/login".to_string(),
            show_access_denied: true,
            defer_during_interaction: true,
            return_param: "returnTo".to_string(),
        }
    }
}

impl RbacConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(path) = env::var("PORTAL_RBAC_FALLBACK_PATH") {
            self.fallback_path = path;
        }
        if let Ok(show) = env::var("PORTAL_RBAC_SHOW_ACCESS_DENIED") {
            self.show_access_denied = show.parse().unwrap_or(true);
        }
        if let Ok(defer) = env::var("PORTAL_RBAC_DEFER_DURING_INTERACTION") {
            self.defer_during_interaction = defer.parse().unwrap_or(true);
        }
        if let Ok(param) = env::var("PORTAL_RBAC_RETURN_PARAM") {
            self.return_param = param;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fallback_path.starts_with('/') {
            bail!("rbac.fallback_path must be an absolute path, got \"{}\"", self.fallback_path);
        }
        if self.return_param.is_empty() {
            bail!("rbac.return_param cannot be empty");
        }
        Ok(())
    }
}
