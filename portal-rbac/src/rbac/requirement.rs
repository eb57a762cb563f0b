//! Declarative access requirements for protected routes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One (resource, action) pair a route needs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionRequirement {
    pub resource: String,
    pub action: String,
}

impl PermissionRequirement {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self { resource: resource.into(), action: action.into() }
    }
}

impl fmt::Display for PermissionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

impl FromStr for PermissionRequirement {
    type Err = String;

    /// Parse `resource:action`; the action defaults to `read` when omitted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (resource, action) = match s.split_once(':') {
            Some((resource, action)) => (resource.trim(), action.trim()),
            None => (s.trim(), super::DEFAULT_ACTION),
        };

        if resource.is_empty() || action.is_empty() {
            return Err(format!("invalid permission \"{}\", expected resource:action", s));
        }

        Ok(Self::new(resource, action))
    }
}

/// What a route demands of the current principal
///
/// Every constraint that is set must pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequirement {
    /// Exact role name required
    #[serde(default)]
    pub required_role: Option<String>,

    /// Any of these roles is accepted
    #[serde(default)]
    pub allowed_roles: Vec<String>,

    /// Every pair must be granted
    #[serde(default)]
    pub required_permissions: Vec<PermissionRequirement>,
}

impl AccessRequirement {
    /// Requirement with no constraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Require an exact role
    pub fn with_required_role(mut self, role: impl Into<String>) -> Self {
        self.required_role = Some(role.into());
        self
    }

    /// Accept any of the given roles
    pub fn with_allowed_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Require one more (resource, action) pair
    pub fn with_permission(
        mut self,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        self.required_permissions.push(PermissionRequirement::new(resource, action));
        self
    }

    /// Whether no constraint is set
    pub fn is_unrestricted(&self) -> bool {
        self.required_role.is_none()
            && self.allowed_roles.is_empty()
            && self.required_permissions.is_empty()
    }
}
