//! Route tables - associate location patterns with protected routes

use super::{GuardDecision, RoleProtectedRoute, RouteDeclaration};
use crate::cache::RoleSnapshot;
use crate::config::RbacConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Arc;

/// Route guard matcher - associates a pattern with a guard
#[derive(Debug, Clone)]
pub struct RouteGuardMatcher {
    /// Exact path, or a prefix ending in `/*`
    pub pattern: String,
    pub route: Arc<RoleProtectedRoute>,
}

impl RouteGuardMatcher {
    /// Check if a location (path plus optional query) matches this matcher
    pub fn matches(&self, location: &str) -> bool {
        let path = location.split(['?', '#']).next().unwrap_or(location);

        if self.pattern == "*" || self.pattern == "/*" {
            return true;
        }

        if let Some(prefix) = self.pattern.strip_suffix("/*") {
            return path == prefix || path.starts_with(&format!("{}/", prefix));
        }

        path == self.pattern
    }
}

#[derive(Debug, Deserialize)]
struct RouteTableFile {
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    pattern: String,
    #[serde(flatten)]
    declaration: RouteDeclaration,
}

/// Ordered route declarations; the first matching pattern guards a location
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    matchers: Vec<RouteGuardMatcher>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a guarded pattern
    pub fn with_route(mut self, pattern: impl Into<String>, route: RoleProtectedRoute) -> Self {
        self.matchers.push(RouteGuardMatcher { pattern: pattern.into(), route: Arc::new(route) });
        self
    }

    /// Parse `[[routes]]` entries from TOML
    ///
    /// ```toml
    /// [[routes]]
    /// pattern = "/finance/*"
    /// allowed_roles = ["Finance Manager", "CFO"]
    /// required_permissions = [{ resource = "Payments", action = "read" }]
    /// ```
    pub fn from_toml_str(content: &str, config: &RbacConfig) -> Result<Self> {
        let file: RouteTableFile = toml::from_str(content).context("Failed to parse route table")?;

        Ok(file.routes.into_iter().fold(Self::new(), |table, entry| {
            let route = RoleProtectedRoute::from_declaration(entry.declaration, config);
            table.with_route(entry.pattern, route)
        }))
    }

    /// The guard for a location, if any pattern matches
    pub fn route_for(&self, location: &str) -> Option<&RoleProtectedRoute> {
        self.matchers.iter().find(|m| m.matches(location)).map(|m| m.route.as_ref())
    }

    /// Decide a navigation; `None` when no pattern guards the location
    pub fn decide(&self, snapshot: &RoleSnapshot, location: &str) -> Option<GuardDecision> {
        self.route_for(location).map(|route| route.decide(snapshot, location))
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
