//! Role session - the per-session authorization facade
//!
//! Binds an [`IdentityProvider`] to a [`SessionRoleCache`] and exposes the
//! queries UI code needs: permission checks, role checks, loading/error
//! flags and `refresh_role` after an out-of-band role change.
//!
//! # Example
//!
//! ```rust,no_run
//! use portal_rbac::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let directory = MemoryRoleDirectory::new()
//!     .with_record(
//!         RoleRecord::new("ana@corp.com", "Finance Manager").with_grant("Payments", ["read"]),
//!     );
//! let identity = Arc::new(StaticIdentity::signed_in("ana@corp.com"));
//! let session = RoleSession::new(identity, Arc::new(directory));
//!
//! session.sync().await;
//! assert!(session.has_permission("Payments", "read"));
//! # }
//! ```

use crate::cache::{RoleSnapshot, SessionRoleCache};
use crate::config::RbacConfig;
use crate::guard::{GuardDecision, RoleProtectedRoute};
use crate::identity::IdentityProvider;
use crate::lookup::RoleLookup;
use crate::rbac::{self, DEFAULT_ACTION};
use std::sync::Arc;

/// Authorization state of one signed-in session
pub struct RoleSession {
    identity: Arc<dyn IdentityProvider>,
    cache: SessionRoleCache,
    config: RbacConfig,
}

impl RoleSession {
    pub fn new(identity: Arc<dyn IdentityProvider>, lookup: Arc<dyn RoleLookup>) -> Self {
        Self::with_config(identity, lookup, RbacConfig::default())
    }

    pub fn with_config(
        identity: Arc<dyn IdentityProvider>,
        lookup: Arc<dyn RoleLookup>,
        config: RbacConfig,
    ) -> Self {
        Self { identity, cache: SessionRoleCache::new(lookup), config }
    }

    /// Follow the identity provider and load the principal's role if due
    ///
    /// Only tracks the principal while a sign-in interaction is in progress
    /// (when `defer_during_interaction` is set). Signing out clears the cache.
    pub async fn sync(&self) -> RoleSnapshot {
        if self.config.defer_during_interaction && self.identity.interaction_in_progress() {
            log::debug!("Identity interaction in progress, deferring role fetch");
            self.observe_identity();
            return self.cache.snapshot();
        }

        match self.identity.principal() {
            Some(email) => {
                self.cache.set_principal(Some(&email));
                self.cache.load(&email).await
            }
            None => {
                self.cache.clear();
                self.cache.snapshot()
            }
        }
    }

    /// Re-fetch the current principal's role, keeping the old one visible meanwhile
    pub async fn refresh_role(&self) -> RoleSnapshot {
        match self.identity.principal() {
            Some(email) => self.cache.refresh(&email).await,
            None => {
                self.cache.clear();
                self.cache.snapshot()
            }
        }
    }

    /// Point the cache at the identity's principal without fetching
    fn observe_identity(&self) {
        self.cache.set_principal(self.identity.principal().as_deref());
    }

    /// Forget the cached role (logout)
    pub fn logout(&self) {
        self.cache.clear();
    }

    pub fn snapshot(&self) -> RoleSnapshot {
        self.cache.snapshot()
    }

    pub fn cache(&self) -> &SessionRoleCache {
        &self.cache
    }

    pub fn config(&self) -> &RbacConfig {
        &self.config
    }

    pub fn has_permission(&self, resource: &str, action: &str) -> bool {
        rbac::has_permission(self.snapshot().record(), resource, action)
    }

    /// Every action on `resource`; `None` checks `read`
    pub fn check_resource_access(&self, resource: &str, actions: Option<&[&str]>) -> bool {
        let actions = actions.unwrap_or(&[DEFAULT_ACTION]);
        rbac::check_resource_access(self.snapshot().record(), resource, actions)
    }

    /// Exact role match (admins do not match other role names)
    pub fn has_role(&self, role: &str) -> bool {
        self.snapshot().role_name() == Some(role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        self.snapshot().role_name().map(|name| roles.contains(&name)).unwrap_or(false)
    }

    pub fn is_admin(&self) -> bool {
        self.snapshot().is_admin()
    }

    pub fn role_name(&self) -> Option<String> {
        self.snapshot().role_name().map(str::to_string)
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.snapshot().error().map(str::to_string)
    }

    pub fn no_role_assigned(&self) -> bool {
        self.snapshot().no_role_assigned()
    }

    /// Guard a navigation for the identity's current principal
    ///
    /// A signed-in principal whose role has not been fetched yet gets
    /// `Loading`, never a login redirect.
    pub fn guard(&self, route: &RoleProtectedRoute, location: &str) -> GuardDecision {
        self.observe_identity();
        route.decide(&self.snapshot(), location)
    }
}
