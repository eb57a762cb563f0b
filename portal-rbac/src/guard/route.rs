//! Role protected routes

use super::{AccessDenied, GuardDecision, RouteOutcome};
use crate::cache::{RoleSnapshot, RoleState};
use crate::config::RbacConfig;
use crate::error::AccessError;
use crate::navigation::{Navigator, Redirect};
use crate::rbac::{AccessRequirement, PermissionChecker, RoleRecord, WildcardPermissionChecker};
use serde::Deserialize;
use std::sync::Arc;

enum Verdict {
    Allow(Arc<RoleRecord>),
    Wait,
    Deny(AccessError),
}

/// A route guarded by an [`AccessRequirement`]
#[derive(Clone)]
pub struct RoleProtectedRoute {
    requirement: AccessRequirement,
    fallback_path: String,
    show_access_denied: bool,
    checker: Arc<dyn PermissionChecker>,
}

impl std::fmt::Debug for RoleProtectedRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleProtectedRoute")
            .field("requirement", &self.requirement)
            .field("fallback_path", &self.fallback_path)
            .field("show_access_denied", &self.show_access_denied)
            .finish()
    }
}

/// Serialized route declaration, e.g. a `[[routes]]` table entry
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDeclaration {
    #[serde(flatten)]
    pub requirement: AccessRequirement,
    #[serde(default)]
    pub fallback_path: Option<String>,
    #[serde(default)]
    pub show_access_denied: Option<bool>,
}

impl RoleProtectedRoute {
    /// Guard with the default fallback (`/login`) and denial view
    pub fn new(requirement: AccessRequirement) -> Self {
        Self::from_config(requirement, &RbacConfig::default())
    }

    /// Guard using the fallback and denial settings of `config`
    pub fn from_config(requirement: AccessRequirement, config: &RbacConfig) -> Self {
        Self {
            requirement,
            fallback_path: config.fallback_path.clone(),
            show_access_denied: config.show_access_denied,
            checker: Arc::new(WildcardPermissionChecker),
        }
    }

    /// Route declaration with per-route overrides of `config`
    pub fn from_declaration(declaration: RouteDeclaration, config: &RbacConfig) -> Self {
        let mut route = Self::from_config(declaration.requirement, config);
        if let Some(path) = declaration.fallback_path {
            route.fallback_path = path;
        }
        if let Some(show) = declaration.show_access_denied {
            route.show_access_denied = show;
        }
        route
    }

    pub fn with_fallback_path(mut self, path: impl Into<String>) -> Self {
        self.fallback_path = path.into();
        self
    }

    /// `false` turns every denial into a redirect
    pub fn with_show_access_denied(mut self, show: bool) -> Self {
        self.show_access_denied = show;
        self
    }

    pub fn with_checker(mut self, checker: Arc<dyn PermissionChecker>) -> Self {
        self.checker = checker;
        self
    }

    pub fn requirement(&self) -> &AccessRequirement {
        &self.requirement
    }

    pub fn fallback_path(&self) -> &str {
        &self.fallback_path
    }

    fn evaluate(&self, snapshot: &RoleSnapshot) -> Verdict {
        // A first fetch is `Loading`; a refresh over a record stays `Loaded`
        let record = match (&snapshot.state, snapshot.principal.as_deref()) {
            (RoleState::Loading, _) => return Verdict::Wait,
            (RoleState::Errored(message), _) => {
                return Verdict::Deny(AccessError::LookupFailed(message.clone()))
            }
            (_, None) => return Verdict::Deny(AccessError::NotAuthenticated),
            (RoleState::Idle, Some(_)) => return Verdict::Wait,
            (RoleState::NoRole, Some(principal)) => {
                return Verdict::Deny(AccessError::NoRoleAssigned { email: principal.to_string() })
            }
            (RoleState::Loaded(record), Some(_)) => Arc::clone(record),
        };

        if record.is_admin {
            return Verdict::Allow(record);
        }

        if let Some(required) = &self.requirement.required_role {
            if &record.role_name != required {
                return Verdict::Deny(AccessError::InsufficientRole {
                    required: required.clone(),
                    actual: record.role_name.clone(),
                });
            }
        }

        let allowed = &self.requirement.allowed_roles;
        if !allowed.is_empty() && !allowed.contains(&record.role_name) {
            return Verdict::Deny(AccessError::RoleNotAllowed {
                allowed: allowed.clone(),
                actual: record.role_name.clone(),
            });
        }

        let missing: Vec<_> = self
            .requirement
            .required_permissions
            .iter()
            .filter(|req| !self.checker.has_permission(Some(&record), &req.resource, &req.action))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Verdict::Deny(AccessError::InsufficientPermissions { missing });
        }

        Verdict::Allow(record)
    }

    /// Decide the outcome for a navigation to `location`
    pub fn decide(&self, snapshot: &RoleSnapshot, location: &str) -> GuardDecision {
        match self.evaluate(snapshot) {
            Verdict::Allow(record) => GuardDecision::Render(record),
            Verdict::Wait => GuardDecision::Loading,
            Verdict::Deny(error) => {
                log::info!(
                    "🚫 Access to {} refused for {}: {}",
                    location,
                    snapshot.principal.as_deref().unwrap_or("anonymous"),
                    error.code()
                );
                if self.show_access_denied {
                    GuardDecision::Denied(AccessDenied::new(error, location))
                } else {
                    GuardDecision::Redirect(Redirect::new(&self.fallback_path, location))
                }
            }
        }
    }

    /// Decide, redirect through `navigator` if needed, and build the content
    /// only when access is granted
    pub fn render<T>(
        &self,
        snapshot: &RoleSnapshot,
        location: &str,
        navigator: &dyn Navigator,
        content: impl FnOnce(&RoleRecord) -> T,
    ) -> RouteOutcome<T> {
        match self.decide(snapshot, location) {
            GuardDecision::Render(record) => RouteOutcome::Content(content(&record)),
            GuardDecision::Loading => RouteOutcome::Loading,
            GuardDecision::Denied(denied) => RouteOutcome::AccessDenied(denied),
            GuardDecision::Redirect(redirect) => {
                navigator.redirect(&redirect);
                RouteOutcome::Redirected(redirect)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::RecordingNavigator;

    fn snapshot(state: RoleState) -> RoleSnapshot {
        RoleSnapshot {
            principal: Some("emp@corp.com".into()),
            state,
            refreshing: false,
            fetch_attempted: true,
        }
    }

    fn loaded(record: RoleRecord) -> RoleSnapshot {
        snapshot(RoleState::Loaded(Arc::new(record)))
    }

    fn employee() -> RoleRecord {
        RoleRecord::new("emp@corp.com", "Employee").with_grant("Payments", ["read"])
    }

    fn denial(decision: GuardDecision) -> AccessError {
        match decision {
            GuardDecision::Denied(denied) => denied.error,
            other => panic!("expected denial, got {:?}", other),
        }
    }

    #[test]
    fn test_loading_without_record() {
        let route = RoleProtectedRoute::new(AccessRequirement::new());
        assert_eq!(route.decide(&snapshot(RoleState::Loading), "/"), GuardDecision::Loading);
        assert_eq!(route.decide(&snapshot(RoleState::Idle), "/"), GuardDecision::Loading);
    }

    #[test]
    fn test_refresh_in_flight_renders_stale_record() {
        let route =
            RoleProtectedRoute::new(AccessRequirement::new().with_permission("Payments", "read"));
        let mut refreshing = loaded(employee());
        refreshing.refreshing = true;

        assert!(route.decide(&refreshing, "/payments").is_render());
    }

    #[test]
    fn test_lookup_error_is_denied_verbatim() {
        let route = RoleProtectedRoute::new(AccessRequirement::new());
        let decision = route.decide(&snapshot(RoleState::Errored("service down".into())), "/");
        assert_eq!(decision.denial_reason(), Some("service down"));
    }

    #[test]
    fn test_error_takes_precedence_over_missing_principal() {
        let route = RoleProtectedRoute::new(AccessRequirement::new());
        let mut errored = snapshot(RoleState::Errored("service down".into()));
        errored.principal = None;
        assert_eq!(
            denial(route.decide(&errored, "/")),
            AccessError::LookupFailed("service down".into())
        );
    }

    #[test]
    fn test_no_principal() {
        let route = RoleProtectedRoute::new(AccessRequirement::new());
        let anonymous = RoleSnapshot::empty();
        assert_eq!(denial(route.decide(&anonymous, "/")), AccessError::NotAuthenticated);
    }

    #[test]
    fn test_no_role_assigned() {
        let route = RoleProtectedRoute::new(AccessRequirement::new());
        assert_eq!(
            denial(route.decide(&snapshot(RoleState::NoRole), "/")),
            AccessError::NoRoleAssigned { email: "emp@corp.com".into() }
        );
    }

    #[test]
    fn test_required_role_mismatch_and_admin_bypass() {
        let route =
            RoleProtectedRoute::new(AccessRequirement::new().with_required_role("Finance Manager"));

        let decision = route.decide(&loaded(employee()), "/finance");
        let reason = decision.denial_reason().unwrap();
        assert!(reason.contains("Finance Manager"));
        assert!(reason.contains("Employee"));

        assert!(route.decide(&loaded(employee().with_admin(true)), "/finance").is_render());
    }

    #[test]
    fn test_allowed_roles() {
        let route =
            RoleProtectedRoute::new(AccessRequirement::new().with_allowed_roles(["HR", "Manager"]));
        assert_eq!(
            denial(route.decide(&loaded(employee()), "/hr")),
            AccessError::RoleNotAllowed {
                allowed: vec!["HR".into(), "Manager".into()],
                actual: "Employee".into()
            }
        );

        let manager = RoleRecord::new("m@corp.com", "Manager");
        assert!(route.decide(&loaded(manager), "/hr").is_render());
    }

    #[test]
    fn test_missing_permissions_lists_every_pair() {
        let route = RoleProtectedRoute::new(
            AccessRequirement::new()
                .with_permission("Payments", "approve")
                .with_permission("Payments", "read")
                .with_permission("Assets", "delete"),
        );

        let decision = route.decide(&loaded(employee()), "/approvals");
        assert!(decision.denial_reason().unwrap().contains("Payments:approve, Assets:delete"));
    }

    #[test]
    fn test_constraints_are_anded() {
        let route = RoleProtectedRoute::new(
            AccessRequirement::new()
                .with_required_role("Employee")
                .with_permission("Payments", "approve"),
        );
        assert!(matches!(
            denial(route.decide(&loaded(employee()), "/")),
            AccessError::InsufficientPermissions { .. }
        ));
    }

    #[test]
    fn test_redirect_instead_of_denial() {
        let route = RoleProtectedRoute::new(AccessRequirement::new().with_required_role("HR"))
            .with_fallback_path("/unauthorized")
            .with_show_access_denied(false);
        let navigator = RecordingNavigator::new();

        let outcome = route.render(&loaded(employee()), "/hr/reviews", &navigator, |_| "page");
        assert_eq!(
            outcome,
            RouteOutcome::Redirected(Redirect::new("/unauthorized", "/hr/reviews"))
        );
        assert_eq!(navigator.redirects().len(), 1);
    }

    #[test]
    fn test_render_builds_content_only_when_granted() {
        let route = RoleProtectedRoute::new(AccessRequirement::new());
        let navigator = RecordingNavigator::new();

        let outcome =
            route.render(&loaded(employee()), "/", &navigator, |record| record.role_name.clone());
        assert_eq!(outcome.content(), Some("Employee".to_string()));

        let mut built = false;
        let outcome =
            route.render(&snapshot(RoleState::Loading), "/", &navigator, |_| built = true);
        assert_eq!(outcome, RouteOutcome::Loading);
        assert!(!built);
        assert!(navigator.redirects().is_empty());
    }

    #[test]
    fn test_declaration_overrides_config() {
        let declaration: RouteDeclaration = toml::from_str(
            r#"
required_role = "HR"
show_access_denied = false
"#,
        )
        .unwrap();

        let route = RoleProtectedRoute::from_declaration(declaration, &RbacConfig::default());
        assert_eq!(route.requirement().required_role.as_deref(), Some("HR"));
        assert_eq!(route.fallback_path(), "/login");
        assert!(matches!(route.decide(&loaded(employee()), "/hr"), GuardDecision::Redirect(_)));
    }
}
