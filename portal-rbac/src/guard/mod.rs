//! Route Guard System - Declarative route protection
//!
//! A [`RoleProtectedRoute`] turns the session's [`RoleSnapshot`] and an
//! [`AccessRequirement`] into exactly one of four outcomes:
//! render, loading placeholder, access denied (with a precise reason), or
//! redirect to a fallback path carrying the original location.
//!
//! Rules are evaluated top to bottom, first match wins:
//!
//! 1. first fetch in flight, nothing cached -> loading
//! 2. lookup failed -> denied with the lookup message
//! 3. no principal -> denied, must log in
//! 4. principal known, fetch not started -> loading
//! 5. principal has no role -> denied, contact an administrator
//! 6. admin -> render
//! 7. required role mismatch -> denied
//! 8. role outside the allowed set -> denied
//! 9. any missing `resource:action` -> denied, listing all of them
//! 10. render
//!
//! Every denial becomes a redirect instead when the route has
//! `show_access_denied = false`.
//!
//! Example:
//! ```ignore
//! let route = RoleProtectedRoute::new(
//!     AccessRequirement::new().with_permission("Payments", "approve"),
//! )
//! .with_fallback_path("/login");
//!
//! match route.render(&session.snapshot(), "/payments", &navigator, |record| page(record)) {
//!     RouteOutcome::Content(html) => html,
//!     RouteOutcome::Loading => spinner(),
//!     RouteOutcome::AccessDenied(denied) => denied_view(&denied.reason),
//!     RouteOutcome::Redirected(_) => empty(),
//! }
//! ```
//!
//! [`RoleSnapshot`]: crate::cache::RoleSnapshot
//! [`AccessRequirement`]: crate::rbac::AccessRequirement

mod route;
mod table;

pub use route::{RoleProtectedRoute, RouteDeclaration};
pub use table::{RouteGuardMatcher, RouteTable};

use crate::error::AccessError;
use crate::navigation::Redirect;
use crate::rbac::RoleRecord;
use std::sync::Arc;

/// A refused route, ready to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenied {
    pub error: AccessError,
    /// User-facing reason
    pub reason: String,
    /// Location that was refused
    pub location: String,
}

impl AccessDenied {
    pub fn new(error: AccessError, location: impl Into<String>) -> Self {
        Self { reason: error.to_string(), error, location: location.into() }
    }
}

/// What the guard decided for one navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the protected content for this record
    Render(Arc<RoleRecord>),
    /// Show a loading placeholder
    Loading,
    Denied(AccessDenied),
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, GuardDecision::Render(_))
    }

    /// The denial or redirect cause, if any
    pub fn denial_reason(&self) -> Option<&str> {
        match self {
            GuardDecision::Denied(denied) => Some(&denied.reason),
            _ => None,
        }
    }
}

/// Result of rendering a protected route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome<T> {
    Content(T),
    Loading,
    AccessDenied(AccessDenied),
    /// The navigator was asked to perform this redirect
    Redirected(Redirect),
}

impl<T> RouteOutcome<T> {
    pub fn content(self) -> Option<T> {
        match self {
            RouteOutcome::Content(content) => Some(content),
            _ => None,
        }
    }
}
