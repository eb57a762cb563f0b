//! Error types for the RBAC gate

use crate::rbac::PermissionRequirement;
use thiserror::Error;

/// Why the guard refused a route
///
/// The `Display` text is the reason shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("You must be logged in to access this page")]
    NotAuthenticated,

    #[error("No role has been assigned to {email}. Please contact an administrator.")]
    NoRoleAssigned { email: String },

    /// The lookup failure message, verbatim
    #[error("{0}")]
    LookupFailed(String),

    #[error("This page requires the \"{required}\" role. Your role: \"{actual}\"")]
    InsufficientRole { required: String, actual: String },

    #[error(
        "This page is restricted to the roles: {}. Your role: \"{actual}\"",
        .allowed.join(", ")
    )]
    RoleNotAllowed { allowed: Vec<String>, actual: String },

    #[error("Missing required permissions: {}", join_permissions(.missing))]
    InsufficientPermissions { missing: Vec<PermissionRequirement> },
}

fn join_permissions(missing: &[PermissionRequirement]) -> String {
    missing.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

impl AccessError {
    /// Short machine-readable code, e.g. for logs
    pub fn code(&self) -> &'static str {
        match self {
            AccessError::NotAuthenticated => "not_authenticated",
            AccessError::NoRoleAssigned { .. } => "no_role_assigned",
            AccessError::LookupFailed(_) => "lookup_failed",
            AccessError::InsufficientRole { .. } => "insufficient_role",
            AccessError::RoleNotAllowed { .. } => "role_not_allowed",
            AccessError::InsufficientPermissions { .. } => "insufficient_permissions",
        }
    }

    /// Whether a later `refresh_role` could change the outcome
    pub fn is_retryable(&self) -> bool {
        matches!(self, AccessError::LookupFailed(_))
    }
}

/// Failures of the role lookup collaborator
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("role lookup transport error: {0}")]
    Transport(String),

    #[error("role service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("could not decode role record: {0}")]
    Decode(String),

    #[error("role lookup unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Decode(err.to_string())
    }
}
