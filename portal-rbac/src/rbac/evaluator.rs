//! Permission evaluation over a cached role record
//!
//! Pure functions: no I/O, no locking, no panics on empty maps.

use super::record::{RoleRecord, DEFAULT_ACTION};

/// Can the principal perform `action` on `resource`?
///
/// Order: absent record denies, admin allows, an `all: ["*"]` grant allows,
/// otherwise the resource entry must list the action or the wildcard.
pub fn has_permission(record: Option<&RoleRecord>, resource: &str, action: &str) -> bool {
    let Some(record) = record else {
        return false;
    };

    if record.is_admin {
        return true;
    }

    if record.permissions.grants_everything() {
        return true;
    }

    record.permissions.grants(resource, action)
}

/// Every action must pass `has_permission`; an empty list is vacuously true
pub fn check_resource_access<S: AsRef<str>>(
    record: Option<&RoleRecord>,
    resource: &str,
    actions: &[S],
) -> bool {
    actions.iter().all(|action| has_permission(record, resource, action.as_ref()))
}

/// `check_resource_access` with the default `read` action
pub fn check_resource_read(record: Option<&RoleRecord>, resource: &str) -> bool {
    check_resource_access(record, resource, &[DEFAULT_ACTION])
}

/// Pluggable permission checks over a role record
pub trait PermissionChecker: Send + Sync {
    fn has_permission(&self, record: Option<&RoleRecord>, resource: &str, action: &str) -> bool;
}

/// The wildcard/admin evaluation above
#[derive(Debug, Clone, Copy, Default)]
pub struct WildcardPermissionChecker;

impl PermissionChecker for WildcardPermissionChecker {
    fn has_permission(&self, record: Option<&RoleRecord>, resource: &str, action: &str) -> bool {
        has_permission(record, resource, action)
    }
}
