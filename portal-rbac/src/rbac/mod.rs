//! Portal RBAC permission model
//!
//! A principal's authorization profile is a [`RoleRecord`]: a role name, a
//! super-admin flag and a resource -> actions [`PermissionMap`]. Routes
//! declare what they need with an [`AccessRequirement`].
//!
//! # Wildcards
//! - `"*"` inside a resource entry grants every action on that resource
//! - `"all": ["*"]` grants every action on every resource
//!
//! # Example
//! ```rust
//! use portal_rbac::rbac::{has_permission, RoleRecord};
//!
//! let record = RoleRecord::new("ana@corp.com", "Finance Manager")
//!     .with_grant("Payments", ["read", "approve"]);
//!
//! assert!(has_permission(Some(&record), "Payments", "approve"));
//! assert!(!has_permission(Some(&record), "Assets", "read"));
//! ```

mod evaluator;
mod record;
mod requirement;

pub use evaluator::{
    check_resource_access, check_resource_read, has_permission, PermissionChecker,
    WildcardPermissionChecker,
};
pub use record::{
    normalize_email, PermissionMap, RoleRecord, ALL_RESOURCES, DEFAULT_ACTION, WILDCARD_ACTION,
};
pub use requirement::{AccessRequirement, PermissionRequirement};
