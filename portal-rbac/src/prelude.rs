//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use portal_rbac::prelude::*;
//! ```

// === Records and evaluation ===
pub use crate::rbac::{
    check_resource_access, check_resource_read, has_permission, AccessRequirement,
    PermissionChecker, PermissionMap, PermissionRequirement, RoleRecord,
    WildcardPermissionChecker,
};

// === Lookup ===
pub use crate::lookup::{
    build_lookup, load_directory, MemoryRoleDirectory, RestRoleLookup, RoleLookup,
};

// === Session state ===
pub use crate::cache::{RoleSnapshot, RoleState, SessionRoleCache};
pub use crate::identity::{IdentityProvider, StaticIdentity};
pub use crate::session::RoleSession;

// === Guards ===
pub use crate::guard::{AccessDenied, GuardDecision, RoleProtectedRoute, RouteOutcome, RouteTable};
pub use crate::navigation::{Navigator, RecordingNavigator, Redirect};

// === Configuration and logging ===
pub use crate::config::{LookupBackend, LookupConfig, PortalConfig, RbacConfig};
pub use crate::logging::{init_logging, LoggingConfig};

// === Errors ===
pub use crate::error::{AccessError, LookupError};
