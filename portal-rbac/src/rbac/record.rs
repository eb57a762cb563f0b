//! Role records: the authorization profile of one principal

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Action marker meaning "every action on this resource"
pub const WILDCARD_ACTION: &str = "*";

/// Resource key whose wildcard entry grants every action on every resource
pub const ALL_RESOURCES: &str = "all";

/// Action used when a caller does not name one
pub const DEFAULT_ACTION: &str = "read";

/// Normalize a principal email (trimmed, lower-cased)
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Resource name -> allowed action names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMap(BTreeMap<String, BTreeSet<String>>);

impl PermissionMap {
    /// Create an empty permission map
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant actions on a resource
    pub fn with_grant<I, S>(mut self, resource: impl Into<String>, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(resource.into())
            .or_default()
            .extend(actions.into_iter().map(Into::into));
        self
    }

    /// Grant every action on every resource
    pub fn everything() -> Self {
        Self::new().with_grant(ALL_RESOURCES, [WILDCARD_ACTION])
    }

    /// Allowed actions for a resource, if it has an entry
    pub fn actions(&self, resource: &str) -> Option<&BTreeSet<String>> {
        self.0.get(resource)
    }

    /// Whether the resource entry lists the action or the wildcard
    pub fn grants(&self, resource: &str, action: &str) -> bool {
        self.actions(resource)
            .map(|actions| actions.contains(action) || actions.contains(WILDCARD_ACTION))
            .unwrap_or(false)
    }

    /// Whether the `all` entry holds the wildcard
    pub fn grants_everything(&self) -> bool {
        self.actions(ALL_RESOURCES)
            .map(|actions| actions.contains(WILDCARD_ACTION))
            .unwrap_or(false)
    }

    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<R, A> FromIterator<(R, Vec<A>)> for PermissionMap
where
    R: Into<String>,
    A: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (R, Vec<A>)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (resource, actions)| map.with_grant(resource, actions))
    }
}

/// Authorization profile of one principal
///
/// A record is loaded as a whole and never edited in place: a refresh swaps
/// the cached record for a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    /// Normalized (lower-cased) principal email
    pub email: String,

    /// Role label, e.g. "Manager"
    #[serde(alias = "role", alias = "roleName")]
    pub role_name: String,

    /// Super-admin override for every permission check
    #[serde(default, alias = "isAdmin")]
    pub is_admin: bool,

    /// Descriptive only, never consulted for authorization
    #[serde(default, alias = "divisionName")]
    pub division_name: Option<String>,

    #[serde(default)]
    pub permissions: PermissionMap,
}

impl RoleRecord {
    /// Create a record with no permissions
    pub fn new(email: impl AsRef<str>, role_name: impl Into<String>) -> Self {
        Self {
            email: normalize_email(email.as_ref()),
            role_name: role_name.into(),
            is_admin: false,
            division_name: None,
            permissions: PermissionMap::new(),
        }
    }

    /// Set the admin flag
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Set the division
    pub fn with_division(mut self, division: impl Into<String>) -> Self {
        self.division_name = Some(division.into());
        self
    }

    /// Replace the permission map
    pub fn with_permissions(mut self, permissions: PermissionMap) -> Self {
        self.permissions = permissions;
        self
    }

    /// Grant actions on one resource
    pub fn with_grant<I, S>(mut self, resource: impl Into<String>, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = self.permissions.with_grant(resource, actions);
        self
    }

    /// Lower-case the email in place; lookups hand back records as stored
    pub fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self
    }
}
