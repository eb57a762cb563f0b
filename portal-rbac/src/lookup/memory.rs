//! In-memory role directory
//!
//! Thread-safe map keyed by normalized email. Suitable for development,
//! tests and directories loaded from a file at startup.

use super::RoleLookup;
use crate::error::LookupError;
use crate::rbac::{normalize_email, RoleRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory role directory
///
/// # Example
///
/// ```
/// use portal_rbac::lookup::MemoryRoleDirectory;
/// use portal_rbac::rbac::RoleRecord;
///
/// let directory = MemoryRoleDirectory::new()
///     .with_record(RoleRecord::new("ana@corp.com", "Manager"));
/// assert_eq!(directory.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MemoryRoleDirectory {
    records: Arc<RwLock<HashMap<String, RoleRecord>>>,
    lookups: Arc<AtomicUsize>,
}

impl MemoryRoleDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from records
    pub fn from_records(records: impl IntoIterator<Item = RoleRecord>) -> Self {
        let directory = Self::new();
        for record in records {
            directory.insert(record);
        }
        directory
    }

    /// Add a record (builder style)
    pub fn with_record(self, record: RoleRecord) -> Self {
        self.insert(record);
        self
    }

    /// Insert or replace the record for its email
    ///
    /// Returns the previous record, if any.
    pub fn insert(&self, record: RoleRecord) -> Option<RoleRecord> {
        let record = record.normalized();
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.insert(record.email.clone(), record)
    }

    /// Remove the record for an email (the principal keeps existing, without a role)
    pub fn remove(&self, email: &str) -> Option<RoleRecord> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.remove(&normalize_email(email))
    }

    /// Record for an email, without counting it as a lookup
    pub fn get(&self, email: &str) -> Option<RoleRecord> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(&normalize_email(email)).cloned()
    }

    /// Number of lookups served so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records, sorted by email
    pub fn records(&self) -> Vec<RoleRecord> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<RoleRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| a.email.cmp(&b.email));
        all
    }
}

#[async_trait::async_trait]
impl RoleLookup for MemoryRoleDirectory {
    async fn lookup(&self, email: &str) -> Result<Option<RoleRecord>, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(email))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let directory =
            MemoryRoleDirectory::new().with_record(RoleRecord::new("Ana@Corp.com", "Manager"));

        let record = directory.lookup("ANA@corp.COM").await.unwrap();
        assert_eq!(record.map(|r| r.role_name), Some("Manager".to_string()));
        assert_eq!(directory.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_principal_is_none_not_error() {
        let directory = MemoryRoleDirectory::new();
        assert!(directory.lookup("ghost@corp.com").await.unwrap().is_none());
    }

    #[test]
    fn test_insert_replaces_and_remove() {
        let directory = MemoryRoleDirectory::new();
        assert!(directory.insert(RoleRecord::new("a@corp.com", "Employee")).is_none());
        let previous = directory.insert(RoleRecord::new("a@corp.com", "Manager"));
        assert_eq!(previous.map(|r| r.role_name), Some("Employee".to_string()));
        assert_eq!(directory.len(), 1);

        assert!(directory.remove("A@corp.com").is_some());
        assert!(directory.is_empty());
    }

    #[test]
    fn test_records_are_sorted() {
        let directory = MemoryRoleDirectory::from_records([
            RoleRecord::new("zed@corp.com", "Employee"),
            RoleRecord::new("amy@corp.com", "Manager"),
        ]);
        let emails: Vec<_> = directory.records().into_iter().map(|r| r.email).collect();
        assert_eq!(emails, vec!["amy@corp.com", "zed@corp.com"]);
    }
}
