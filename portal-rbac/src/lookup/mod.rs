//! Role lookup backends
//!
//! The gate never talks to a user directory itself; it asks a [`RoleLookup`]
//! for the record of one principal. Backends:
//! - [`MemoryRoleDirectory`]: in-process map, also what file directories load into
//! - [`RestRoleLookup`]: PostgREST-style `users` table (Supabase)

mod directory;
mod memory;
mod rest;

pub use directory::{load_directory, DirectoryFile};
pub use memory::MemoryRoleDirectory;
pub use rest::{RestRoleLookup, RoleRow};

use crate::config::{LookupBackend, LookupConfig};
use crate::error::LookupError;
use crate::rbac::RoleRecord;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Role lookup collaborator
///
/// Contract: case-insensitive on email; `Ok(None)` when the principal exists
/// but has no role; `Err` only for transport/service failures.
#[async_trait::async_trait]
pub trait RoleLookup: Send + Sync {
    /// Fetch the role record for a principal
    async fn lookup(&self, email: &str) -> Result<Option<RoleRecord>, LookupError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

#[async_trait::async_trait]
impl<L: RoleLookup + ?Sized> RoleLookup for Arc<L> {
    async fn lookup(&self, email: &str) -> Result<Option<RoleRecord>, LookupError> {
        (**self).lookup(email).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Build the lookup selected by configuration
pub fn build_lookup(config: &LookupConfig) -> Result<Arc<dyn RoleLookup>> {
    let lookup: Arc<dyn RoleLookup> = match config.backend {
        LookupBackend::Memory => Arc::new(MemoryRoleDirectory::new()),
        LookupBackend::File => {
            let path = config
                .directory_path
                .as_deref()
                .context("lookup.directory_path is required for the file backend")?;
            Arc::new(load_directory(path)?)
        }
        LookupBackend::Rest => Arc::new(RestRoleLookup::from_config(config)?),
    };

    log::debug!("Role lookup backend: {}", lookup.name());
    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_memory_lookup() {
        let lookup = build_lookup(&LookupConfig::default()).unwrap();
        assert_eq!(lookup.name(), "memory");
    }

    #[test]
    fn test_file_backend_requires_path() {
        let config = LookupConfig { backend: LookupBackend::File, ..LookupConfig::default() };
        assert!(build_lookup(&config).is_err());
    }
}
