//! Session role cache
//!
//! Holds the role record of the current principal and decides when to hit
//! the lookup again. Every mutation goes through [`SessionRoleCache::apply`]
//! under one write lock; readers take a [`RoleSnapshot`].

use super::state::{RoleSnapshot, RoleState};
use crate::error::LookupError;
use crate::lookup::RoleLookup;
use crate::rbac::{normalize_email, RoleRecord};
use std::sync::{Arc, PoisonError, RwLock};

/// Proof that a fetch was started for a principal
///
/// A completion is applied only if the ticket still matches the cache: a
/// principal switch or a newer fetch makes older tickets stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub principal: String,
    generation: u64,
}

#[derive(Debug)]
struct CacheEntry {
    snapshot: RoleSnapshot,
    generation: u64,
}

impl CacheEntry {
    fn switch_principal(&mut self, principal: Option<String>) {
        self.generation += 1;
        self.snapshot = RoleSnapshot { principal, ..RoleSnapshot::empty() };
    }
}

/// Role cache for one session
pub struct SessionRoleCache {
    lookup: Arc<dyn RoleLookup>,
    entry: RwLock<CacheEntry>,
}

impl SessionRoleCache {
    pub fn new(lookup: Arc<dyn RoleLookup>) -> Self {
        Self {
            lookup,
            entry: RwLock::new(CacheEntry { snapshot: RoleSnapshot::empty(), generation: 0 }),
        }
    }

    /// Current state of the cache
    pub fn snapshot(&self) -> RoleSnapshot {
        self.entry.read().unwrap_or_else(PoisonError::into_inner).snapshot.clone()
    }

    fn apply<R>(&self, mutate: impl FnOnce(&mut CacheEntry) -> R) -> R {
        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        mutate(&mut entry)
    }

    /// Point the cache at a principal (`None` = signed out)
    ///
    /// A different principal resets to `Idle` and invalidates in-flight
    /// fetches. Returns whether the principal changed.
    pub fn set_principal(&self, email: Option<&str>) -> bool {
        let principal = email.map(normalize_email).filter(|email| !email.is_empty());
        self.apply(|entry| {
            if entry.snapshot.principal == principal {
                return false;
            }
            log::debug!(
                "Role cache principal change: {:?} -> {:?}",
                entry.snapshot.principal,
                principal
            );
            entry.switch_principal(principal);
            true
        })
    }

    /// Drop the cached record and principal (logout)
    pub fn clear(&self) {
        self.set_principal(None);
    }

    /// Load the role for a principal, reusing any earlier attempt
    pub async fn load(&self, email: &str) -> RoleSnapshot {
        self.fetch(email, false).await
    }

    /// Load the role for a principal, always calling the lookup
    pub async fn refresh(&self, email: &str) -> RoleSnapshot {
        self.fetch(email, true).await
    }

    async fn fetch(&self, email: &str, force: bool) -> RoleSnapshot {
        let Some(ticket) = self.begin_fetch(email, force) else {
            return self.snapshot();
        };

        let outcome = self.lookup.lookup(&ticket.principal).await;
        self.complete_fetch(&ticket, outcome);
        self.snapshot()
    }

    /// Start a fetch if one is due
    ///
    /// Switches principal when `email` differs. Returns `None` when the
    /// principal already has an attempt and `force` is false. A fetch over a
    /// loaded record keeps it visible and only flags `refreshing`.
    pub fn begin_fetch(&self, email: &str, force: bool) -> Option<FetchTicket> {
        let principal = normalize_email(email);
        if principal.is_empty() {
            self.clear();
            return None;
        }

        self.apply(|entry| {
            if entry.snapshot.principal.as_deref() != Some(principal.as_str()) {
                entry.switch_principal(Some(principal.clone()));
            }

            if entry.snapshot.fetch_attempted && !force {
                return None;
            }

            entry.generation += 1;
            entry.snapshot.fetch_attempted = true;
            match entry.snapshot.state {
                RoleState::Loaded(_) => entry.snapshot.refreshing = true,
                _ => entry.snapshot.state = RoleState::Loading,
            }

            log::debug!("Fetching role for {} (force={})", principal, force);
            Some(FetchTicket { principal, generation: entry.generation })
        })
    }

    /// Apply a lookup outcome; returns false if the ticket went stale
    pub fn complete_fetch(
        &self,
        ticket: &FetchTicket,
        outcome: Result<Option<RoleRecord>, LookupError>,
    ) -> bool {
        self.apply(|entry| {
            let current = entry.snapshot.principal.as_deref() == Some(ticket.principal.as_str());
            if !current || entry.generation != ticket.generation {
                log::debug!("Discarding stale role response for {}", ticket.principal);
                return false;
            }

            entry.snapshot.refreshing = false;
            entry.snapshot.state = match outcome {
                Ok(Some(record)) => {
                    log::info!(
                        "🔐 Role loaded for {}: {}{}",
                        ticket.principal,
                        record.role_name,
                        if record.is_admin { " (admin)" } else { "" }
                    );
                    RoleState::Loaded(Arc::new(record.normalized()))
                }
                Ok(None) => {
                    log::warn!("No role assigned to {}", ticket.principal);
                    RoleState::NoRole
                }
                Err(e) => {
                    log::error!("❌ Role lookup failed for {}: {}", ticket.principal, e);
                    RoleState::Errored(e.to_string())
                }
            };
            true
        })
    }

    /// Name of the lookup backend
    pub fn lookup_name(&self) -> &str {
        self.lookup.name()
    }
}
