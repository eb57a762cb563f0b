//! Identity provider capability
//!
//! Authentication itself (MSAL, OAuth, ...) lives outside this crate. The gate
//! only needs to know who is signed in and whether a sign-in interaction is
//! still running.

use crate::rbac::normalize_email;
use std::sync::{PoisonError, RwLock};

/// Source of the current principal
pub trait IdentityProvider: Send + Sync {
    /// Email of the signed-in principal, if any
    fn principal(&self) -> Option<String>;

    /// A login/redirect interaction is in progress
    fn interaction_in_progress(&self) -> bool {
        false
    }
}

#[derive(Debug, Default)]
struct IdentityState {
    principal: Option<String>,
    interacting: bool,
}

/// Identity set explicitly by the embedding application
#[derive(Debug, Default)]
pub struct StaticIdentity {
    state: RwLock<IdentityState>,
}

impl StaticIdentity {
    /// Nobody signed in
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(email: &str) -> Self {
        let identity = Self::default();
        identity.sign_in(email);
        identity
    }

    pub fn sign_in(&self, email: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.principal = Some(normalize_email(email));
        state.interacting = false;
    }

    pub fn sign_out(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.principal = None;
    }

    pub fn set_interaction(&self, in_progress: bool) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).interacting = in_progress;
    }
}

impl IdentityProvider for StaticIdentity {
    fn principal(&self) -> Option<String> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).principal.clone()
    }

    fn interaction_in_progress(&self) -> bool {
        self.state.read().unwrap_or_else(PoisonError::into_inner).interacting
    }
}
