//! Client-side navigation capability
//!
//! The guard never navigates by itself: when a route is configured to
//! redirect instead of showing a denial, it hands a [`Redirect`] to the
//! application's [`Navigator`].

use std::sync::{Mutex, PoisonError};

/// A redirect to the fallback path that remembers where the principal was going
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Fallback path, e.g. `/login`
    pub to: String,
    /// Originally requested location
    pub from: String,
}

impl Redirect {
    pub fn new(to: impl Into<String>, from: impl Into<String>) -> Self {
        Self { to: to.into(), from: from.into() }
    }

    /// Fallback URL carrying the original location as a query parameter
    ///
    /// `Redirect::new("/login", "/payments?id=7").location("returnTo")`
    /// gives `/login?returnTo=%2Fpayments%3Fid%3D7`.
    pub fn location(&self, return_param: &str) -> String {
        let separator = if self.to.contains('?') { '&' } else { '?' };
        format!("{}{}{}={}", self.to, separator, return_param, urlencoding::encode(&self.from))
    }
}

/// Performs client-side redirects
pub trait Navigator: Send + Sync {
    fn redirect(&self, redirect: &Redirect);
}

/// Navigator that records redirects instead of performing them
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<Redirect>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redirects received so far, oldest first
    pub fn redirects(&self) -> Vec<Redirect> {
        self.redirects.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last(&self) -> Option<Redirect> {
        self.redirects.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, redirect: &Redirect) {
        log::debug!("Redirecting {} -> {}", redirect.from, redirect.to);
        self.redirects.lock().unwrap_or_else(PoisonError::into_inner).push(redirect.clone());
    }
}
