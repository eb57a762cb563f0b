//! Out-of-order lookup responses across principal switches

use async_trait::async_trait;
use portal_rbac::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// Lookup whose answers are released by the test, one per email
#[derive(Default)]
struct GatedLookup {
    gates: Mutex<HashMap<String, oneshot::Receiver<Option<RoleRecord>>>>,
}

impl GatedLookup {
    fn gate(&self, email: &str) -> oneshot::Sender<Option<RoleRecord>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(email.to_string(), rx);
        tx
    }
}

#[async_trait]
impl RoleLookup for GatedLookup {
    async fn lookup(&self, email: &str) -> Result<Option<RoleRecord>, LookupError> {
        let gate = self.gates.lock().unwrap().remove(email);
        match gate {
            Some(rx) => rx.await.map_err(|_| LookupError::Unavailable("gate dropped".into())),
            None => Ok(None),
        }
    }

    fn name(&self) -> &str {
        "gated"
    }
}

async fn wait_until_loading(session: &RoleSession, email: &str) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = session.snapshot();
            if snapshot.is_loading() && snapshot.principal.as_deref() == Some(email) {
                break;
            }
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("fetch never started");
}

#[tokio::test]
async fn test_late_response_for_previous_principal_is_ignored() {
    let lookup = Arc::new(GatedLookup::default());
    let release_a = lookup.gate("a@corp.com");
    let release_b = lookup.gate("b@corp.com");

    let identity = Arc::new(StaticIdentity::signed_in("a@corp.com"));
    let session = Arc::new(RoleSession::new(identity.clone(), lookup.clone()));

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.sync().await }
    });
    wait_until_loading(&session, "a@corp.com").await;

    identity.sign_in("b@corp.com");
    let second = tokio::spawn({
        let session = session.clone();
        async move { session.sync().await }
    });
    wait_until_loading(&session, "b@corp.com").await;

    release_b.send(Some(RoleRecord::new("b@corp.com", "Finance Manager"))).unwrap();
    second.await.unwrap();
    assert_eq!(session.role_name().as_deref(), Some("Finance Manager"));

    release_a.send(Some(RoleRecord::new("a@corp.com", "CFO").with_admin(true))).unwrap();
    first.await.unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.principal.as_deref(), Some("b@corp.com"));
    assert_eq!(snapshot.role_name(), Some("Finance Manager"));
    assert!(!session.is_admin());
}

#[tokio::test]
async fn test_response_after_sign_out_is_ignored() {
    let lookup = Arc::new(GatedLookup::default());
    let release = lookup.gate("a@corp.com");

    let identity = Arc::new(StaticIdentity::signed_in("a@corp.com"));
    let session = Arc::new(RoleSession::new(identity.clone(), lookup.clone()));

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.sync().await }
    });
    wait_until_loading(&session, "a@corp.com").await;

    identity.sign_out();
    session.sync().await;

    release.send(Some(RoleRecord::new("a@corp.com", "IT").with_admin(true))).unwrap();
    pending.await.unwrap();

    let snapshot = session.snapshot();
    assert!(snapshot.principal.is_none());
    assert!(snapshot.record().is_none());
}

#[tokio::test]
async fn test_refresh_keeps_old_record_until_answer_arrives() {
    let lookup = Arc::new(GatedLookup::default());
    let initial = lookup.gate("a@corp.com");

    let identity = Arc::new(StaticIdentity::signed_in("a@corp.com"));
    let session = Arc::new(RoleSession::new(identity, lookup.clone()));

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.sync().await }
    });
    wait_until_loading(&session, "a@corp.com").await;
    initial.send(Some(RoleRecord::new("a@corp.com", "Employee"))).unwrap();
    first.await.unwrap();

    let updated = lookup.gate("a@corp.com");
    let refresh = tokio::spawn({
        let session = session.clone();
        async move { session.refresh_role().await }
    });

    tokio::time::timeout(Duration::from_secs(5), async {
        while !session.snapshot().refreshing {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("refresh never started");

    assert!(!session.is_loading());
    assert!(session.has_role("Employee"));
    let route = RoleProtectedRoute::new(AccessRequirement::new());
    assert!(session.guard(&route, "/").is_render());

    updated.send(Some(RoleRecord::new("a@corp.com", "Manager"))).unwrap();
    refresh.await.unwrap();
    assert!(session.has_role("Manager"));
}
