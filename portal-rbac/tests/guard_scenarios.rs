//! End-to-end guard decisions through a role session

use portal_rbac::prelude::*;
use std::sync::Arc;

fn directory() -> MemoryRoleDirectory {
    MemoryRoleDirectory::from_records([
        RoleRecord::new("ana@corp.com", "Finance Manager")
            .with_division("Finance")
            .with_grant("Payments", ["read", "approve"]),
        RoleRecord::new("bo@corp.com", "Employee").with_grant("Payments", ["read"]),
        RoleRecord::new("root@corp.com", "IT").with_admin(true),
        RoleRecord::new("aud@corp.com", "Auditor").with_grant("all", ["*"]),
        RoleRecord::new("intern@corp.com", "Intern").with_grant("all", ["read"]),
    ])
}

async fn session_for(email: &str) -> RoleSession {
    let identity = Arc::new(StaticIdentity::signed_in(email));
    let session = RoleSession::new(identity, Arc::new(directory()));
    session.sync().await;
    session
}

fn approvals() -> RoleProtectedRoute {
    RoleProtectedRoute::new(
        AccessRequirement::new()
            .with_allowed_roles(["Finance Manager", "CFO"])
            .with_permission("Payments", "approve"),
    )
}

#[tokio::test]
async fn test_permitted_principal_sees_content() {
    let session = session_for("ana@corp.com").await;
    let navigator = RecordingNavigator::new();

    let outcome = approvals().render(&session.snapshot(), "/approvals", &navigator, |record| {
        format!("approvals for {}", record.division_name.as_deref().unwrap_or("-"))
    });

    assert_eq!(outcome.content().as_deref(), Some("approvals for Finance"));
    assert!(navigator.redirects().is_empty());
}

#[tokio::test]
async fn test_role_outside_allowed_set_is_denied() {
    let session = session_for("bo@corp.com").await;

    let decision = session.guard(&approvals(), "/approvals");
    let GuardDecision::Denied(denied) = decision else {
        panic!("expected a denial, got {:?}", decision);
    };
    assert!(matches!(denied.error, AccessError::RoleNotAllowed { .. }));
    assert!(denied.reason.contains("Employee"));
    assert_eq!(denied.location, "/approvals");
}

#[tokio::test]
async fn test_admin_bypasses_every_requirement() {
    let session = session_for("root@corp.com").await;
    let route = RoleProtectedRoute::new(
        AccessRequirement::new()
            .with_required_role("CFO")
            .with_permission("Payroll", "delete"),
    );

    assert!(session.guard(&route, "/payroll").is_render());
    assert!(session.has_permission("Anything", "delete"));
}

#[tokio::test]
async fn test_all_resources_wildcard_covers_every_resource() {
    let auditor = session_for("aud@corp.com").await;
    assert!(!auditor.is_admin());
    assert!(auditor.check_resource_access("Payments", None));
    assert!(auditor.check_resource_access("Assets", Some(&["read", "update"][..])));

    let intern = session_for("intern@corp.com").await;
    assert!(intern.check_resource_access("all", None));
    assert!(!intern.check_resource_access("Payments", None));
}

#[tokio::test]
async fn test_missing_permissions_are_all_listed() {
    let session = session_for("bo@corp.com").await;
    let route = RoleProtectedRoute::new(
        AccessRequirement::new()
            .with_permission("Payments", "approve")
            .with_permission("Payments", "read")
            .with_permission("Assets", "delete"),
    );

    let decision = session.guard(&route, "/payments/approve");
    assert_eq!(
        decision.denial_reason(),
        Some("Missing required permissions: Payments:approve, Assets:delete")
    );
}

#[tokio::test]
async fn test_unknown_principal_gets_no_role_message() {
    let session = session_for("ghost@corp.com").await;

    let decision = session.guard(&RoleProtectedRoute::new(AccessRequirement::new()), "/");
    assert_eq!(
        decision.denial_reason(),
        Some("No role has been assigned to ghost@corp.com. Please contact an administrator.")
    );
}

#[tokio::test]
async fn test_denial_redirects_with_return_location() {
    let session = session_for("bo@corp.com").await;
    let navigator = RecordingNavigator::new();
    let route = approvals().with_show_access_denied(false).with_fallback_path("/denied");

    let outcome = route.render(&session.snapshot(), "/approvals?id=7", &navigator, |_| ());

    assert_eq!(outcome, RouteOutcome::Redirected(Redirect::new("/denied", "/approvals?id=7")));
    let redirect = navigator.last().unwrap();
    assert_eq!(redirect.location("returnTo"), "/denied?returnTo=%2Fapprovals%3Fid%3D7");
}

#[tokio::test]
async fn test_anonymous_session_must_log_in() {
    let session = RoleSession::new(Arc::new(StaticIdentity::anonymous()), Arc::new(directory()));
    session.sync().await;

    let decision = session.guard(&approvals(), "/approvals");
    assert_eq!(decision.denial_reason(), Some("You must be logged in to access this page"));
}

#[tokio::test]
async fn test_route_table_from_config() {
    let config = RbacConfig { show_access_denied: false, ..RbacConfig::default() };
    let table = RouteTable::from_toml_str(
        r#"
[[routes]]
pattern = "/finance/*"
allowed_roles = ["Finance Manager"]

[[routes]]
pattern = "/admin/*"
required_role = "IT"
"#,
        &config,
    )
    .unwrap();

    let ana = session_for("ana@corp.com").await;
    assert!(table.decide(&ana.snapshot(), "/finance/payments").unwrap().is_render());
    assert_eq!(
        table.decide(&ana.snapshot(), "/admin/users"),
        Some(GuardDecision::Redirect(Redirect::new("/login", "/admin/users")))
    );
    assert!(table.decide(&ana.snapshot(), "/news").is_none());
}
