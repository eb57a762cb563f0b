use crate::features::world::PortalWorld;
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use portal_rbac::guard::RouteOutcome;
use portal_rbac::identity::IdentityProvider;
use portal_rbac::rbac::{PermissionRequirement, RoleRecord};

// ==================== BACKGROUND ====================

#[given(expr = "the role directory contains:")]
async fn given_directory(world: &mut PortalWorld, step: &Step) {
    let table = step.table.as_ref().expect("directory table");

    for row in table.rows.iter().skip(1) {
        let mut record = RoleRecord::new(&row[0], row[1].as_str()).with_admin(row[2] == "true");
        for grant in row[3].split(',').map(str::trim).filter(|g| !g.is_empty()) {
            let permission: PermissionRequirement = grant.parse().expect("resource:action");
            record = record.with_grant(permission.resource, [permission.action]);
        }
        world.directory.insert(record);
    }
}

#[given(expr = "{string} is signed in")]
async fn given_signed_in(world: &mut PortalWorld, email: String) {
    world.identity.sign_in(&email);
}

#[given(expr = "nobody is signed in")]
async fn given_anonymous(world: &mut PortalWorld) {
    world.identity.sign_out();
}

#[given(expr = "the role directory is unavailable with {string}")]
async fn given_directory_down(world: &mut PortalWorld, message: String) {
    world.lookup_failure = Some(message);
}

#[given(expr = "denials redirect to {string}")]
async fn given_redirect_mode(world: &mut PortalWorld, path: String) {
    world.config.show_access_denied = false;
    world.config.fallback_path = path;
}

// ==================== ROUTE REQUIREMENTS ====================

#[given(expr = "the route requires the role {string}")]
async fn given_required_role(world: &mut PortalWorld, role: String) {
    world.requirement.required_role = Some(role);
}

#[given(expr = "the route allows the roles {string}")]
async fn given_allowed_roles(world: &mut PortalWorld, roles: String) {
    world.requirement.allowed_roles = roles.split(',').map(|r| r.trim().to_string()).collect();
}

#[given(expr = "the route requires the permission {string}")]
async fn given_required_permission(world: &mut PortalWorld, permission: String) {
    let permission: PermissionRequirement = permission.parse().expect("resource:action");
    world.requirement.required_permissions.push(permission);
}

// ==================== NAVIGATION ====================

#[when(expr = "the principal opens {string}")]
async fn when_opens(world: &mut PortalWorld, location: String) {
    world.session().sync().await;
    world.open(&location);
}

#[when(expr = "the principal opens {string} before the role arrives")]
async fn when_opens_while_loading(world: &mut PortalWorld, location: String) {
    let session = world.session();
    if let Some(email) = world.identity.principal() {
        if let Some(ticket) = session.cache().begin_fetch(&email, false) {
            world.pending.push(ticket);
        }
    }
    world.open(&location);
}

// ==================== OUTCOMES ====================

#[then(expr = "the page is rendered")]
async fn then_rendered(world: &mut PortalWorld) {
    match &world.outcome {
        Some(RouteOutcome::Content(_)) => {}
        other => panic!("expected content, got {:?}", other),
    }
}

#[then(expr = "the page is rendered for the role {string}")]
async fn then_rendered_for(world: &mut PortalWorld, role: String) {
    let content = world.outcome.clone().and_then(RouteOutcome::content);
    assert_eq!(content, Some(format!("{} page", role)));
}

#[then(expr = "access is denied with {string}")]
async fn then_denied(world: &mut PortalWorld, reason: String) {
    match &world.outcome {
        Some(RouteOutcome::AccessDenied(denied)) => assert_eq!(denied.reason, reason),
        other => panic!("expected a denial, got {:?}", other),
    }
}

#[then(expr = "a loading placeholder is shown")]
async fn then_loading(world: &mut PortalWorld) {
    assert_eq!(world.outcome, Some(RouteOutcome::Loading));
}

#[then(expr = "the navigator is sent to {string}")]
async fn then_redirected(world: &mut PortalWorld, location: String) {
    assert!(matches!(world.outcome, Some(RouteOutcome::Redirected(_))));
    let redirect = world.navigator.last().expect("a redirect");
    assert_eq!(redirect.location(&world.config.return_param), location);
}
