use crate::features::world::PortalWorld;
use cucumber::{given, then, when};
use portal_rbac::rbac::RoleRecord;

// ==================== SESSION LIFECYCLE ====================

#[when(expr = "the session syncs {int} time(s)")]
async fn when_syncs(world: &mut PortalWorld, times: usize) {
    let session = world.session();
    for _ in 0..times {
        session.sync().await;
    }
}

#[when(expr = "the session syncs")]
async fn when_syncs_once(world: &mut PortalWorld) {
    world.session().sync().await;
}

#[when(expr = "the role is refreshed")]
async fn when_refreshed(world: &mut PortalWorld) {
    world.session().refresh_role().await;
}

#[when(expr = "an administrator changes the role of {string} to {string}")]
async fn when_role_changed(world: &mut PortalWorld, email: String, role: String) {
    world.directory.insert(RoleRecord::new(&email, role));
}

#[when(expr = "{string} signs in")]
async fn when_signs_in(world: &mut PortalWorld, email: String) {
    world.identity.sign_in(&email);
    world.session().sync().await;
}

#[when(expr = "the principal signs out")]
async fn when_signs_out(world: &mut PortalWorld) {
    world.identity.sign_out();
    world.session().sync().await;
}

// ==================== OUT-OF-ORDER RESPONSES ====================

#[given(expr = "a role fetch for {string} is in flight")]
async fn given_fetch_in_flight(world: &mut PortalWorld, email: String) {
    world.identity.sign_in(&email);
    let ticket = world.session().cache().begin_fetch(&email, false).expect("fetch started");
    world.pending.push(ticket);
}

#[when(expr = "the pending fetch answers with the role {string}")]
async fn when_pending_answers(world: &mut PortalWorld, role: String) {
    let ticket = world.pending.pop().expect("a pending fetch");
    let record = RoleRecord::new(&ticket.principal, role);
    world.session().cache().complete_fetch(&ticket, Ok(Some(record)));
}

// ==================== ASSERTIONS ====================

#[then(expr = "the directory was queried {int} time(s)")]
async fn then_queried(world: &mut PortalWorld, times: usize) {
    assert_eq!(world.directory.lookup_count(), times);
}

#[then(expr = "the role is {string}")]
async fn then_role(world: &mut PortalWorld, role: String) {
    assert_eq!(world.session().role_name(), Some(role));
}

#[then(expr = "the principal is an administrator")]
async fn then_admin(world: &mut PortalWorld) {
    assert!(world.session().is_admin());
}

#[then(expr = "the session has no role")]
async fn then_no_role(world: &mut PortalWorld) {
    let snapshot = world.session().snapshot();
    assert!(snapshot.record().is_none());
    assert!(snapshot.principal.is_none());
}

#[then(expr = "the principal is told no role is assigned")]
async fn then_no_role_assigned(world: &mut PortalWorld) {
    assert!(world.session().no_role_assigned());
}
