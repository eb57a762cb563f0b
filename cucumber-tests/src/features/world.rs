use async_trait::async_trait;
use cucumber::World as CucumberWorld;
use portal_rbac::cache::FetchTicket;
use portal_rbac::config::RbacConfig;
use portal_rbac::error::LookupError;
use portal_rbac::guard::{RoleProtectedRoute, RouteOutcome};
use portal_rbac::identity::StaticIdentity;
use portal_rbac::lookup::{MemoryRoleDirectory, RoleLookup};
use portal_rbac::navigation::RecordingNavigator;
use portal_rbac::rbac::{AccessRequirement, RoleRecord};
use portal_rbac::RoleSession;
use std::sync::Arc;

/// Directory that is down
pub struct FailingLookup {
    pub message: String,
}

#[async_trait]
impl RoleLookup for FailingLookup {
    async fn lookup(&self, _email: &str) -> Result<Option<RoleRecord>, LookupError> {
        Err(LookupError::Unavailable(self.message.clone()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[derive(CucumberWorld)]
pub struct PortalWorld {
    pub directory: MemoryRoleDirectory,
    /// When set, every lookup fails with this message
    pub lookup_failure: Option<String>,
    pub identity: Arc<StaticIdentity>,
    pub config: RbacConfig,
    session: Option<Arc<RoleSession>>,
    pub requirement: AccessRequirement,
    pub navigator: RecordingNavigator,
    pub outcome: Option<RouteOutcome<String>>,
    /// Fetches started by hand and not yet answered
    pub pending: Vec<FetchTicket>,
}

impl std::fmt::Debug for PortalWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalWorld")
            .field("directory", &self.directory.len())
            .field("config", &self.config)
            .field("requirement", &self.requirement)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl Default for PortalWorld {
    fn default() -> Self {
        Self {
            directory: MemoryRoleDirectory::new(),
            lookup_failure: None,
            identity: Arc::new(StaticIdentity::anonymous()),
            config: RbacConfig::default(),
            session: None,
            requirement: AccessRequirement::new(),
            navigator: RecordingNavigator::new(),
            outcome: None,
            pending: Vec::new(),
        }
    }
}

impl PortalWorld {
    /// The session under test, created on first use
    pub fn session(&mut self) -> Arc<RoleSession> {
        if let Some(session) = &self.session {
            return session.clone();
        }

        let lookup: Arc<dyn RoleLookup> = match &self.lookup_failure {
            Some(message) => Arc::new(FailingLookup { message: message.clone() }),
            None => Arc::new(self.directory.clone()),
        };
        let session =
            Arc::new(RoleSession::with_config(self.identity.clone(), lookup, self.config.clone()));
        self.session = Some(session.clone());
        session
    }

    pub fn route(&self) -> RoleProtectedRoute {
        RoleProtectedRoute::from_config(self.requirement.clone(), &self.config)
    }

    /// Render the current route at `location` with the session's snapshot
    pub fn open(&mut self, location: &str) {
        let snapshot = self.session().snapshot();
        let outcome = self.route().render(&snapshot, location, &self.navigator, |record| {
            format!("{} page", record.role_name)
        });
        self.outcome = Some(outcome);
    }
}
