//! Role cache states and read snapshots

use crate::rbac::RoleRecord;
use std::sync::Arc;

/// Where the current principal's role fetch stands
///
/// `Idle -> Loading -> {Loaded, NoRole, Errored}`. The last three are terminal
/// for a principal until a refresh or a principal change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleState {
    /// No fetch started for the current principal
    Idle,
    /// First fetch in flight, nothing cached yet
    Loading,
    Loaded(Arc<RoleRecord>),
    /// The principal exists but has no role record
    NoRole,
    /// The lookup failed; the message is shown verbatim
    Errored(String),
}

impl RoleState {
    pub fn label(&self) -> &'static str {
        match self {
            RoleState::Idle => "idle",
            RoleState::Loading => "loading",
            RoleState::Loaded(_) => "loaded",
            RoleState::NoRole => "no-role",
            RoleState::Errored(_) => "errored",
        }
    }

    /// Whether a fetch outcome has been applied
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoleState::Loaded(_) | RoleState::NoRole | RoleState::Errored(_))
    }
}

/// Immutable view of the cache at one instant
///
/// Cloning is cheap: the record is shared, never copied or mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSnapshot {
    /// Normalized email of the current principal
    pub principal: Option<String>,
    pub state: RoleState,
    /// A forced refresh is in flight over a loaded record
    pub refreshing: bool,
    /// A fetch was issued for this principal
    pub fetch_attempted: bool,
}

impl RoleSnapshot {
    pub(crate) fn empty() -> Self {
        Self { principal: None, state: RoleState::Idle, refreshing: false, fetch_attempted: false }
    }

    /// The cached record, stale or not
    pub fn record(&self) -> Option<&RoleRecord> {
        match &self.state {
            RoleState::Loaded(record) => Some(record),
            _ => None,
        }
    }

    /// Shared handle on the cached record
    pub fn record_arc(&self) -> Option<Arc<RoleRecord>> {
        match &self.state {
            RoleState::Loaded(record) => Some(Arc::clone(record)),
            _ => None,
        }
    }

    /// Waiting on a first fetch (nothing to show yet)
    pub fn is_loading(&self) -> bool {
        matches!(self.state, RoleState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RoleState::Errored(message) => Some(message),
            _ => None,
        }
    }

    pub fn no_role_assigned(&self) -> bool {
        matches!(self.state, RoleState::NoRole)
    }

    pub fn is_admin(&self) -> bool {
        self.record().map(|record| record.is_admin).unwrap_or(false)
    }

    pub fn role_name(&self) -> Option<&str> {
        self.record().map(|record| record.role_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_accessors() {
        let record = Arc::new(RoleRecord::new("a@corp.com", "Manager").with_admin(true));
        let snapshot = RoleSnapshot {
            principal: Some("a@corp.com".into()),
            state: RoleState::Loaded(record),
            refreshing: false,
            fetch_attempted: true,
        };

        assert_eq!(snapshot.role_name(), Some("Manager"));
        assert!(snapshot.is_admin());
        assert!(!snapshot.is_loading());
        assert!(snapshot.error().is_none());
        assert!(snapshot.state.is_terminal());
    }

    #[test]
    fn test_states_without_record() {
        let mut snapshot = RoleSnapshot::empty();
        assert!(snapshot.record().is_none());
        assert!(!snapshot.state.is_terminal());

        snapshot.state = RoleState::Errored("boom".into());
        assert_eq!(snapshot.error(), Some("boom"));
        assert!(!snapshot.is_admin());

        snapshot.state = RoleState::NoRole;
        assert!(snapshot.no_role_assigned());
        assert_eq!(snapshot.state.label(), "no-role");
    }
}
