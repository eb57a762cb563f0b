//! Portal RBAC - role-based access gate for intranet portals
//!
//! Resolves the signed-in principal's role from a role directory, caches it
//! per session and decides, route by route, whether protected content may be
//! shown.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use portal_rbac::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PortalConfig::load()?;
//!     init_logging(&config.logging)?;
//!
//!     let lookup = build_lookup(&config.lookup)?;
//!     let identity = Arc::new(StaticIdentity::signed_in("ana@corp.com"));
//!     let session = RoleSession::with_config(identity, lookup, config.rbac.clone());
//!     session.sync().await;
//!
//!     let route = RoleProtectedRoute::from_config(
//!         AccessRequirement::new().with_permission("Payments", "approve"),
//!         &config.rbac,
//!     );
//!     match session.guard(&route, "/payments") {
//!         GuardDecision::Render(record) => println!("welcome {}", record.role_name),
//!         other => println!("{:?}", other),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`rbac`] - role records, permission maps and the pure evaluators
//! - [`lookup`] - role directories (memory, file, PostgREST)
//! - [`cache`] - per-session role cache with stale-response rejection
//! - [`guard`] - route guards and route tables
//! - [`session`] - the facade tying identity, cache and guards together
//! - [`config`] - TOML + environment configuration
//! - [`logging`] - `log` backend with human, JSON and logfmt output

pub mod cache;
pub mod config; // TOML configuration with env overrides
pub mod error;
pub mod guard;
pub mod identity;
pub mod logging; // log crate backend
pub mod lookup;
pub mod navigation;
pub mod rbac;
pub mod session;

// Prelude module for convenient imports
pub mod prelude;

pub use cache::{RoleSnapshot, RoleState, SessionRoleCache};
pub use config::PortalConfig;
pub use error::{AccessError, LookupError};
pub use guard::{GuardDecision, RoleProtectedRoute, RouteOutcome, RouteTable};
pub use rbac::{AccessRequirement, PermissionMap, RoleRecord};
pub use session::RoleSession;
