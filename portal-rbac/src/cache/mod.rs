//! Session role caching
//!
//! One [`SessionRoleCache`] per signed-in session: it fetches the principal's
//! role record once, serves it to permission checks, and keeps serving the
//! previous record while a forced refresh is in flight.

pub mod session;
pub mod state;

pub use session::{FetchTicket, SessionRoleCache};
pub use state::{RoleSnapshot, RoleState};
