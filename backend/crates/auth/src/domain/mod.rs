//! Domain Layer
//!
//! Contains entities, value objects, the lockout guard, and store traits.

pub mod entity;
pub mod lockout;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::account::Account;
pub use entity::session::{SessionId, SessionPhase, SessionRecord, TouchOutcome};
pub use lockout::{LockStatus, LockoutGuard};
pub use repository::{AccountStore, SessionStore, StaffDirectory};
