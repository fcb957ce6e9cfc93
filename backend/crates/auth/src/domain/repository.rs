//! Store Traits
//!
//! Interfaces for durable and ephemeral state. Implementations live in the
//! infrastructure layer; use cases are generic over these traits.

use crate::domain::entity::account::Account;
use crate::domain::entity::session::{SessionId, SessionPhase, SessionRecord, TouchOutcome};
use crate::domain::value_object::email::Email;
use crate::domain::value_object::staff_id::StaffId;
use crate::error::AuthResult;

/// Durable account store, keyed by email
#[trait_variant::make(AccountStore: Send)]
pub trait LocalAccountStore {
    /// Insert a new account
    ///
    /// The email and staff-ID uniqueness checks and the insert are atomic:
    /// under concurrent signups for the same key exactly one caller wins,
    /// the rest get `EmailTaken` / `StaffIdTaken`.
    async fn create(&self, account: Account) -> AuthResult<()>;

    /// Find an account by email
    async fn find(&self, email: &Email) -> AuthResult<Option<Account>>;

    /// Whether any account has claimed this staff ID
    async fn staff_id_registered(&self, staff_id: &StaffId) -> AuthResult<bool>;

    /// Apply a mutation to one account, serialized per account key
    ///
    /// Concurrent mutations of the same account never interleave; the
    /// closure sees the latest state and its writes are persisted before
    /// the next mutation runs. Returns `None` when the account does not
    /// exist.
    async fn mutate<F, R>(&self, email: &Email, f: F) -> AuthResult<Option<R>>
    where
        F: FnOnce(&mut Account) -> R + Send,
        R: Send;
}

/// Registry of staff IDs eligible for signup
#[trait_variant::make(StaffDirectory: Send)]
pub trait LocalStaffDirectory {
    /// Whether the organization has issued this staff ID
    async fn is_valid_staff_id(&self, staff_id: &StaffId) -> AuthResult<bool>;
}

/// Ephemeral session store, keyed by opaque handle
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Allocate a fresh handle for the given record
    async fn create(&self, record: SessionRecord) -> AuthResult<SessionId>;

    /// Look up a session
    ///
    /// Fails closed: unknown and expired handles are both `None`, and an
    /// expired record is destroyed on the way out.
    async fn get(&self, id: &SessionId) -> AuthResult<Option<SessionRecord>>;

    /// Atomically replace the phase of an existing session
    ///
    /// Returns the updated record, or `None` when the handle names no live
    /// session. Serialized per handle.
    async fn transition(&self, id: &SessionId, phase: SessionPhase)
        -> AuthResult<Option<SessionRecord>>;

    /// Refresh the activity clock, reporting expiry distinctly
    ///
    /// `TimedOut` is only reported for an authenticated record that idled
    /// out; expired pending records and unknown handles are both `Missing`
    /// (fail closed).
    async fn touch(&self, id: &SessionId) -> AuthResult<TouchOutcome>;

    /// Remove a session (logout)
    async fn destroy(&self, id: &SessionId) -> AuthResult<()>;
}
