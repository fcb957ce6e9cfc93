//! Lockout Guard
//!
//! Tracks consecutive failed verification attempts per account and refuses
//! further attempts once the threshold is reached, until the lockout window
//! elapses. State lives on the account record; there is no background sweep,
//! the window is evaluated (and the counter lazily reset) at check time.

use crate::domain::entity::account::Account;
use chrono::{DateTime, Duration, Utc};

/// Failed attempts before the account locks
pub const MAX_FAILED_ATTEMPTS: u32 = 5;
/// How long a locked account stays locked
pub const LOCKOUT_DURATION_MINUTES: i64 = 30;

/// Lock state of an account at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockStatus {
    Open,
    Locked {
        /// Remaining lockout, rounded up to whole minutes (at least 1)
        retry_after_minutes: i64,
    },
}

/// Stateless policy over the account's failure counters
pub struct LockoutGuard;

impl LockoutGuard {
    fn window() -> Duration {
        Duration::minutes(LOCKOUT_DURATION_MINUTES)
    }

    /// Check the lock state, lazily resetting an elapsed window
    ///
    /// Returns `Locked` iff the account has reached the attempt threshold
    /// and the most recent failure is still inside the lockout window. Once
    /// the window has elapsed the counter is cleared so the caller's
    /// persisted account starts a fresh count.
    pub fn check(account: &mut Account, now: DateTime<Utc>) -> LockStatus {
        if account.failed_attempts < MAX_FAILED_ATTEMPTS {
            return LockStatus::Open;
        }

        let Some(last_failed_at) = account.last_failed_at else {
            // Counter without a timestamp is inconsistent; treat as open
            account.failed_attempts = 0;
            return LockStatus::Open;
        };

        let elapsed = now - last_failed_at;
        if elapsed >= Self::window() {
            account.failed_attempts = 0;
            account.last_failed_at = None;
            return LockStatus::Open;
        }

        let remaining = Self::window() - elapsed;
        // Ceil to whole minutes so "1 minute" never means "0 seconds"
        let seconds = remaining.num_seconds().max(1);
        let retry_after_minutes = (seconds + 59) / 60;

        LockStatus::Locked { retry_after_minutes }
    }

    /// Record a definitive credential or code rejection
    pub fn record_failure(account: &mut Account, now: DateTime<Utc>) {
        account.failed_attempts += 1;
        account.last_failed_at = Some(now);
        account.updated_at = now;
    }

    /// Clear the counter after a successful verification
    pub fn record_success(account: &mut Account, now: DateTime<Utc>) {
        account.failed_attempts = 0;
        account.last_failed_at = None;
        account.updated_at = now;
    }
}
