//! Verify Login Use Case
//!
//! Second factor: the TOTP code for a pending-login session. The lockout
//! guard is re-checked here, so once an account hits the threshold the next
//! attempt is refused regardless of whether its code would have matched.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::account::Account;
use crate::domain::entity::session::{SessionId, SessionPhase};
use crate::domain::lockout::{LockStatus, LockoutGuard};
use crate::domain::repository::{AccountStore, SessionStore};
use crate::domain::value_object::totp_secret;
use crate::error::{AuthError, AuthResult};
use chrono::Utc;

/// Authenticated user profile returned to the caller
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub email: String,
    pub full_name: String,
    pub staff_id: String,
    pub department: String,
}

/// Verify login use case
pub struct VerifyLoginUseCase<A, S>
where
    A: AccountStore,
    S: SessionStore,
{
    accounts: Arc<A>,
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<A, S> VerifyLoginUseCase<A, S>
where
    A: AccountStore,
    S: SessionStore,
{
    pub fn new(accounts: Arc<A>, sessions: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            accounts,
            sessions,
            config,
        }
    }

    pub async fn execute(&self, session_id: &SessionId, code: &str) -> AuthResult<AuthenticatedUser> {
        if !totp_secret::is_well_formed_code(code) {
            return Err(AuthError::Validation(
                "Verification code must be 6 digits".to_string(),
            ));
        }

        let record = self
            .sessions
            .get(session_id)
            .await?
            .ok_or(AuthError::SessionExpired)?;

        let SessionPhase::PendingLogin { email } = record.phase else {
            return Err(AuthError::SessionExpired);
        };

        let lock_status = self
            .accounts
            .mutate(&email, |account| LockoutGuard::check(account, Utc::now()))
            .await?
            .ok_or(AuthError::SessionExpired)?;

        if let LockStatus::Locked { retry_after_minutes } = lock_status {
            return Err(AuthError::AccountLocked { retry_after_minutes });
        }

        let account = self
            .accounts
            .find(&email)
            .await?
            .ok_or(AuthError::SessionExpired)?;

        let valid = account
            .totp_secret
            .verify(code, &self.config.totp_issuer, email.as_str())?;

        if !valid {
            self.accounts
                .mutate(&email, |account| {
                    LockoutGuard::record_failure(account, Utc::now())
                })
                .await?;
            return Err(AuthError::InvalidTwoFactorCode);
        }

        self.accounts
            .mutate(&email, |account| {
                LockoutGuard::record_success(account, Utc::now())
            })
            .await?;

        let user = Self::profile(&account);

        self.sessions
            .transition(
                session_id,
                SessionPhase::Authenticated {
                    email: account.email.clone(),
                    full_name: account.full_name.clone(),
                    staff_id: account.staff_id.clone(),
                    department: account.department.clone(),
                },
            )
            .await?
            .ok_or(AuthError::SessionExpired)?;

        tracing::info!(staff_id = %account.staff_id, "Login completed");

        Ok(user)
    }

    fn profile(account: &Account) -> AuthenticatedUser {
        AuthenticatedUser {
            email: account.email.as_str().to_string(),
            full_name: account.full_name.clone(),
            staff_id: account.staff_id.as_str().to_string(),
            department: account.department.as_str().to_string(),
        }
    }
}
