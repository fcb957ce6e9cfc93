//! Password Recovery Use Cases
//!
//! Recovery reuses the second factor: the account owner proves possession
//! of their authenticator, then sets a new password. Requests for unknown
//! emails return the same generic acknowledgement as real ones.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::session::{SessionId, SessionPhase, SessionRecord};
use crate::domain::lockout::{LockStatus, LockoutGuard};
use crate::domain::repository::{AccountStore, SessionStore};
use crate::domain::value_object::email::Email;
use crate::domain::value_object::password::{PasswordHash, RawPassword};
use crate::domain::value_object::totp_secret;
use crate::error::{AuthError, AuthResult};
use chrono::Utc;

/// Request recovery output
pub struct RequestRecoveryOutput {
    /// Present only when a reset session was actually opened
    pub session_token: Option<String>,
    /// Whether the caller should prompt for a TOTP code next
    pub requires_2fa: bool,
    pub message: String,
}

/// Request recovery use case
pub struct RequestRecoveryUseCase<A, S>
where
    A: AccountStore,
    S: SessionStore,
{
    accounts: Arc<A>,
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<A, S> RequestRecoveryUseCase<A, S>
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

    pub async fn execute(&self, email: String) -> AuthResult<RequestRecoveryOutput> {
        const GENERIC_MESSAGE: &str =
            "If an account exists for this email, you can verify with your authenticator app.";

        let Ok(email) = Email::new(email) else {
            // Malformed addresses get the same acknowledgement as unknown ones
            return Ok(RequestRecoveryOutput {
                session_token: None,
                requires_2fa: false,
                message: GENERIC_MESSAGE.to_string(),
            });
        };

        let Some(account) = self.accounts.find(&email).await? else {
            return Ok(RequestRecoveryOutput {
                session_token: None,
                requires_2fa: false,
                message: GENERIC_MESSAGE.to_string(),
            });
        };

        if !account.totp_enrolled {
            return Err(AuthError::TwoFactorNotSetup);
        }

        let session_id = self
            .sessions
            .create(SessionRecord::new(SessionPhase::PendingReset {
                email: email.clone(),
            }))
            .await?;
        let session_token = session_token::sign(&session_id, &self.config.session_secret);

        tracing::info!("Password recovery started");

        Ok(RequestRecoveryOutput {
            session_token: Some(session_token),
            requires_2fa: true,
            message: "Enter the code from your authenticator app to continue.".to_string(),
        })
    }
}

/// Verify recovery use case
///
/// A wrong code here charges the lockout counter just like a failed login
/// verification; recovery is not a side door around the guard.
pub struct VerifyRecoveryUseCase<A, S>
where
    A: AccountStore,
    S: SessionStore,
{
    accounts: Arc<A>,
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<A, S> VerifyRecoveryUseCase<A, S>
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

    pub async fn execute(
        &self,
        session_id: &SessionId,
        code: &str,
        new_password: String,
    ) -> AuthResult<()> {
        if !totp_secret::is_well_formed_code(code) {
            return Err(AuthError::Validation(
                "Verification code must be 6 digits".to_string(),
            ));
        }
        let new_password = RawPassword::new(new_password)?;

        let record = self
            .sessions
            .get(session_id)
            .await?
            .ok_or(AuthError::SessionExpired)?;

        let SessionPhase::PendingReset { email } = record.phase else {
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

        let new_hash = PasswordHash::from_raw(&new_password, self.config.pepper())?;

        self.accounts
            .mutate(&email, |account| {
                LockoutGuard::record_success(account, Utc::now());
                account.set_password_hash(new_hash);
            })
            .await?
            .ok_or(AuthError::SessionExpired)?;

        // The reset session is single-use; the user logs in fresh
        self.sessions.destroy(session_id).await?;

        tracing::info!("Password reset completed");

        Ok(())
    }
}
