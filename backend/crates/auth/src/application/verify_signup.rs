//! Verify Signup Use Case
//!
//! Completes TOTP enrollment: the first correct code proves the user has
//! the secret in an authenticator, after which the account may log in.
//! Wrong codes here never count toward lockout.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::session::{SessionId, SessionPhase};
use crate::domain::repository::{AccountStore, SessionStore};
use crate::domain::value_object::totp_secret;
use crate::error::{AuthError, AuthResult};

/// Verify signup use case
pub struct VerifySignupUseCase<A, S>
where
    A: AccountStore,
    S: SessionStore,
{
    accounts: Arc<A>,
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<A, S> VerifySignupUseCase<A, S>
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

    pub async fn execute(&self, session_id: &SessionId, code: &str) -> AuthResult<()> {
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

        let SessionPhase::PendingSignup { email, totp_secret } = record.phase else {
            return Err(AuthError::SessionExpired);
        };

        let valid = totp_secret.verify(code, &self.config.totp_issuer, email.as_str())?;
        if !valid {
            return Err(AuthError::InvalidTwoFactorCode);
        }

        self.accounts
            .mutate(&email, |account| account.complete_enrollment())
            .await?
            .ok_or_else(|| AuthError::Internal("Account missing during enrollment".to_string()))?;

        // Enrollment done; the user logs in from scratch
        self.sessions
            .transition(session_id, SessionPhase::Anonymous)
            .await?;

        tracing::info!("TOTP enrollment completed");

        Ok(())
    }
}
