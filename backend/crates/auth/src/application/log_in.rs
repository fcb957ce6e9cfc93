//! Log In Use Case
//!
//! First factor: email + password. Success never authenticates by itself,
//! it only opens a pending-login session awaiting the TOTP code.
//!
//! Anti-enumeration contract: unknown email and wrong password produce the
//! same denial, and the unknown-email path still runs an Argon2
//! verification against a fixed hash so its timing stays close to the
//! real one.

use std::sync::{Arc, LazyLock};

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::session::{SessionPhase, SessionRecord};
use crate::domain::lockout::{LockStatus, LockoutGuard};
use crate::domain::repository::{AccountStore, SessionStore};
use crate::domain::value_object::email::Email;
use crate::domain::value_object::password::{PasswordHash, RawPassword};
use crate::error::{AuthError, AuthResult};
use chrono::Utc;

/// Fixed hash for the unknown-email rejection path
static DUMMY_HASH: LazyLock<PasswordHash> = LazyLock::new(|| {
    let raw = RawPassword::new("decoy-password-for-timing".to_string())
        .expect("static password satisfies policy");
    PasswordHash::from_raw(&raw, None).expect("hashing a static password cannot fail")
});

/// Log in input
pub struct LogInInput {
    pub email: String,
    pub password: String,
}

/// Log in output
pub struct LogInOutput {
    /// Signed token for the pending-login session cookie
    pub session_token: String,
}

/// Log in use case
pub struct LogInUseCase<A, S>
where
    A: AccountStore,
    S: SessionStore,
{
    accounts: Arc<A>,
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<A, S> LogInUseCase<A, S>
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

    pub async fn execute(&self, input: LogInInput) -> AuthResult<LogInOutput> {
        let Ok(email) = Email::new(&input.email) else {
            self.burn_password_check(&input.password);
            return Err(AuthError::InvalidCredentials);
        };
        let Ok(password) = RawPassword::new(input.password.clone()) else {
            self.burn_password_check(&input.password);
            return Err(AuthError::InvalidCredentials);
        };

        // Lockout is evaluated before anything else; a locked account is
        // refused without looking at the password.
        let lock_status = self
            .accounts
            .mutate(&email, |account| LockoutGuard::check(account, Utc::now()))
            .await?;

        let Some(lock_status) = lock_status else {
            // Unknown email: no counter to charge, just an evenly-timed denial
            self.burn_password_check(&input.password);
            return Err(AuthError::InvalidCredentials);
        };

        if let LockStatus::Locked { retry_after_minutes } = lock_status {
            return Err(AuthError::AccountLocked { retry_after_minutes });
        }

        let account = self
            .accounts
            .find(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.password_hash.verify(&password, self.config.pepper()) {
            self.accounts
                .mutate(&email, |account| {
                    LockoutGuard::record_failure(account, Utc::now())
                })
                .await?;
            return Err(AuthError::InvalidCredentials);
        }

        if !account.totp_enrolled {
            return Err(AuthError::TwoFactorNotSetup);
        }

        // Fresh handle per login attempt; nothing carries over from any
        // prior session the client may have presented.
        let session_id = self
            .sessions
            .create(SessionRecord::new(SessionPhase::PendingLogin {
                email: email.clone(),
            }))
            .await?;
        let session_token = session_token::sign(&session_id, &self.config.session_secret);

        tracing::info!("Password accepted, awaiting second factor");

        Ok(LogInOutput { session_token })
    }

    /// Run an Argon2 verification that is guaranteed to fail
    fn burn_password_check(&self, password: &str) {
        if let Ok(raw) = RawPassword::new(password.to_string()) {
            let _ = DUMMY_HASH.verify(&raw, self.config.pepper());
        } else if let Ok(raw) = RawPassword::new("padding-for-short-input".to_string()) {
            let _ = DUMMY_HASH.verify(&raw, self.config.pepper());
        }
    }
}
