//! Sign Up Use Case
//!
//! Registers a new staff account and starts TOTP enrollment. The account is
//! created immediately with enrollment incomplete; it cannot authenticate
//! until the first code is verified.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::account::Account;
use crate::domain::entity::session::{SessionPhase, SessionRecord};
use crate::domain::repository::{AccountStore, SessionStore, StaffDirectory};
use crate::domain::value_object::department::Department;
use crate::domain::value_object::email::Email;
use crate::domain::value_object::password::{PasswordHash, RawPassword};
use crate::domain::value_object::staff_id::StaffId;
use crate::domain::value_object::totp_secret::TotpSecret;
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub full_name: String,
    pub staff_id: String,
    pub department: String,
    pub email: String,
    pub password: String,
}

/// Sign up output
pub struct SignUpOutput {
    /// Signed token for the pending-signup session cookie
    pub session_token: String,
    /// Enrollment QR code as a data URI
    pub qr_code: String,
    /// Base32 secret for manual authenticator entry
    pub secret: String,
}

/// Sign up use case
pub struct SignUpUseCase<A, D, S>
where
    A: AccountStore,
    D: StaffDirectory,
    S: SessionStore,
{
    accounts: Arc<A>,
    directory: Arc<D>,
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<A, D, S> SignUpUseCase<A, D, S>
where
    A: AccountStore,
    D: StaffDirectory,
    S: SessionStore,
{
    pub fn new(accounts: Arc<A>, directory: Arc<D>, sessions: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            accounts,
            directory,
            sessions,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let full_name = input.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AuthError::Validation("Full name is required".to_string()));
        }

        let staff_id = StaffId::new(input.staff_id)?;
        let department = Department::new(input.department)?;
        let email = Email::new(input.email)?;
        let password = RawPassword::new(input.password)?;

        // Signup is gated on the staff directory issued by the organization
        if !self.directory.is_valid_staff_id(&staff_id).await? {
            return Err(AuthError::InvalidStaffId);
        }

        let password_hash = PasswordHash::from_raw(&password, self.config.pepper())?;
        let totp_secret = TotpSecret::generate();

        let account = Account::new(
            email.clone(),
            full_name,
            staff_id.clone(),
            department,
            password_hash,
            totp_secret.clone(),
        );

        // Uniqueness is decided inside create, atomically: under concurrent
        // signups for the same email or staff ID exactly one of them wins.
        self.accounts.create(account).await?;

        let qr_code = totp_secret.qr_data_uri(&self.config.totp_issuer, email.as_str())?;
        let secret = totp_secret.as_base32().to_string();

        let session_id = self
            .sessions
            .create(SessionRecord::new(SessionPhase::PendingSignup {
                email: email.clone(),
                totp_secret,
            }))
            .await?;
        let session_token = session_token::sign(&session_id, &self.config.session_secret);

        tracing::info!(
            staff_id = %staff_id,
            "Account created, awaiting enrollment verification"
        );

        Ok(SignUpOutput {
            session_token,
            qr_code,
            secret,
        })
    }
}
