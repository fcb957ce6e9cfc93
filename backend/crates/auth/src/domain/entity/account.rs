//! Account Entity
//!
//! A staff account, keyed by email. Holds credentials, the TOTP enrollment
//! state, and the failed-attempt counters the lockout policy reads.

use crate::domain::value_object::department::Department;
use crate::domain::value_object::email::Email;
use crate::domain::value_object::password::PasswordHash;
use crate::domain::value_object::staff_id::StaffId;
use crate::domain::value_object::totp_secret::TotpSecret;
use chrono::{DateTime, Utc};

/// Staff account entity
#[derive(Debug, Clone)]
pub struct Account {
    pub email: Email,
    pub full_name: String,
    pub staff_id: StaffId,
    pub department: Department,
    pub password_hash: PasswordHash,
    /// TOTP secret assigned at signup; codes are only accepted once enrolled
    pub totp_secret: TotpSecret,
    /// True after the owner has proven possession of the secret
    pub totp_enrolled: bool,
    /// Consecutive failed verification attempts
    pub failed_attempts: u32,
    /// When the most recent failure happened
    pub last_failed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account at signup time
    ///
    /// The account starts un-enrolled: it cannot authenticate until the
    /// signup TOTP verification completes.
    pub fn new(
        email: Email,
        full_name: String,
        staff_id: StaffId,
        department: Department,
        password_hash: PasswordHash,
        totp_secret: TotpSecret,
    ) -> Self {
        let now = Utc::now();
        Self {
            email,
            full_name,
            staff_id,
            department,
            password_hash,
            totp_secret,
            totp_enrolled: false,
            failed_attempts: 0,
            last_failed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark TOTP enrollment complete
    pub fn complete_enrollment(&mut self) {
        self.totp_enrolled = true;
        self.updated_at = Utc::now();
    }

    /// Replace the stored password hash (password recovery)
    pub fn set_password_hash(&mut self, hash: PasswordHash) {
        self.password_hash = hash;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::password::RawPassword;

    fn test_account() -> Account {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        Account::new(
            Email::new("user@example.com").unwrap(),
            "Test User".to_string(),
            StaffId::new("S1").unwrap(),
            Department::new("IT").unwrap(),
            PasswordHash::from_raw(&raw, None).unwrap(),
            TotpSecret::generate(),
        )
    }

    #[test]
    fn test_new_account_is_not_enrolled() {
        let account = test_account();
        assert!(!account.totp_enrolled);
        assert_eq!(account.failed_attempts, 0);
        assert!(account.last_failed_at.is_none());
    }

    #[test]
    fn test_complete_enrollment() {
        let mut account = test_account();
        account.complete_enrollment();
        assert!(account.totp_enrolled);
    }
}
