//! TOTP Secret Value Object
//!
//! Wraps a TOTP secret for two-factor authentication.
//! Uses Google Authenticator compatible settings: SHA-1, 6 digits, 30s step.

use kernel::error::app_error::{AppError, AppResult};
use platform::crypto::constant_time_eq;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use totp_rs::{Algorithm, Secret, TOTP};

/// TOTP configuration constants
const TOTP_DIGITS: usize = 6;
const TOTP_STEP: u64 = 30;
/// Accepted clock drift, in time steps on either side of now (±60s)
const TOTP_SKEW_STEPS: i64 = 2;

/// Whether the input has the shape of a TOTP code (exactly 6 ASCII digits)
///
/// Ill-shaped input is rejected before any code is computed and is never
/// counted as a failed attempt.
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == TOTP_DIGITS && code.bytes().all(|b| b.is_ascii_digit())
}

/// TOTP Secret for two-factor authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotpSecret {
    /// Base32-encoded secret
    secret_base32: String,
}

impl TotpSecret {
    /// Generate a new random TOTP secret
    pub fn generate() -> Self {
        let secret = Secret::generate_secret();
        Self {
            secret_base32: secret.to_encoded().to_string(),
        }
    }

    /// Create from a base32-encoded string (from the account store)
    pub fn from_base32(secret: impl Into<String>) -> AppResult<Self> {
        let secret_str = secret.into();
        // Validate by trying to decode
        Secret::Encoded(secret_str.clone())
            .to_bytes()
            .map_err(|e| AppError::internal(format!("Invalid TOTP secret: {}", e)))?;

        Ok(Self {
            secret_base32: secret_str,
        })
    }

    /// Get the base32-encoded secret for storage
    pub fn as_base32(&self) -> &str {
        &self.secret_base32
    }

    /// Create a TOTP instance for this secret
    fn to_totp(&self, issuer: &str, account_name: &str) -> AppResult<TOTP> {
        let secret = Secret::Encoded(self.secret_base32.clone());

        TOTP::new(
            Algorithm::SHA1,
            TOTP_DIGITS,
            1,
            TOTP_STEP,
            secret
                .to_bytes()
                .map_err(|e| AppError::internal(format!("Invalid TOTP secret: {}", e)))?,
            Some(issuer.to_string()),
            account_name.to_string(),
        )
        .map_err(|e| AppError::internal(format!("Failed to create TOTP: {}", e)))
    }

    /// Verify a TOTP code against the current time
    ///
    /// Accepts codes within ±2 time steps of now to tolerate clock drift.
    /// Ill-shaped input (anything but six ASCII digits) is rejected before
    /// any code is computed, and candidate comparisons are constant-time
    /// with no early exit.
    pub fn verify(&self, code: &str, issuer: &str, account_name: &str) -> AppResult<bool> {
        if !is_well_formed_code(code) {
            return Ok(false);
        }

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::internal(format!("System clock error: {}", e)))?
            .as_secs();

        self.verify_at(code, issuer, account_name, now)
    }

    /// Verify a code against an explicit timestamp (seconds since epoch)
    pub(crate) fn verify_at(
        &self,
        code: &str,
        issuer: &str,
        account_name: &str,
        now: u64,
    ) -> AppResult<bool> {
        let totp = self.to_totp(issuer, account_name)?;

        let mut matched = false;
        for offset in -TOTP_SKEW_STEPS..=TOTP_SKEW_STEPS {
            let ts = now.saturating_add_signed(offset * TOTP_STEP as i64);
            let expected = totp.generate(ts);
            // Fold without short-circuiting so every candidate is compared
            matched |= constant_time_eq(expected.as_bytes(), code.as_bytes());
        }

        Ok(matched)
    }

    /// Generate the code for a given timestamp (for testing)
    #[cfg(test)]
    pub fn code_at(&self, issuer: &str, account_name: &str, ts: u64) -> AppResult<String> {
        let totp = self.to_totp(issuer, account_name)?;
        Ok(totp.generate(ts))
    }

    /// Generate the current code (for testing)
    #[cfg(test)]
    pub fn current_code(&self, issuer: &str, account_name: &str) -> AppResult<String> {
        let totp = self.to_totp(issuer, account_name)?;
        totp.generate_current()
            .map_err(|e| AppError::internal(format!("Failed to generate TOTP: {}", e)))
    }

    /// Generate QR code as a `data:` URI with base64-encoded PNG
    pub fn qr_data_uri(&self, issuer: &str, account_name: &str) -> AppResult<String> {
        let totp = self.to_totp(issuer, account_name)?;
        let png = totp
            .get_qr_base64()
            .map_err(|e| AppError::internal(format!("Failed to generate QR code: {}", e)))?;
        Ok(format!("data:image/png;base64,{}", png))
    }

    /// Get the otpauth:// URL for manual entry
    pub fn otpauth_url(&self, issuer: &str, account_name: &str) -> AppResult<String> {
        let totp = self.to_totp(issuer, account_name)?;
        Ok(totp.get_url())
    }
}
