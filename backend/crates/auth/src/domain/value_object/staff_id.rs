//! Staff ID Value Object
//!
//! A staff identifier issued by the organization. Signup is only allowed for
//! identifiers pre-registered in the staff directory, and each identifier can
//! be bound to at most one account.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const STAFF_ID_MAX_LENGTH: usize = 64;

/// Staff ID value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    /// Create a new staff ID with validation
    pub fn new(staff_id: impl Into<String>) -> AppResult<Self> {
        let staff_id = staff_id.into().trim().to_string();

        if staff_id.is_empty() {
            return Err(AppError::bad_request("Staff ID is required"));
        }

        if staff_id.len() > STAFF_ID_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Staff ID must be at most {} characters",
                STAFF_ID_MAX_LENGTH
            )));
        }

        if staff_id.chars().any(|c| c.is_whitespace()) {
            return Err(AppError::bad_request("Staff ID must not contain spaces"));
        }

        Ok(Self(staff_id))
    }

    /// Get the staff ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StaffId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for StaffId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_id_valid() {
        assert!(StaffId::new("S1").is_ok());
        assert!(StaffId::new("HQ-00123").is_ok());
        // Surrounding whitespace is trimmed
        assert_eq!(StaffId::new("  S1  ").unwrap().as_str(), "S1");
    }

    #[test]
    fn test_staff_id_invalid() {
        assert!(StaffId::new("").is_err());
        assert!(StaffId::new("   ").is_err());
        assert!(StaffId::new("S 1").is_err());
        assert!(StaffId::new("x".repeat(65)).is_err());
    }
}
