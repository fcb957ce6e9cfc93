//! Department Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEPARTMENT_MAX_LENGTH: usize = 64;

/// Department name, chosen from the portal's department list.
/// The server only shape-checks it; the list itself is UI concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department(String);

impl Department {
    /// Create a new department with validation
    pub fn new(department: impl Into<String>) -> AppResult<Self> {
        let department = department.into().trim().to_string();

        if department.is_empty() {
            return Err(AppError::bad_request("Please select a department"));
        }

        if department.len() > DEPARTMENT_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Department must be at most {} characters",
                DEPARTMENT_MAX_LENGTH
            )));
        }

        Ok(Self(department))
    }

    /// Get the department as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_valid() {
        assert!(Department::new("IT").is_ok());
        assert!(Department::new("Human Resources").is_ok());
    }

    #[test]
    fn test_department_invalid() {
        assert!(Department::new("").is_err());
        assert!(Department::new("   ").is_err());
        assert!(Department::new("x".repeat(65)).is_err());
    }
}
