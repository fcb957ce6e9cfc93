//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
///
/// The taxonomy: validation errors (user corrects and resubmits),
/// authorization denials (terminal for the attempt), expired sessions
/// (start over), conflicts (duplicate identity on signup), and
/// dependency/internal failures (generic server error, logged).
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// Staff ID not present in the staff directory
    #[error(
        "Invalid staff ID. Please contact your administrator if you believe this is an error."
    )]
    InvalidStaffId,

    /// Staff ID already bound to an account
    #[error("This staff ID is already registered. Please contact support if you need to recover your account.")]
    StaffIdTaken,

    /// Email already bound to an account
    #[error("User already exists with this email")]
    EmailTaken,

    /// Invalid credentials (wrong password or unknown email, indistinguishable)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account is locked (too many failed attempts)
    #[error("Account locked. Try again in {retry_after_minutes} minutes.")]
    AccountLocked { retry_after_minutes: i64 },

    /// Invalid 2FA code
    #[error("Invalid authentication code. Please try again.")]
    InvalidTwoFactorCode,

    /// 2FA enrollment not completed
    #[error("Please complete 2FA setup first")]
    TwoFactorNotSetup,

    /// Pending or authenticated session lapsed or missing
    #[error("Session expired. Please start again.")]
    SessionExpired,

    /// External dependency unreachable
    #[error("Service temporarily unavailable")]
    Dependency(String),

    /// Internal error
    #[error("Internal error")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidStaffId => StatusCode::FORBIDDEN,
            AuthError::StaffIdTaken | AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::InvalidTwoFactorCode => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::AccountLocked { .. } => StatusCode::LOCKED,
            AuthError::TwoFactorNotSetup => StatusCode::FORBIDDEN,
            AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
            AuthError::Dependency(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::InvalidStaffId => ErrorKind::Forbidden,
            AuthError::StaffIdTaken | AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::InvalidTwoFactorCode
            | AuthError::SessionExpired => ErrorKind::Unauthorized,
            AuthError::AccountLocked { .. } => ErrorKind::Locked,
            AuthError::TwoFactorNotSetup => ErrorKind::Forbidden,
            AuthError::Dependency(_) => ErrorKind::ServiceUnavailable,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Internal detail never crosses the boundary; only the taxonomy-mapped
    /// message does.
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Internal(detail) => {
                tracing::error!(detail = %detail, "Auth internal error");
            }
            AuthError::Dependency(detail) => {
                tracing::error!(detail = %detail, "Auth dependency failure");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidTwoFactorCode => {
                tracing::warn!("Invalid 2FA code submitted");
            }
            AuthError::AccountLocked { retry_after_minutes } => {
                tracing::warn!(retry_after_minutes, "Attempt on locked account");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();

        // Locked responses carry the retry estimate as a dedicated field
        // alongside the problem-details body.
        if let AuthError::AccountLocked { retry_after_minutes } = &self {
            let body = serde_json::json!({
                "type": format!("https://httpstatuses.io/{}", StatusCode::LOCKED.as_u16()),
                "title": ErrorKind::Locked.as_str(),
                "status": StatusCode::LOCKED.as_u16(),
                "detail": self.to_string(),
                "action": "Wait for the lockout window to elapse before retrying",
                "retryAfterMinutes": retry_after_minutes,
            });
            return (StatusCode::LOCKED, Json(body)).into_response();
        }

        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AuthError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::StaffIdTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::AccountLocked {
                retry_after_minutes: 30
            }
            .status_code(),
            StatusCode::LOCKED
        );
        assert_eq!(
            AuthError::SessionExpired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Internal("oops".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let err = AuthError::Internal("store backend exploded at line 42".into());
        let app = err.to_app_error();
        assert_eq!(app.message(), "Internal error");
    }

    #[test]
    fn test_locked_message_carries_minutes() {
        let err = AuthError::AccountLocked {
            retry_after_minutes: 12,
        };
        assert!(err.to_string().contains("12 minutes"));
    }
}
