//! API DTOs (Data Transfer Objects)
//!
//! Wire format uses camelCase; the staff identifier is spelled `staffID`
//! on the wire for compatibility with the existing portal frontend.

use serde::{Deserialize, Serialize};

// ============================================================================
// Signup
// ============================================================================

/// Signup request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub full_name: String,
    #[serde(rename = "staffID")]
    pub staff_id: String,
    pub department: String,
    pub email: String,
    pub password: String,
}

/// Signup response: enrollment material for the authenticator app
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub success: bool,
    /// QR code as a data URI (data:image/png;base64,...)
    pub qr_code: String,
    /// Base32 secret for manual entry
    pub secret: String,
    pub message: String,
}

/// Code verification request (signup and login)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub code: String,
}

/// Generic success response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Login
// ============================================================================

/// Login request (first factor)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    /// Always true on success; the password alone never authenticates
    #[serde(rename = "requires2FA")]
    pub requires_2fa: bool,
}

/// Login verification response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyLoginResponse {
    pub success: bool,
    pub message: String,
    pub user: UserDto,
}

/// User profile as exposed to the frontend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub email: String,
    pub full_name: String,
    #[serde(rename = "staffID")]
    pub staff_id: String,
    pub department: String,
}

// ============================================================================
// Password Recovery
// ============================================================================

/// Recovery request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryRequest {
    pub email: String,
}

/// Recovery response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryResponse {
    pub success: bool,
    #[serde(rename = "requires2FA", skip_serializing_if = "Option::is_none")]
    pub requires_2fa: Option<bool>,
    pub message: String,
}

/// Recovery verification request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRecoveryRequest {
    pub code: String,
    pub new_password: String,
}

// ============================================================================
// Session
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    /// Present (true) only when an authenticated session idled out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDto>,
}
