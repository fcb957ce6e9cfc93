//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, store traits
//! - `application/` - Use cases and application services
//! - `infra/` - Store implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Staff signup with staff-ID directory gating and mandatory TOTP enrollment
//! - Two-step login (password, then TOTP code)
//! - TOTP-verified password recovery
//! - Server-side sessions with signed cookie tokens and lazy expiry
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Accounts without completed TOTP enrollment can never authenticate
//! - Automatic lockout after failed login attempts (5 failures, 30 minutes)
//! - Session handles are 256-bit random tokens, HMAC-signed in the cookie

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::memory::MemoryStore;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
