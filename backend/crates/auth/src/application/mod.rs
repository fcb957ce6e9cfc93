//! Application Layer
//!
//! One use case per authentication trigger, plus configuration and the
//! signed session token helpers.

pub mod check_session;
pub mod config;
pub mod log_in;
pub mod log_out;
pub mod recovery;
pub mod session_token;
pub mod sign_up;
pub mod verify_login;
pub mod verify_signup;

pub use config::AuthConfig;
