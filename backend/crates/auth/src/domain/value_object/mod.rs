//! Value Object Module

pub mod department;
pub mod email;
pub mod password;
pub mod staff_id;
pub mod totp_secret;
