//! Signed Session Tokens
//!
//! The cookie value is `<session_id>.<signature>` where the signature is
//! HMAC-SHA256 over the session ID, base64url-encoded. The server never
//! touches the session store for tokens whose signature does not verify.

use crate::domain::entity::session::SessionId;
use hmac::{Hmac, Mac};
use platform::crypto::constant_time_eq;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn signature(session_id: &str, secret: &[u8; 32]) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Produce the signed cookie value for a session ID
pub fn sign(session_id: &SessionId, secret: &[u8; 32]) -> String {
    let sig = signature(session_id.as_str(), secret);
    format!("{}.{}", session_id, platform::crypto::to_base64_url(&sig))
}

/// Verify a cookie value and extract the session ID
///
/// Returns `None` for any malformed or forged token.
pub fn verify(token: &str, secret: &[u8; 32]) -> Option<SessionId> {
    let (id_part, sig_part) = token.split_once('.')?;

    let session_id = SessionId::from_token_part(id_part)?;
    let provided = platform::crypto::from_base64_url(sig_part)?;
    let expected = signature(session_id.as_str(), secret);

    if !constant_time_eq(&expected, &provided) {
        return None;
    }

    Some(session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify_roundtrip() {
        let secret = [7u8; 32];
        let id = SessionId::generate();

        let token = sign(&id, &secret);
        assert_eq!(verify(&token, &secret), Some(id));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let id = SessionId::generate();
        let token = sign(&id, &[7u8; 32]);

        assert!(verify(&token, &[8u8; 32]).is_none());
    }

    #[test]
    fn test_tampered_id_rejected() {
        let secret = [7u8; 32];
        let id = SessionId::generate();
        let token = sign(&id, &secret);

        let (id_part, sig_part) = token.split_once('.').unwrap();
        let mut chars: Vec<char> = id_part.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let forged: String = chars.into_iter().collect();

        assert!(verify(&format!("{}.{}", forged, sig_part), &secret).is_none());
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let secret = [7u8; 32];
        assert!(verify("", &secret).is_none());
        assert!(verify("no-dot", &secret).is_none());
        assert!(verify(".signature-only", &secret).is_none());
        assert!(verify("id.", &secret).is_none());
        assert!(verify("id.!!!not-base64!!!", &secret).is_none());
    }
}
