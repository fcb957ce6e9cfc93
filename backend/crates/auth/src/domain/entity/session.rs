//! Session Entity
//!
//! Server-side session state. A session moves through phases: anonymous,
//! one of the pending-verification phases, or authenticated. The handle
//! itself is an opaque random identifier; all state lives server-side.

use crate::domain::value_object::department::Department;
use crate::domain::value_object::email::Email;
use crate::domain::value_object::staff_id::StaffId;
use crate::domain::value_object::totp_secret::TotpSecret;
use chrono::{DateTime, Duration, Utc};

/// Opaque session identifier (256 bits of randomness, base64url)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random session ID
    pub fn generate() -> Self {
        Self(platform::crypto::to_base64_url(&platform::crypto::random_bytes(32)))
    }

    /// Wrap an ID received from a client token
    ///
    /// Shape-checks only; whether it names a live session is decided by
    /// the session store.
    pub fn from_token_part(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.len() > 64 {
            return None;
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What stage of authentication a session is in
#[derive(Debug, Clone)]
pub enum SessionPhase {
    /// Fresh session with no authentication progress
    Anonymous,
    /// Signup completed step one; waiting for the first TOTP code
    PendingSignup {
        email: Email,
        totp_secret: TotpSecret,
    },
    /// Password accepted; waiting for a TOTP code
    PendingLogin { email: Email },
    /// Recovery requested; waiting for a TOTP code and new password
    PendingReset { email: Email },
    /// Fully authenticated
    Authenticated {
        email: Email,
        full_name: String,
        staff_id: StaffId,
        department: Department,
    },
}

impl SessionPhase {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionPhase::Authenticated { .. })
    }

    fn is_pending(&self) -> bool {
        matches!(
            self,
            SessionPhase::PendingSignup { .. }
                | SessionPhase::PendingLogin { .. }
                | SessionPhase::PendingReset { .. }
        )
    }
}

/// Server-side session record
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub phase: SessionPhase,
    /// When the current phase was entered
    pub phase_started_at: DateTime<Utc>,
    /// Last request that touched this session (idle-timeout clock)
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(phase: SessionPhase) -> Self {
        let now = Utc::now();
        Self {
            phase,
            phase_started_at: now,
            last_activity_at: now,
            created_at: now,
        }
    }

    /// Replace the phase, restarting the phase clock
    pub fn transition(&mut self, phase: SessionPhase) {
        let now = Utc::now();
        self.phase = phase;
        self.phase_started_at = now;
        self.last_activity_at = now;
    }

    /// Whether this record has expired as of `now`
    ///
    /// Pending (and anonymous) sessions expire `pending_ttl` after entering
    /// their phase. Authenticated sessions expire `idle_timeout` after the
    /// last activity.
    pub fn is_expired(&self, now: DateTime<Utc>, pending_ttl: Duration, idle_timeout: Duration) -> bool {
        if self.phase.is_authenticated() {
            now - self.last_activity_at >= idle_timeout
        } else if self.phase.is_pending() {
            now - self.phase_started_at >= pending_ttl
        } else {
            // Anonymous sessions use the pending TTL too
            now - self.phase_started_at >= pending_ttl
        }
    }
}

/// Result of touching a session (activity refresh + expiry check)
#[derive(Debug, Clone)]
pub enum TouchOutcome {
    /// Session is live; activity clock re-armed
    Active(SessionRecord),
    /// Session existed but had idled out; it has been destroyed
    TimedOut,
    /// No such session
    Missing,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authed_phase() -> SessionPhase {
        SessionPhase::Authenticated {
            email: Email::new("user@example.com").unwrap(),
            full_name: "Test User".to_string(),
            staff_id: StaffId::new("S1").unwrap(),
            department: Department::new("IT").unwrap(),
        }
    }

    #[test]
    fn test_session_id_generate_is_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        // 32 bytes base64url without padding
        assert_eq!(a.as_str().len(), 43);
    }

    #[test]
    fn test_session_id_from_token_part() {
        let id = SessionId::generate();
        assert_eq!(
            SessionId::from_token_part(id.as_str()),
            Some(id.clone())
        );

        assert!(SessionId::from_token_part("").is_none());
        assert!(SessionId::from_token_part("has space").is_none());
        assert!(SessionId::from_token_part("semi;colon").is_none());
        assert!(SessionId::from_token_part(&"x".repeat(65)).is_none());
    }

    #[test]
    fn test_pending_session_expires_by_phase_start() {
        let mut record = SessionRecord::new(SessionPhase::PendingLogin {
            email: Email::new("user@example.com").unwrap(),
        });
        let pending_ttl = Duration::minutes(10);
        let idle_timeout = Duration::minutes(30);

        let now = record.phase_started_at;
        assert!(!record.is_expired(now + Duration::minutes(9), pending_ttl, idle_timeout));
        assert!(record.is_expired(now + Duration::minutes(10), pending_ttl, idle_timeout));

        // Re-arming activity does not extend a pending phase
        record.last_activity_at = now + Duration::minutes(9);
        assert!(record.is_expired(now + Duration::minutes(10), pending_ttl, idle_timeout));
    }

    #[test]
    fn test_authenticated_session_expires_by_idle() {
        let mut record = SessionRecord::new(authed_phase());
        let pending_ttl = Duration::minutes(10);
        let idle_timeout = Duration::minutes(30);

        let now = record.phase_started_at;
        assert!(!record.is_expired(now + Duration::minutes(29), pending_ttl, idle_timeout));
        assert!(record.is_expired(now + Duration::minutes(30), pending_ttl, idle_timeout));

        // Activity re-arms the idle clock
        record.last_activity_at = now + Duration::minutes(20);
        assert!(!record.is_expired(now + Duration::minutes(49), pending_ttl, idle_timeout));
        assert!(record.is_expired(now + Duration::minutes(50), pending_ttl, idle_timeout));
    }

    #[test]
    fn test_transition_restarts_phase_clock() {
        let mut record = SessionRecord::new(SessionPhase::Anonymous);
        let created = record.phase_started_at;
        record.transition(authed_phase());
        assert!(record.phase.is_authenticated());
        assert!(record.phase_started_at >= created);
        assert_eq!(record.created_at, created);
    }
}
