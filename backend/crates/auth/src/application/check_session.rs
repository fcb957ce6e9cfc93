//! Check Session Use Case
//!
//! Answers "who am I" for the dashboard. Touching the session re-arms the
//! idle clock; a session that idled out is reported distinctly so the UI
//! can explain the redirect.

use std::sync::Arc;

use crate::domain::entity::session::{SessionId, SessionPhase, TouchOutcome};
use crate::domain::repository::SessionStore;
use crate::error::AuthResult;

/// Check session output
#[derive(Debug, Default)]
pub struct CheckSessionOutput {
    pub authenticated: bool,
    /// True when the presented session existed but idled out
    pub timeout: bool,
    pub user: Option<SessionUser>,
}

/// Profile fields carried by an authenticated session
#[derive(Debug)]
pub struct SessionUser {
    pub email: String,
    pub full_name: String,
    pub staff_id: String,
    pub department: String,
}

/// Check session use case
pub struct CheckSessionUseCase<S>
where
    S: SessionStore,
{
    sessions: Arc<S>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionStore,
{
    pub fn new(sessions: Arc<S>) -> Self {
        Self { sessions }
    }

    pub async fn execute(&self, session_id: Option<&SessionId>) -> AuthResult<CheckSessionOutput> {
        let Some(session_id) = session_id else {
            return Ok(CheckSessionOutput::default());
        };

        match self.sessions.touch(session_id).await? {
            TouchOutcome::Active(record) => {
                if let SessionPhase::Authenticated {
                    email,
                    full_name,
                    staff_id,
                    department,
                } = record.phase
                {
                    Ok(CheckSessionOutput {
                        authenticated: true,
                        timeout: false,
                        user: Some(SessionUser {
                            email: email.as_str().to_string(),
                            full_name,
                            staff_id: staff_id.as_str().to_string(),
                            department: department.as_str().to_string(),
                        }),
                    })
                } else {
                    // Pending sessions are not authenticated
                    Ok(CheckSessionOutput::default())
                }
            }
            TouchOutcome::TimedOut => Ok(CheckSessionOutput {
                authenticated: false,
                timeout: true,
                user: None,
            }),
            TouchOutcome::Missing => Ok(CheckSessionOutput::default()),
        }
    }
}
