//! Log Out Use Case

use std::sync::Arc;

use crate::domain::entity::session::SessionId;
use crate::domain::repository::SessionStore;
use crate::error::AuthResult;

/// Log out use case
///
/// Destroys the server-side record. Idempotent: logging out without a live
/// session is still a success.
pub struct LogOutUseCase<S>
where
    S: SessionStore,
{
    sessions: Arc<S>,
}

impl<S> LogOutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(sessions: Arc<S>) -> Self {
        Self { sessions }
    }

    pub async fn execute(&self, session_id: Option<&SessionId>) -> AuthResult<()> {
        if let Some(session_id) = session_id {
            self.sessions.destroy(session_id).await?;
            tracing::info!("Session destroyed");
        }
        Ok(())
    }
}
