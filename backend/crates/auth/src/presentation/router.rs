//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{AccountStore, SessionStore, StaffDirectory};
use crate::infra::memory::MemoryStore;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the auth router backed by the in-memory store
pub fn auth_router(store: Arc<MemoryStore>, config: AuthConfig) -> Router {
    auth_router_generic(store, config)
}

/// Create a generic auth router for any store implementation
pub fn auth_router_generic<R>(store: Arc<R>, config: AuthConfig) -> Router
where
    R: AccountStore + StaffDirectory + SessionStore + Send + Sync + 'static,
{
    let state = AuthAppState {
        store,
        config: Arc::new(config),
    };

    Router::new()
        .route("/signup", post(handlers::signup::<R>))
        .route("/signup/verify", post(handlers::verify_signup::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/login/verify-2fa", post(handlers::verify_login::<R>))
        .route("/password-recovery", post(handlers::password_recovery::<R>))
        .route(
            "/password-recovery/verify",
            post(handlers::verify_recovery::<R>),
        )
        .route("/session", get(handlers::session::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .with_state(state)
}
