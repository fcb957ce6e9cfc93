//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::cookie::CookieConfig;

use crate::application::check_session::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::application::log_in::{LogInInput, LogInUseCase};
use crate::application::log_out::LogOutUseCase;
use crate::application::recovery::{RequestRecoveryUseCase, VerifyRecoveryUseCase};
use crate::application::session_token;
use crate::application::sign_up::{SignUpInput, SignUpUseCase};
use crate::application::verify_login::VerifyLoginUseCase;
use crate::application::verify_signup::VerifySignupUseCase;
use crate::domain::entity::session::SessionId;
use crate::domain::repository::{AccountStore, SessionStore, StaffDirectory};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, LoginResponse, MessageResponse, RecoveryRequest, RecoveryResponse,
    SessionResponse, SignupRequest, SignupResponse, UserDto, VerifyCodeRequest,
    VerifyLoginResponse, VerifyRecoveryRequest,
};

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: AccountStore + StaffDirectory + SessionStore + Send + Sync + 'static,
{
    pub store: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> Clone for AuthAppState<R>
where
    R: AccountStore + StaffDirectory + SessionStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Signup
// ============================================================================

/// POST /signup
pub async fn signup<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignupRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountStore + StaffDirectory + SessionStore + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.store.clone(),
        state.store.clone(),
        state.store.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignUpInput {
            full_name: req.full_name,
            staff_id: req.staff_id,
            department: req.department,
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = pending_cookie(&state.config).build_set_cookie(&output.session_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SignupResponse {
            success: true,
            qr_code: output.qr_code,
            secret: output.secret,
            message: "Scan the QR code with your authenticator app, then enter the code."
                .to_string(),
        }),
    ))
}

/// POST /signup/verify
pub async fn verify_signup<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<VerifyCodeRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountStore + StaffDirectory + SessionStore + Send + Sync + 'static,
{
    let session_id = require_session(&headers, &state.config)?;

    let use_case =
        VerifySignupUseCase::new(state.store.clone(), state.store.clone(), state.config.clone());
    use_case.execute(&session_id, &req.code).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Account created successfully. You can now log in.".to_string(),
    }))
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountStore + StaffDirectory + SessionStore + Send + Sync + 'static,
{
    let use_case =
        LogInUseCase::new(state.store.clone(), state.store.clone(), state.config.clone());

    let output = use_case
        .execute(LogInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = pending_cookie(&state.config).build_set_cookie(&output.session_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            requires_2fa: true,
        }),
    ))
}

/// POST /login/verify-2fa
pub async fn verify_login<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<VerifyCodeRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountStore + StaffDirectory + SessionStore + Send + Sync + 'static,
{
    let session_id = require_session(&headers, &state.config)?;

    let use_case =
        VerifyLoginUseCase::new(state.store.clone(), state.store.clone(), state.config.clone());
    let user = use_case.execute(&session_id, &req.code).await?;

    // Same handle, now authenticated; re-issue the cookie with the idle window
    let token = session_token::sign(&session_id, &state.config.session_secret);
    let cookie = authenticated_cookie(&state.config).build_set_cookie(&token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(VerifyLoginResponse {
            success: true,
            message: "Login successful".to_string(),
            user: UserDto {
                email: user.email,
                full_name: user.full_name,
                staff_id: user.staff_id,
                department: user.department,
            },
        }),
    ))
}

// ============================================================================
// Password Recovery
// ============================================================================

/// POST /password-recovery
pub async fn password_recovery<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RecoveryRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountStore + StaffDirectory + SessionStore + Send + Sync + 'static,
{
    let use_case = RequestRecoveryUseCase::new(
        state.store.clone(),
        state.store.clone(),
        state.config.clone(),
    );
    let output = use_case.execute(req.email).await?;

    let response = Json(RecoveryResponse {
        success: true,
        requires_2fa: output.requires_2fa.then_some(true),
        message: output.message,
    });

    match output.session_token {
        Some(token) => {
            let cookie = pending_cookie(&state.config).build_set_cookie(&token);
            Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], response).into_response())
        }
        None => Ok((StatusCode::OK, response).into_response()),
    }
}

/// POST /password-recovery/verify
pub async fn verify_recovery<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<VerifyRecoveryRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountStore + StaffDirectory + SessionStore + Send + Sync + 'static,
{
    let session_id = require_session(&headers, &state.config)?;

    let use_case = VerifyRecoveryUseCase::new(
        state.store.clone(),
        state.store.clone(),
        state.config.clone(),
    );
    use_case
        .execute(&session_id, &req.code, req.new_password)
        .await?;

    let cookie = session_cookie_config(&state.config).build_delete_cookie();

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            success: true,
            message: "Password updated. Please log in with your new password.".to_string(),
        }),
    ))
}

// ============================================================================
// Session
// ============================================================================

/// GET /session
pub async fn session<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<SessionResponse>>
where
    R: AccountStore + StaffDirectory + SessionStore + Send + Sync + 'static,
{
    let session_id = extract_session(&headers, &state.config);

    let use_case = CheckSessionUseCase::new(state.store.clone());
    let output = use_case.execute(session_id.as_ref()).await?;

    Ok(Json(SessionResponse {
        authenticated: output.authenticated,
        timeout: output.timeout.then_some(true),
        user: output.user.map(|u| UserDto {
            email: u.email,
            full_name: u.full_name,
            staff_id: u.staff_id,
            department: u.department,
        }),
    }))
}

/// POST /logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: AccountStore + StaffDirectory + SessionStore + Send + Sync + 'static,
{
    let session_id = extract_session(&headers, &state.config);

    let use_case = LogOutUseCase::new(state.store.clone());
    use_case.execute(session_id.as_ref()).await?;

    let cookie = session_cookie_config(&state.config).build_delete_cookie();

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            success: true,
            message: "Logged out successfully".to_string(),
        }),
    ))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Pull a verified session ID out of the request cookie, if any
fn extract_session(headers: &HeaderMap, config: &AuthConfig) -> Option<SessionId> {
    let token = platform::cookie::extract_cookie(headers, &config.session_cookie_name)?;
    session_token::verify(&token, &config.session_secret)
}

fn require_session(headers: &HeaderMap, config: &AuthConfig) -> AuthResult<SessionId> {
    extract_session(headers, config).ok_or(AuthError::SessionExpired)
}

fn session_cookie_config(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.session_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: None,
    }
}

fn pending_cookie(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        max_age_secs: Some(config.pending_ttl.num_seconds()),
        ..session_cookie_config(config)
    }
}

fn authenticated_cookie(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        max_age_secs: Some(config.idle_timeout.num_seconds()),
        ..session_cookie_config(config)
    }
}
