// ============================
// crates/backend-lib/src/handlers/session.rs
// ============================
//! Login, logout and session inspection.
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use batcloud_common::{LoginRequest, LoginResponse, SessionInfo, SuccessResponse};
use tracing::instrument;
use zeroize::Zeroize;

use crate::auth::{clear_cookie_header, session_cookie_header, AuthenticatedUser};
use crate::error::AppError;
use crate::storage::FileStore;
use crate::AppState;

/// `POST /api/login`
///
/// Password verification runs on the blocking pool.
#[instrument(skip_all)]
pub async fn login<S: FileStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let LoginRequest { username, mut password } = serde_json::from_slice(&body)
        .map_err(|_| AppError::InvalidInput("Invalid request body".to_string()))?;

    let gate = state.gate.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let outcome = gate.login(&username, &password);
        password.zeroize();
        outcome
    })
    .await
    .map_err(|e| AppError::Internal(format!("login task failed: {e}")))?;
    let session = outcome?;

    let auth = &state.settings.auth;
    let cookie = session_cookie_header(
        &auth.cookie_name,
        &session.token,
        session.max_age_secs,
        auth.secure_cookie,
    );
    Ok(([(header::SET_COOKIE, cookie)], Json(LoginResponse::ok())).into_response())
}

/// `POST /api/logout`
///
/// Tells the browser to drop its cookie. The token itself stays valid until
/// it expires.
pub async fn logout<S: FileStore + 'static>(State(state): State<Arc<AppState<S>>>) -> Response {
    let auth = &state.settings.auth;
    let cookie = clear_cookie_header(&auth.cookie_name, auth.secure_cookie);
    ([(header::SET_COOKIE, cookie)], Json(SuccessResponse::default())).into_response()
}

/// `GET /api/session`
pub async fn session_info(Extension(user): Extension<AuthenticatedUser>) -> Json<SessionInfo> {
    Json(SessionInfo {
        authenticated: true,
        username: user.username,
    })
}
