//! Session guard in front of every protected route.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::session_token_from_headers;
use crate::error::AppError;
use crate::storage::FileStore;
use crate::AppState;

/// Reject requests without a valid session cookie with 401.
///
/// On success the [`AuthenticatedUser`](crate::auth::AuthenticatedUser) is
/// inserted into the request extensions for the handler.
pub async fn require_session<S: FileStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token_from_headers(request.headers(), &state.settings.auth.cookie_name);
    let user = state.gate.guard(token)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
