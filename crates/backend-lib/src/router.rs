// ============================
// backend-lib/src/router.rs
// ============================
//! HTTP router.
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{files, method_not_allowed, session};
use crate::middleware::require_session;
use crate::storage::FileStore;
use crate::AppState;

/// Create the application router, everything mounted under `/api`.
///
/// Login and logout are public; every other route passes the session guard
/// before its handler runs.
pub fn create_router<S: FileStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let max_upload = state.settings.storage.max_upload_bytes;

    let public = Router::new()
        .route("/login", post(session::login::<S>).fallback(method_not_allowed))
        .route("/logout", post(session::logout::<S>).fallback(method_not_allowed));

    let protected = Router::new()
        .route("/session", get(session::session_info).fallback(method_not_allowed))
        .route("/list-files", get(files::list_files::<S>).fallback(method_not_allowed))
        .route(
            "/upload-file",
            post(files::upload_file::<S>)
                .fallback(method_not_allowed)
                .layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/delete-file", delete(files::delete_file::<S>).fallback(method_not_allowed))
        .route("/create-folder", post(files::create_folder::<S>).fallback(method_not_allowed))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session::<S>));

    Router::new()
        .nest("/api", public.merge(protected))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
