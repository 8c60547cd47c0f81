// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers.

pub mod files;
pub mod session;

use crate::error::AppError;

/// Fallback for a known path hit with the wrong verb
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
