// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the `BatCloud` HTTP server.

pub mod auth;

pub use auth::require_session;
