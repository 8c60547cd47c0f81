// ============================
// backend-lib/src/lib.rs
// ============================
//! Core backend functionality for the `BatCloud` personal storage server.
//!
//! A single account logs in with a password and receives a signed session
//! cookie; the file routes only run for requests carrying a valid one.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;

use std::sync::Arc;

use crate::auth::SessionGate;
use crate::config::Settings;
use crate::storage::FlatFileStore;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Session gate for login and the route guard
    pub gate: Arc<SessionGate>,
    /// Settings, fixed for the process lifetime
    pub settings: Arc<Settings>,
    /// File store behind the protected routes
    pub storage: S,
}

impl<S> AppState<S> {
    /// Create a new application state
    pub fn new(storage: S, config: &Settings) -> Self {
        let gate = Arc::new(SessionGate::new(
            config.credentials(),
            config.auth.session_ttl_secs,
        ));

        Self {
            gate,
            settings: Arc::new(config.clone()),
            storage,
        }
    }
}

impl AppState<FlatFileStore> {
    /// Create a state backed by the configured storage directory
    pub fn from_settings(config: &Settings) -> anyhow::Result<Self> {
        let storage = FlatFileStore::new(&config.storage.root)?;
        Ok(Self::new(storage, config))
    }
}
