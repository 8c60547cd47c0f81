// ============================
// backend-lib/src/auth/gate.rs
// ============================
//! Session gate: login and per-request guard.
//!
//! The gate owns the credential record and the signing keys, and nothing
//! else. It keeps no session table, so every decision is computed from the
//! request alone.
use std::fmt;

use chrono::Duration;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::{password::verify_password, token::SessionKeys, Credentials};
use crate::error::AuthError;
use crate::metrics;

/// Upper bound on the session lifetime accepted by the gate (one year)
pub const MAX_SESSION_TTL_SECS: u64 = 365 * 86_400;

/// Where a request stands with respect to authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Rejected,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GateState::Unauthenticated => "unauthenticated",
            GateState::Authenticating => "authenticating",
            GateState::Authenticated => "authenticated",
            GateState::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// Identity attached to requests that passed the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub subject: String,
    pub token: String,
    /// Lifetime of the token, used as the cookie `Max-Age`
    pub max_age_secs: u64,
}

/// Decides login and guard outcomes for the single configured account.
#[derive(Clone)]
pub struct SessionGate {
    credentials: Credentials,
    keys: SessionKeys,
    ttl_secs: u64,
}

impl SessionGate {
    /// Build a gate; `session_ttl_secs` is capped at [`MAX_SESSION_TTL_SECS`].
    pub fn new(credentials: Credentials, session_ttl_secs: u64) -> Self {
        let keys = SessionKeys::new(credentials.signing_secret());
        Self {
            credentials,
            keys,
            ttl_secs: session_ttl_secs.min(MAX_SESSION_TTL_SECS),
        }
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    pub fn session_ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Verify a login attempt and issue a session token.
    ///
    /// Both the username and the password are always checked, and the
    /// username comparison is constant-time, so a rejection does not reveal
    /// which one was wrong.
    pub fn login(&self, username: &str, password: &str) -> Result<IssuedSession, AuthError> {
        debug!(state = %GateState::Authenticating, "verifying login attempt");

        let username_ok: bool = self
            .credentials
            .username()
            .as_bytes()
            .ct_eq(username.as_bytes())
            .into();
        let password_ok = verify_password(self.credentials.password_hash(), password);

        if !(username_ok & password_ok) {
            ::metrics::counter!(metrics::AUTH_LOGIN_FAILURE).increment(1);
            warn!(state = %GateState::Rejected, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let ttl = Duration::seconds(self.ttl_secs as i64);
        let token = self.keys.issue(self.credentials.username(), ttl).map_err(|e| {
            warn!(state = %GateState::Rejected, error = %e, "failed to issue session token");
            e
        })?;

        ::metrics::counter!(metrics::AUTH_LOGIN_SUCCESS).increment(1);
        debug!(state = %GateState::Authenticated, user = self.credentials.username(), "login accepted");

        Ok(IssuedSession {
            subject: self.credentials.username().to_string(),
            token,
            max_age_secs: self.ttl_secs,
        })
    }

    /// Check the session token presented with a request.
    pub fn guard(&self, token: Option<&str>) -> Result<AuthenticatedUser, AuthError> {
        let result = match token {
            None => Err(AuthError::MissingToken),
            Some(token) => self.keys.validate(token),
        };

        match result {
            Ok(username) => Ok(AuthenticatedUser { username }),
            Err(reason) => {
                ::metrics::counter!(metrics::AUTH_GUARD_REJECTED, "reason" => reason.kind())
                    .increment(1);
                if reason == AuthError::MissingToken {
                    debug!(state = %GateState::Unauthenticated, "request without session token");
                } else {
                    warn!(state = %GateState::Rejected, reason = reason.kind(), "session token rejected");
                }
                Err(reason)
            },
        }
    }
}
